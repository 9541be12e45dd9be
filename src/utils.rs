// src/utils.rs

/// Collapse all runs of whitespace (including newlines) into single spaces
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max_chars` characters, never splitting a code point
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// Upper-case the first character only ("problem solving" -> "Problem solving")
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Split a free-form skills field on commas and newlines
pub fn split_skills(raw: &str) -> Vec<String> {
    raw.split(|c| c == ',' || c == '\n')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalize a locale name to the section-header locale codes we ship
pub fn normalize_locale(locale: &str) -> Option<&'static str> {
    match locale.trim().to_lowercase().as_str() {
        "pt" | "pt-br" | "pt_br" | "portuguese" | "português" | "portugues" => Some("pt"),
        "en" | "en-us" | "en_us" | "english" | "inglês" => Some("en"),
        _ => None,
    }
}
