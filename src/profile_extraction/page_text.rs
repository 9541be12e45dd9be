// src/profile_extraction/page_text.rs
//! Best-effort fallback that reads "About" and "Skills" sections out of the
//! rendered page text by their localized headers. Only consulted when the
//! structured selectors found nothing for those fields.

use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

use crate::error::{HireSightError, Result};
use crate::utils::{normalize_locale, truncate_chars};

pub const MAX_ABOUT_CHARS: usize = 1000;
const MIN_ABOUT_CHARS: usize = 20;
const MAX_SKILL_LINES: usize = 15;
const MIN_SKILL_LINE_CHARS: usize = 3;
const MAX_SKILL_LINE_CHARS: usize = 49;
const SHOW_MORE_MARKERS: [&str; 2] = ["Ver mais", "See more"];

const SKIPPED_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Fallback lookup over the page's visible text
pub trait SectionLookup: Send + Sync {
    fn about(&self, page_text: &str) -> Option<String>;
    fn skills(&self, page_text: &str) -> Vec<String>;
}

/// Render a document roughly the way a browser's `innerText` would: one line
/// per text node, scripts and styles left out.
pub fn visible_text(document: &Html) -> String {
    let body = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .unwrap_or_else(|| document.root_element());

    let mut lines = Vec::new();
    for node in body.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|element| SKIPPED_TAGS.contains(&element.name()))
                .unwrap_or(false)
        });
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }

    lines.join("\n")
}

/// Header vocabulary of one locale
struct SectionLocale {
    code: &'static str,
    about: Regex,
    skills: Regex,
}

impl SectionLocale {
    fn portuguese() -> Result<Self> {
        Ok(Self {
            code: "pt",
            about: section_pattern(
                "Sobre",
                "Atividade|Experiência|Formação|Educação|Licenças|Competências|Skills|Idiomas|Recomendações|Cursos|Projetos|Publicações|Patentes|Prêmios|Organizações|Causas|Interesses",
                r"Ver\s+(?:mais|menos)",
            )?,
            skills: section_pattern(
                "Competências",
                "Idiomas|Recomendações|Cursos|Projetos|Publicações|Patentes|Prêmios|Organizações|Causas|Interesses",
                r"Ver\s+(?:mais|menos)",
            )?,
        })
    }

    fn english() -> Result<Self> {
        Ok(Self {
            code: "en",
            about: section_pattern(
                "About",
                "Activity|Experience|Education|Licenses|Skills|Languages|Recommendations|Courses|Projects|Publications|Patents|Honors|Organizations|Causes|Interests",
                r"See\s+(?:more|less)",
            )?,
            skills: section_pattern(
                "Skills",
                "Languages|Recommendations|Courses|Projects|Publications|Patents|Honors|Organizations|Causes|Interests",
                r"See\s+(?:more|less)",
            )?,
        })
    }
}

/// Captures everything between `header` on its own line and the next known
/// header, a show-more marker, or the end of the text.
fn section_pattern(header: &str, next_headers: &str, show_more: &str) -> Result<Regex> {
    let pattern = format!(
        r"(?is){}\s*\n\s*(.*?)(?:\n\s*(?:{})|\n\s*{}|$)",
        header, next_headers, show_more
    );
    Ok(Regex::new(&pattern)?)
}

pub struct PageTextFallback {
    locales: Vec<SectionLocale>,
}

impl PageTextFallback {
    /// Build the fallback for the given locale codes, in priority order.
    /// An empty list disables the fallback.
    pub fn new<S: AsRef<str>>(locales: &[S]) -> Result<Self> {
        let mut built = Vec::new();
        for locale in locales {
            let code = normalize_locale(locale.as_ref()).ok_or_else(|| {
                HireSightError::Config(format!(
                    "unsupported fallback locale '{}'",
                    locale.as_ref()
                ))
            })?;
            if built.iter().any(|l: &SectionLocale| l.code == code) {
                continue;
            }
            built.push(match code {
                "pt" => SectionLocale::portuguese()?,
                _ => SectionLocale::english()?,
            });
        }
        Ok(Self { locales: built })
    }

    pub fn disabled() -> Self {
        Self {
            locales: Vec::new(),
        }
    }

    pub fn locale_codes(&self) -> Vec<&'static str> {
        self.locales.iter().map(|l| l.code).collect()
    }
}

impl SectionLookup for PageTextFallback {
    fn about(&self, page_text: &str) -> Option<String> {
        for locale in &self.locales {
            let Some(section) = capture_section(&locale.about, page_text) else {
                continue;
            };
            if section.chars().count() > MIN_ABOUT_CHARS {
                debug!("About section recovered from page text ({})", locale.code);
                return Some(truncate_chars(&section, MAX_ABOUT_CHARS));
            }
        }
        None
    }

    fn skills(&self, page_text: &str) -> Vec<String> {
        for locale in &self.locales {
            let Some(section) = capture_section(&locale.skills, page_text) else {
                continue;
            };
            let skills: Vec<String> = section
                .lines()
                .map(str::trim)
                .filter(|line| {
                    let len = line.chars().count();
                    (MIN_SKILL_LINE_CHARS..=MAX_SKILL_LINE_CHARS).contains(&len)
                        && !SHOW_MORE_MARKERS.iter().any(|marker| line.contains(marker))
                })
                .take(MAX_SKILL_LINES)
                .map(str::to_string)
                .collect();

            if !skills.is_empty() {
                debug!(
                    "{} skills recovered from page text ({})",
                    skills.len(),
                    locale.code
                );
                return skills;
            }
        }
        Vec::new()
    }
}

fn capture_section(pattern: &Regex, page_text: &str) -> Option<String> {
    pattern
        .captures(page_text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|section| !section.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_EN: &str = "Jane Doe\nAbout\nI build distributed systems in Rust and Go for fintech.\nExperience\nStaff Engineer\nSkills\nRust\nKubernetes\nSee more\nLanguages\nEnglish";

    #[test]
    fn test_visible_text_skips_scripts() {
        let html = Html::parse_document(
            "<html><head><title>t</title></head><body><h1>Jane</h1><script>var x = 1;</script><p>About <b>me</b></p><style>p{}</style></body></html>",
        );
        assert_eq!(visible_text(&html), "Jane\nAbout\nme");
    }

    #[test]
    fn test_about_section_english() {
        let fallback = PageTextFallback::new(&["en"]).unwrap();
        assert_eq!(
            fallback.about(PAGE_EN).as_deref(),
            Some("I build distributed systems in Rust and Go for fintech.")
        );
    }

    #[test]
    fn test_short_about_is_ignored() {
        let fallback = PageTextFallback::new(&["en"]).unwrap();
        assert!(fallback.about("About\nHi there\nExperience").is_none());
    }

    #[test]
    fn test_about_is_truncated() {
        let fallback = PageTextFallback::new(&["en"]).unwrap();
        let page = format!("About\n{}", "x".repeat(1500));
        assert_eq!(
            fallback.about(&page).map(|a| a.chars().count()),
            Some(MAX_ABOUT_CHARS)
        );
    }

    #[test]
    fn test_skills_section_stops_at_show_more() {
        let fallback = PageTextFallback::new(&["en"]).unwrap();
        assert_eq!(fallback.skills(PAGE_EN), vec!["Rust", "Kubernetes"]);
    }

    #[test]
    fn test_portuguese_sections() {
        let fallback = PageTextFallback::new(&["pt", "en"]).unwrap();
        let page = "Sobre\nDesenvolvedora full stack com foco em produtos SaaS.\nExperiência\nCompetências\nReact\nGo\nNode.js\nIdiomas\nPortuguês";

        assert_eq!(
            fallback.about(page).as_deref(),
            Some("Desenvolvedora full stack com foco em produtos SaaS.")
        );
        // "Go" is too short to be trusted as a skill line
        assert_eq!(fallback.skills(page), vec!["React", "Node.js"]);
    }

    #[test]
    fn test_disabled_and_unknown_locales() {
        assert!(PageTextFallback::disabled().about(PAGE_EN).is_none());
        assert!(PageTextFallback::new(&["fr"]).is_err());
        assert_eq!(
            PageTextFallback::new(&["en", "English", "pt"])
                .unwrap()
                .locale_codes(),
            vec!["en", "pt"]
        );
    }
}
