// src/profile_extraction/resolver.rs
//! The single selector resolver every strategy is interpreted with.
//! Broken or unmatched selectors never abort a lookup; they count as "not found".

use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use super::strategy::{entry_selectors, Capture};
use crate::error::{HireSightError, Result};
use crate::types::candidate::{EducationEntry, ExperienceEntry};
use crate::utils::clean_text;

pub const MAX_EXPERIENCE_ENTRIES: usize = 5;
pub const MAX_EDUCATION_ENTRIES: usize = 3;
pub const MAX_SKILLS: usize = 15;

pub struct SelectorResolver<'a> {
    document: &'a Html,
    selector_delay: Duration,
}

impl<'a> SelectorResolver<'a> {
    pub fn new(document: &'a Html, selector_delay: Duration) -> Self {
        Self {
            document,
            selector_delay,
        }
    }

    /// First non-empty value among `selectors`, pausing briefly after each miss
    /// so a page that is still rendering gets a chance to settle.
    pub async fn scalar(&self, selectors: &[String], capture: &Capture<'_>) -> String {
        for selector in selectors {
            match self.query_all(selector) {
                Ok(elements) => {
                    if let Some(element) = elements.first() {
                        let value = capture_value(*element, capture);
                        if !value.is_empty() {
                            debug!("Found {:?} with selector: {}", capture, selector);
                            return value;
                        }
                    }
                }
                Err(e) => debug!("{}", e),
            }

            sleep(self.selector_delay).await;
        }

        String::new()
    }

    pub fn experience(&self, selectors: &[String]) -> Vec<ExperienceEntry> {
        self.first_matching_list(selectors, MAX_EXPERIENCE_ENTRIES, |element, found| {
            let entry = ExperienceEntry {
                title: nested_text(element, entry_selectors::EXPERIENCE_TITLE),
                company: nested_text(element, entry_selectors::EXPERIENCE_COMPANY),
                duration: nested_text(element, entry_selectors::EXPERIENCE_DURATION),
            };
            if !entry.title.is_empty() || !entry.company.is_empty() {
                found.push(entry);
            }
        })
    }

    pub fn education(&self, selectors: &[String]) -> Vec<EducationEntry> {
        self.first_matching_list(selectors, MAX_EDUCATION_ENTRIES, |element, found| {
            let entry = EducationEntry {
                school: nested_text(element, entry_selectors::EDUCATION_SCHOOL),
                degree: nested_text(element, entry_selectors::EDUCATION_DEGREE),
            };
            if !entry.school.is_empty() || !entry.degree.is_empty() {
                found.push(entry);
            }
        })
    }

    /// Skills are de-duplicated by exact text
    pub fn skills(&self, selectors: &[String]) -> Vec<String> {
        self.first_matching_list(selectors, MAX_SKILLS, |element, found| {
            let skill = element_text(element);
            if !skill.is_empty() && !found.contains(&skill) {
                found.push(skill);
            }
        })
    }

    /// Walk `selectors` until one yields at least one accepted item. Only the
    /// first `cap` matched elements of that selector are considered.
    fn first_matching_list<T, F>(&self, selectors: &[String], cap: usize, mut accept: F) -> Vec<T>
    where
        F: FnMut(ElementRef<'a>, &mut Vec<T>),
    {
        let mut found = Vec::new();

        for selector in selectors {
            let elements = match self.query_all(selector) {
                Ok(elements) => elements,
                Err(e) => {
                    debug!("{}", e);
                    continue;
                }
            };

            if elements.is_empty() {
                continue;
            }

            debug!("Found {} elements with: {}", elements.len(), selector);
            for element in elements.into_iter().take(cap) {
                accept(element, &mut found);
            }

            if !found.is_empty() {
                break;
            }
        }

        found
    }

    fn query_all(&self, selector: &str) -> Result<Vec<ElementRef<'a>>> {
        let parsed = parse_selector(selector)?;
        Ok(self.document.select(&parsed).collect())
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| HireSightError::SelectorLookup {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Whitespace-normalized text content of an element
pub fn element_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<Vec<_>>().join(" "))
}

fn capture_value(element: ElementRef<'_>, capture: &Capture<'_>) -> String {
    match capture {
        Capture::Text => element_text(element),
        Capture::Attribute(name) => element
            .value()
            .attr(name)
            .map(|value| value.trim().to_string())
            .unwrap_or_default(),
    }
}

fn nested_text(parent: ElementRef<'_>, selectors: &[&str]) -> String {
    for selector in selectors {
        let Ok(parsed) = parse_selector(selector) else {
            continue;
        };
        if let Some(element) = parent.select(&parsed).next() {
            let text = element_text(element);
            if !text.is_empty() {
                return text;
            }
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selectors(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_scalar_skips_empty_and_invalid_selectors() {
        let html = Html::parse_document(
            r#"<html><body><h1>   </h1><div class="name">  Jane
               Doe </div></body></html>"#,
        );
        let resolver = SelectorResolver::new(&html, Duration::ZERO);

        let value = resolver
            .scalar(&selectors(&["h1", "div[[", ".name"]), &Capture::Text)
            .await;
        assert_eq!(value, "Jane Doe");
    }

    #[tokio::test]
    async fn test_scalar_attribute_capture() {
        let html = Html::parse_document(
            r#"<div class="avatar"><img src=" https://cdn.example.com/jane.jpg "></div>"#,
        );
        let resolver = SelectorResolver::new(&html, Duration::ZERO);

        let src = resolver
            .scalar(&selectors(&[".avatar img"]), &Capture::Attribute("src"))
            .await;
        assert_eq!(src, "https://cdn.example.com/jane.jpg");

        let missing = resolver
            .scalar(&selectors(&[".avatar img"]), &Capture::Attribute("data-src"))
            .await;
        assert!(missing.is_empty());
    }

    #[test]
    fn test_experience_caps_at_five_and_uses_nested_lookups() {
        let items: String = (0..7)
            .map(|i| {
                format!(
                    r#"<li class="item"><h3>Role {i}</h3><span class="company">Co {i}</span><span class="duration">{i} yrs</span></li>"#
                )
            })
            .collect();
        let html = Html::parse_document(&format!(
            r#"<section class="experience"><ul>{}</ul></section>"#,
            items
        ));
        let resolver = SelectorResolver::new(&html, Duration::ZERO);

        let entries = resolver.experience(&selectors(&[".nothing", ".experience .item"]));
        assert_eq!(entries.len(), MAX_EXPERIENCE_ENTRIES);
        assert_eq!(
            entries[0],
            ExperienceEntry {
                title: "Role 0".to_string(),
                company: "Co 0".to_string(),
                duration: "0 yrs".to_string(),
            }
        );
    }

    #[test]
    fn test_list_moves_on_when_entries_are_empty() {
        let html = Html::parse_document(
            r#"<div class="position"></div>
               <div class="education"><div class="item"><span class="school">USP</span><span class="degree">BSc</span></div></div>"#,
        );
        let resolver = SelectorResolver::new(&html, Duration::ZERO);

        // ".position" matches but yields no usable entry, so nothing is returned for it
        assert!(resolver.experience(&selectors(&[".position"])).is_empty());

        let education = resolver.education(&selectors(&[".university", ".education .item"]));
        assert_eq!(education.len(), 1);
        assert_eq!(education[0].school, "USP");
        assert_eq!(education[0].degree, "BSc");
    }

    #[test]
    fn test_skills_deduplicated_and_capped() {
        let mut items = String::from(r#"<li class="skill">Rust</li><li class="skill">Rust</li>"#);
        for i in 0..20 {
            items.push_str(&format!(r#"<li class="skill">Skill {i}</li>"#));
        }
        let html = Html::parse_document(&format!("<ul>{}</ul>", items));
        let resolver = SelectorResolver::new(&html, Duration::ZERO);

        let skills = resolver.skills(&selectors(&[".skill"]));
        // 15 elements considered, one of them a duplicate
        assert_eq!(skills.len(), 14);
        assert_eq!(skills[0], "Rust");
        assert_eq!(skills[1], "Skill 0");
    }

    #[test]
    fn test_first_selector_with_results_wins() {
        let html = Html::parse_document(
            r#"<span class="a">One</span><span class="b">Two</span><span class="b">Three</span>"#,
        );
        let resolver = SelectorResolver::new(&html, Duration::ZERO);
        assert_eq!(resolver.skills(&selectors(&[".a", ".b"])), vec!["One"]);
    }
}
