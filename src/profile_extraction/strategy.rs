// src/profile_extraction/strategy.rs
//! Extraction strategies: plain data mapping each profile field to an ordered
//! list of CSS selectors, tried in priority order.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::{HireSightError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Title,
    Location,
    Photo,
    About,
    Experience,
    Education,
    Skills,
}

/// What a matched element contributes: its text content or one attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture<'a> {
    Text,
    Attribute(&'a str),
}

fn default_photo_attribute() -> String {
    "src".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSelectors {
    #[serde(default)]
    pub name: Vec<String>,
    #[serde(default)]
    pub title: Vec<String>,
    #[serde(default)]
    pub location: Vec<String>,
    #[serde(default)]
    pub photo: Vec<String>,
    #[serde(default = "default_photo_attribute")]
    pub photo_attribute: String,
    #[serde(default)]
    pub about: Vec<String>,
    #[serde(default)]
    pub experience: Vec<String>,
    #[serde(default)]
    pub education: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl FieldSelectors {
    pub fn for_field(&self, field: ProfileField) -> &[String] {
        match field {
            ProfileField::Name => &self.name,
            ProfileField::Title => &self.title,
            ProfileField::Location => &self.location,
            ProfileField::Photo => &self.photo,
            ProfileField::About => &self.about,
            ProfileField::Experience => &self.experience,
            ProfileField::Education => &self.education,
            ProfileField::Skills => &self.skills,
        }
    }

    pub fn capture(&self, field: ProfileField) -> Capture<'_> {
        match field {
            ProfileField::Photo => Capture::Attribute(&self.photo_attribute),
            _ => Capture::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStrategy {
    pub name: String,
    pub selectors: FieldSelectors,
}

/// Nested lookups applied inside each experience/education entry element
pub mod entry_selectors {
    pub const EXPERIENCE_TITLE: &[&str] = &[
        ".mr1.t-bold span[aria-hidden=\"true\"]",
        ".pv-entity__summary-info h3",
        "h3",
        ".title",
    ];
    pub const EXPERIENCE_COMPANY: &[&str] = &[
        ".t-14.t-normal span[aria-hidden=\"true\"]",
        ".pv-entity__secondary-title",
        ".company",
        ".subtitle",
    ];
    pub const EXPERIENCE_DURATION: &[&str] = &[
        ".t-14.t-normal.t-black--light span[aria-hidden=\"true\"]",
        ".pv-entity__bullet-item",
        ".duration",
        ".date-range",
    ];
    pub const EDUCATION_SCHOOL: &[&str] = &[
        ".mr1.t-bold span[aria-hidden=\"true\"]",
        ".pv-entity__school-name",
        "h3",
        ".school",
    ];
    pub const EDUCATION_DEGREE: &[&str] = &[
        ".t-14.t-normal span[aria-hidden=\"true\"]",
        ".pv-entity__degree-name",
        ".degree",
        ".field-of-study",
    ];
}

fn owned(selectors: &[&str]) -> Vec<String> {
    selectors.iter().map(|s| s.to_string()).collect()
}

/// Built-in strategies in priority order: modern layout, classic layout,
/// generic fallback.
pub fn default_strategies() -> Vec<ExtractionStrategy> {
    vec![
        ExtractionStrategy {
            name: "LinkedIn New Layout 2024".to_string(),
            selectors: FieldSelectors {
                name: owned(&[
                    "h1.text-heading-xlarge.inline.t-24.v-align-middle.break-words",
                    "h1.text-heading-xlarge",
                    "h1[data-generated-suggestion-target]",
                    ".pv-text-details__left-panel h1",
                    ".ph5.pb5 h1",
                ]),
                title: owned(&[
                    ".text-body-medium.break-words",
                    ".pv-text-details__left-panel .text-body-medium",
                    ".mt2.relative .text-body-medium",
                    ".pv-entity__summary-info h2",
                ]),
                location: owned(&[
                    ".text-body-small.inline.t-black--light.break-words",
                    ".pv-text-details__left-panel .text-body-small",
                    ".pb2 .text-body-small",
                    ".pv-contact-info__contact-type",
                ]),
                photo: owned(&[
                    ".pv-top-card-profile-picture__image--show img",
                    "img.pv-top-card-profile-picture__image",
                    ".profile-photo-edit__preview img",
                    ".presence-entity__image img",
                ]),
                photo_attribute: default_photo_attribute(),
                about: owned(&[
                    "#about ~ .pvs-list__outer-container .full-width .visually-hidden",
                    ".pv-about-section .pv-about__summary-text .visually-hidden",
                    ".pv-about__summary-text .inline-show-more-text",
                    ".summary .pv-entity__summary-info",
                    ".pv-about-section .inline-show-more-text",
                ]),
                experience: owned(&[
                    "#experience ~ .pvs-list__outer-container .pvs-entity",
                    ".pv-profile-section.experience-section .pv-entity__summary-info",
                    ".experience .pv-entity__summary-info",
                    ".pv-experience-section .pv-entity",
                ]),
                education: owned(&[
                    "#education ~ .pvs-list__outer-container .pvs-entity",
                    ".pv-profile-section.education-section .pv-entity__summary-info",
                    ".education .pv-entity__summary-info",
                    ".pv-education-section .pv-entity",
                ]),
                skills: owned(&[
                    "#skills ~ .pvs-list__outer-container .mr1.t-bold span[aria-hidden=\"true\"]",
                    ".pv-skill-category-entity__name span[aria-hidden=\"true\"]",
                    ".pv-skill-categories-section .pv-skill-category-entity__name span",
                    ".skills-section .pv-skill-entity span",
                    ".pv-skills-section .pv-skill-entity__skill-name",
                ]),
            },
        },
        ExtractionStrategy {
            name: "LinkedIn Classic Layout".to_string(),
            selectors: FieldSelectors {
                name: owned(&[
                    ".pv-top-card--list .pv-top-card__content h1",
                    ".pv-top-card-section__name",
                    ".profile-topcard .profile-topcard__name",
                    ".pv-entity__summary-info h1",
                ]),
                title: owned(&[
                    ".pv-top-card--list .pv-top-card__content h2",
                    ".pv-top-card-section__headline",
                    ".profile-topcard .profile-topcard__headline",
                    ".pv-entity__summary-info h2",
                ]),
                location: owned(&[
                    ".pv-top-card--list .pv-top-card__content h3",
                    ".pv-top-card-section__location",
                    ".profile-topcard .profile-topcard__connections",
                    ".pv-contact-info__contact-type",
                ]),
                photo: owned(&[
                    ".pv-top-card__photo img",
                    ".profile-topcard__image img",
                    ".pv-top-card-section__photo img",
                    ".presence-entity__image img",
                ]),
                photo_attribute: default_photo_attribute(),
                about: owned(&[
                    ".pv-about-section .pv-about__summary-text",
                    ".summary .pv-entity__summary-info",
                    ".pv-about-section .inline-show-more-text",
                    ".description .pv-entity__summary-info",
                ]),
                experience: owned(&[
                    ".experience-section .pv-entity__summary-info",
                    ".pv-experience-section .pv-entity",
                    ".experience .pv-entity__summary-info",
                    ".pv-profile-section.experience .pv-entity",
                ]),
                education: owned(&[
                    ".education-section .pv-entity__summary-info",
                    ".pv-education-section .pv-entity",
                    ".education .pv-entity__summary-info",
                    ".pv-profile-section.education .pv-entity",
                ]),
                skills: owned(&[
                    ".pv-skill-categories-section .pv-skill-category-entity__name span",
                    ".skills-section .pv-skill-entity span",
                    ".pv-skills-section .pv-skill-entity__skill-name",
                    ".skill .pv-entity__summary-info",
                ]),
            },
        },
        ExtractionStrategy {
            name: "Generic Fallback".to_string(),
            selectors: FieldSelectors {
                name: owned(&["h1", "[data-test=\"profile-name\"]", ".name", ".profile-name"]),
                title: owned(&["h2", ".headline", ".title", ".job-title"]),
                location: owned(&[".location", ".geo", ".address", "[data-test=\"location\"]"]),
                photo: owned(&[
                    ".profile-photo img",
                    ".avatar img",
                    ".photo img",
                    "img[alt*=\"profile\"]",
                ]),
                photo_attribute: default_photo_attribute(),
                about: owned(&[".about", ".summary", ".description", ".bio"]),
                experience: owned(&[".experience .item", ".work .item", ".job .item", ".position"]),
                education: owned(&[
                    ".education .item",
                    ".school .item",
                    ".degree .item",
                    ".university",
                ]),
                skills: owned(&[".skills .item", ".skill", ".competency", ".expertise"]),
            },
        },
    ]
}

/// Load strategies from a YAML list shaped like the built-ins
pub fn load_strategies(path: &Path) -> Result<Vec<ExtractionStrategy>> {
    let content = std::fs::read_to_string(path)?;
    let strategies: Vec<ExtractionStrategy> = serde_yaml::from_str(&content)?;

    if strategies.is_empty() {
        return Err(HireSightError::Config(format!(
            "{} defines no extraction strategies",
            path.display()
        )));
    }

    info!(
        "Loaded {} extraction strategies from {}",
        strategies.len(),
        path.display()
    );
    Ok(strategies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Selector;
    use std::io::Write;

    #[test]
    fn test_default_strategy_order() {
        let names: Vec<String> = default_strategies().into_iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "LinkedIn New Layout 2024",
                "LinkedIn Classic Layout",
                "Generic Fallback"
            ]
        );
    }

    #[test]
    fn test_builtin_selectors_parse() {
        for strategy in default_strategies() {
            for field in [
                ProfileField::Name,
                ProfileField::Title,
                ProfileField::Location,
                ProfileField::Photo,
                ProfileField::About,
                ProfileField::Experience,
                ProfileField::Education,
                ProfileField::Skills,
            ] {
                for selector in strategy.selectors.for_field(field) {
                    assert!(
                        Selector::parse(selector).is_ok(),
                        "{} / {:?}: {}",
                        strategy.name,
                        field,
                        selector
                    );
                }
            }
        }
    }

    #[test]
    fn test_photo_captures_attribute() {
        let strategy = &default_strategies()[0];
        assert_eq!(
            strategy.selectors.capture(ProfileField::Photo),
            Capture::Attribute("src")
        );
        assert_eq!(strategy.selectors.capture(ProfileField::Name), Capture::Text);
    }

    #[test]
    fn test_load_strategies_from_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
- name: Portfolio
  selectors:
    name: [".who"]
    photo: [".avatar"]
    photo_attribute: data-src
    skills: [".tag"]
"#
        )
        .unwrap();

        let strategies = load_strategies(file.path()).unwrap();
        assert_eq!(strategies.len(), 1);
        assert_eq!(strategies[0].selectors.name, vec![".who"]);
        assert_eq!(strategies[0].selectors.photo_attribute, "data-src");
        assert!(strategies[0].selectors.title.is_empty());
    }

    #[test]
    fn test_load_strategies_rejects_empty_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[]").unwrap();
        assert!(matches!(
            load_strategies(file.path()),
            Err(HireSightError::Config(_))
        ));
    }
}
