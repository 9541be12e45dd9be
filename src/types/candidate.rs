// src/types/candidate.rs
//! Candidate data captured from a profile page or typed in by hand

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{HireSightError, Result};
use crate::utils::split_skills;

/// `source_strategy` value for records entered by hand
pub const MANUAL_SOURCE: &str = "manual";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub duration: String,
}

impl ExperienceEntry {
    pub fn summary(&self) -> String {
        [&self.title, &self.company, &self.duration]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join(" - ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub school: String,
    pub degree: String,
}

impl EducationEntry {
    pub fn summary(&self) -> String {
        match (self.school.is_empty(), self.degree.is_empty()) {
            (false, false) => format!("{} - {}", self.school, self.degree),
            (false, true) => self.school.clone(),
            (true, false) => self.degree.clone(),
            (true, true) => String::new(),
        }
    }
}

/// Flat candidate record. Lives only for the current analysis session unless
/// explicitly saved to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub profile_url: String,
    pub extracted_at: DateTime<Utc>,
    pub source_strategy: String,
}

impl CandidateRecord {
    pub fn empty(profile_url: &str, source_strategy: &str) -> Self {
        Self {
            name: String::new(),
            title: String::new(),
            location: String::new(),
            photo: String::new(),
            about: String::new(),
            skills: Vec::new(),
            experience: Vec::new(),
            education: Vec::new(),
            profile_url: profile_url.to_string(),
            extracted_at: Utc::now(),
            source_strategy: source_strategy.to_string(),
        }
    }

    pub fn from_manual(input: ManualCandidateInput, profile_url: &str) -> Result<Self> {
        let name = input.name.trim().to_string();
        let title = input.title.trim().to_string();

        if name.is_empty() && title.is_empty() {
            return Err(HireSightError::InvalidInput(
                "fill in at least the name or the title".to_string(),
            ));
        }

        Ok(Self {
            name,
            title,
            location: input.location.trim().to_string(),
            about: input.about.trim().to_string(),
            skills: split_skills(&input.skills),
            ..Self::empty(profile_url, MANUAL_SOURCE)
        })
    }

    pub fn has_basic_info(&self) -> bool {
        !self.name.is_empty() || !self.title.is_empty()
    }

    pub fn has_additional_info(&self) -> bool {
        !self.location.is_empty()
            || !self.about.is_empty()
            || !self.experience.is_empty()
            || !self.education.is_empty()
            || !self.skills.is_empty()
    }

    /// A record is usable when it names the person (name or title) and carries
    /// at least one more category of data.
    pub fn is_valid(&self) -> bool {
        self.has_basic_info() && self.has_additional_info()
    }

    pub fn experience_text(&self) -> String {
        self.experience
            .iter()
            .map(ExperienceEntry::summary)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn education_text(&self) -> String {
        self.education
            .iter()
            .map(EducationEntry::summary)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Lower-cased concatenation of every field the scorer searches
    pub fn searchable_text(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.name,
            self.title,
            self.about,
            self.experience_text(),
            self.education_text(),
            self.skills.join(" ")
        )
        .to_lowercase()
    }

    pub fn is_manual(&self) -> bool {
        self.source_strategy == MANUAL_SOURCE
    }
}

/// Raw fields from the manual-entry form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManualCandidateInput {
    pub name: String,
    pub title: String,
    pub location: String,
    pub about: String,
    /// Comma or newline separated
    pub skills: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CandidateRecord {
        CandidateRecord::empty("https://example.com/in/jane", "Generic Fallback")
    }

    #[test]
    fn test_validity_requires_basic_and_additional_info() {
        let mut rec = record();
        assert!(!rec.is_valid());

        rec.location = "Lisbon".to_string();
        assert!(!rec.is_valid(), "location alone is not enough");

        rec.title = "Backend Engineer".to_string();
        assert!(rec.is_valid());

        let mut only_name = record();
        only_name.name = "Jane".to_string();
        assert!(!only_name.is_valid(), "name alone is not enough");
        only_name.education.push(EducationEntry {
            school: "MIT".to_string(),
            degree: String::new(),
        });
        assert!(only_name.is_valid());
    }

    #[test]
    fn test_from_manual_requires_name_or_title() {
        let err = CandidateRecord::from_manual(
            ManualCandidateInput {
                location: "Porto".to_string(),
                ..Default::default()
            },
            "",
        )
        .unwrap_err();
        assert!(matches!(err, HireSightError::InvalidInput(_)));
    }

    #[test]
    fn test_from_manual_splits_skills() {
        let rec = CandidateRecord::from_manual(
            ManualCandidateInput {
                name: "  Ana Souza ".to_string(),
                skills: "React, Node\nSQL".to_string(),
                ..Default::default()
            },
            "https://example.com",
        )
        .unwrap();
        assert_eq!(rec.name, "Ana Souza");
        assert_eq!(rec.skills, vec!["React", "Node", "SQL"]);
        assert!(rec.is_manual());
    }

    #[test]
    fn test_searchable_text_is_lowercase_and_includes_entries() {
        let mut rec = record();
        rec.name = "Jane".to_string();
        rec.skills = vec!["TypeScript".to_string()];
        rec.experience.push(ExperienceEntry {
            title: "Staff Engineer".to_string(),
            company: "ACME".to_string(),
            duration: String::new(),
        });
        let text = rec.searchable_text();
        assert!(text.contains("typescript"));
        assert!(text.contains("staff engineer - acme"));
        assert!(!text.contains("ACME"));
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let json = serde_json::to_value(record()).unwrap();
        assert!(json.get("profileUrl").is_some());
        assert!(json.get("sourceStrategy").is_some());
    }
}
