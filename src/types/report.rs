// src/types/report.rs
//! Compatibility report produced by the scorer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Dimension weights in percent. They sum to 100.
pub const TECHNICAL_WEIGHT: u32 = 40;
pub const EXPERIENCE_WEIGHT: u32 = 30;
pub const LOCATION_WEIGHT: u32 = 15;
pub const SOFT_SKILLS_WEIGHT: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedScores {
    pub technical_fit: u8,
    pub experience_fit: u8,
    pub location_fit: u8,
    pub soft_skills_fit: u8,
}

impl DetailedScores {
    pub fn new(technical: u32, experience: u32, location: u32, soft_skills: u32) -> Self {
        Self {
            technical_fit: clamp_score(technical),
            experience_fit: clamp_score(experience),
            location_fit: clamp_score(location),
            soft_skills_fit: clamp_score(soft_skills),
        }
    }

    /// Weighted sum rounded half up. Computed in integers so that x.5 always
    /// rounds the same way.
    pub fn weighted_overall(&self) -> u8 {
        let weighted = TECHNICAL_WEIGHT * u32::from(self.technical_fit)
            + EXPERIENCE_WEIGHT * u32::from(self.experience_fit)
            + LOCATION_WEIGHT * u32::from(self.location_fit)
            + SOFT_SKILLS_WEIGHT * u32::from(self.soft_skills_fit);
        clamp_score((weighted + 50) / 100)
    }
}

pub fn clamp_score(value: u32) -> u8 {
    value.min(100) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchCategory {
    Technical,
    SoftSkill,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub keyword: String,
    pub category: MatchCategory,
}

impl fmt::Display for SkillMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.category {
            MatchCategory::Technical => write!(f, "{}", self.keyword.to_uppercase()),
            MatchCategory::SoftSkill => {
                write!(f, "{}", crate::utils::capitalize_first(&self.keyword))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Excellent,
    VeryGood,
    Regular,
    LowCompatibility,
    Incompatible,
}

impl Recommendation {
    /// Tier lower bounds are inclusive.
    pub fn from_score(score: u8) -> Self {
        match score {
            85..=u8::MAX => Recommendation::Excellent,
            70..=84 => Recommendation::VeryGood,
            55..=69 => Recommendation::Regular,
            40..=54 => Recommendation::LowCompatibility,
            _ => Recommendation::Incompatible,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::Excellent => "excellent",
            Recommendation::VeryGood => "very good",
            Recommendation::Regular => "regular",
            Recommendation::LowCompatibility => "low compatibility",
            Recommendation::Incompatible => "incompatible",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Recommendation::Excellent => {
                "EXCELLENT CANDIDATE! High compatibility - interview right away."
            }
            Recommendation::VeryGood => {
                "VERY GOOD CANDIDATE! Good compatibility - worth considering."
            }
            Recommendation::Regular => "REGULAR CANDIDATE. Some gaps, but may have potential.",
            Recommendation::LowCompatibility => {
                "LOW COMPATIBILITY. Check whether other qualities make up for it."
            }
            Recommendation::Incompatible => "INCOMPATIBLE with the main requirements of the job.",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityReport {
    pub id: Uuid,
    pub overall_score: u8,
    pub detailed_analysis: DetailedScores,
    pub matches: Vec<SkillMatch>,
    pub missing_skills: Vec<String>,
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
    pub recommendation: Recommendation,
    pub analyzed_at: DateTime<Utc>,
}

impl CompatibilityReport {
    /// Assemble a report; the overall score and tier are always derived from
    /// the sub-scores.
    pub fn new(
        detailed_analysis: DetailedScores,
        matches: Vec<SkillMatch>,
        missing_skills: Vec<String>,
        strengths: Vec<String>,
        concerns: Vec<String>,
    ) -> Self {
        let overall_score = detailed_analysis.weighted_overall();
        Self {
            id: Uuid::new_v4(),
            overall_score,
            detailed_analysis,
            matches,
            missing_skills,
            strengths,
            concerns,
            recommendation: Recommendation::from_score(overall_score),
            analyzed_at: Utc::now(),
        }
    }
}
