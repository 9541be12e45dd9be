// src/types/backend.rs
//! Payloads exchanged with the recruitment backend. Entity bodies stay as
//! `serde_json::Value` because the backend owns their schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HireSightError;
use crate::types::candidate::CandidateRecord;
use crate::types::report::{CompatibilityReport, DetailedScores, Recommendation};

pub const ANALYSIS_SOURCE: &str = "HireSight CLI profile extractor";

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

/// Login/register response. Older endpoints answer with `token`, newer ones
/// with `access_token`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(alias = "token")]
    pub access_token: Option<String>,
    #[serde(default)]
    pub user: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

/// CRUD collections exposed by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Candidates,
    JobPostings,
    Users,
    Tags,
}

impl Resource {
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Candidates => "/candidates",
            Resource::JobPostings => "/job-postings",
            Resource::Users => "/users",
            Resource::Tags => "/tags",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path().trim_start_matches('/'))
    }
}

impl FromStr for Resource {
    type Err = HireSightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "candidates" | "candidate" => Ok(Resource::Candidates),
            "job-postings" | "jobs" | "job_postings" => Ok(Resource::JobPostings),
            "users" | "user" => Ok(Resource::Users),
            "tags" | "tag" => Ok(Resource::Tags),
            other => Err(HireSightError::InvalidInput(format!(
                "unknown resource '{}', expected candidates, job-postings, users or tags",
                other
            ))),
        }
    }
}

/// Body posted when a finished analysis is saved
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedAnalysis {
    pub candidate_name: String,
    pub candidate_title: String,
    pub candidate_location: String,
    pub candidate_about: String,
    pub candidate_skills: Vec<String>,
    pub profile_url: String,
    pub job_description: String,
    pub overall_score: u8,
    pub detailed_scores: DetailedScores,
    pub matches: Vec<String>,
    pub missing_skills: Vec<String>,
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
    pub recommendation: Recommendation,
    pub recommendation_text: String,
    pub analyzed_at: DateTime<Utc>,
    pub source: String,
}

impl SavedAnalysis {
    pub fn new(
        candidate: &CandidateRecord,
        job_description: &str,
        report: &CompatibilityReport,
    ) -> Self {
        let candidate_name = if candidate.name.is_empty() {
            "Candidate".to_string()
        } else {
            candidate.name.clone()
        };

        Self {
            candidate_name,
            candidate_title: candidate.title.clone(),
            candidate_location: candidate.location.clone(),
            candidate_about: candidate.about.clone(),
            candidate_skills: candidate.skills.clone(),
            profile_url: candidate.profile_url.clone(),
            job_description: job_description.to_string(),
            overall_score: report.overall_score,
            detailed_scores: report.detailed_analysis,
            matches: report.matches.iter().map(ToString::to_string).collect(),
            missing_skills: report.missing_skills.clone(),
            strengths: report.strengths.clone(),
            concerns: report.concerns.clone(),
            recommendation: report.recommendation,
            recommendation_text: report.recommendation.message().to_string(),
            analyzed_at: report.analyzed_at,
            source: ANALYSIS_SOURCE.to_string(),
        }
    }
}
