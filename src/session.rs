// src/session.rs
//! State of one analysis from extraction to save, passed around explicitly

use serde_json::Value;
use tracing::info;

use crate::error::{HireSightError, Result};
use crate::scoring::CompatibilityScorer;
use crate::types::backend::SavedAnalysis;
use crate::types::candidate::CandidateRecord;
use crate::types::report::CompatibilityReport;

#[derive(Debug, Clone, Default)]
pub struct AnalysisSession {
    user: Option<Value>,
    candidate: Option<CandidateRecord>,
    job_description: String,
    report: Option<CompatibilityReport>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(user: Option<Value>) -> Self {
        Self {
            user,
            ..Self::default()
        }
    }

    /// Display name of the logged-in user: `name`, else `email`
    pub fn analyst(&self) -> Option<&str> {
        let user = self.user.as_ref()?;
        ["name", "email"]
            .iter()
            .filter_map(|key| user.get(*key).and_then(Value::as_str))
            .find(|value| !value.trim().is_empty())
    }

    pub fn candidate(&self) -> Option<&CandidateRecord> {
        self.candidate.as_ref()
    }

    /// A new candidate makes any previous report stale
    pub fn set_candidate(&mut self, candidate: CandidateRecord) {
        self.candidate = Some(candidate);
        self.report = None;
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn set_job_description(&mut self, job_description: impl Into<String>) {
        self.job_description = job_description.into();
    }

    pub fn report(&self) -> Option<&CompatibilityReport> {
        self.report.as_ref()
    }

    /// Score the current candidate against the current job description.
    /// Running it again replaces the previous report.
    pub fn analyze(&mut self, scorer: &CompatibilityScorer) -> Result<&CompatibilityReport> {
        if self.job_description.trim().is_empty() {
            return Err(HireSightError::InvalidInput(
                "paste the job description before analyzing".to_string(),
            ));
        }
        let candidate = self.candidate.as_ref().ok_or_else(|| {
            HireSightError::InvalidInput(
                "extract a profile or enter the candidate manually first".to_string(),
            )
        })?;

        let report = scorer.score(candidate, &self.job_description);
        info!(
            "Analysis complete: {}% ({})",
            report.overall_score,
            report.recommendation.label()
        );

        Ok(self.report.insert(report))
    }

    /// Start a new analysis; the logged-in user is kept
    pub fn reset(&mut self) {
        self.candidate = None;
        self.job_description.clear();
        self.report = None;
    }

    /// Payload for saving the finished analysis to the backend
    pub fn saved_analysis(&self) -> Result<SavedAnalysis> {
        match (&self.candidate, &self.report) {
            (Some(candidate), Some(report)) => {
                Ok(SavedAnalysis::new(candidate, &self.job_description, report))
            }
            _ => Err(HireSightError::InvalidInput(
                "nothing to save yet, run an analysis first".to_string(),
            )),
        }
    }
}
