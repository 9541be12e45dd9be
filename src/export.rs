// src/export.rs
//! Batch scoring of saved profile pages and CSV export of the results

use serde::Serialize;
use std::io::Write;
use tracing::{info, warn};

use crate::error::Result;
use crate::profile_extraction::{ProfileExtractor, ProfilePage};
use crate::scoring::CompatibilityScorer;
use crate::types::candidate::CandidateRecord;
use crate::types::report::CompatibilityReport;

#[derive(Debug, Clone)]
pub struct BatchEntry {
    pub source: String,
    pub candidate: CandidateRecord,
    pub report: CompatibilityReport,
}

#[derive(Debug, Clone)]
pub struct SkippedPage {
    pub source: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub entries: Vec<BatchEntry>,
    pub skipped: Vec<SkippedPage>,
}

impl BatchResult {
    /// Best match first. Ties keep their input order.
    pub fn sort_by_score(&mut self) {
        self.entries
            .sort_by(|a, b| b.report.overall_score.cmp(&a.report.overall_score));
    }

    pub fn rows(&self) -> Vec<CsvRow> {
        self.entries.iter().map(CsvRow::from).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvRow {
    pub file: String,
    pub name: String,
    pub title: String,
    pub strategy: String,
    pub technical_fit: u8,
    pub experience_fit: u8,
    pub location_fit: u8,
    pub soft_skills_fit: u8,
    pub overall_score: u8,
    pub recommendation: String,
}

impl From<&BatchEntry> for CsvRow {
    fn from(entry: &BatchEntry) -> Self {
        let scores = entry.report.detailed_analysis;
        Self {
            file: entry.source.clone(),
            name: entry.candidate.name.clone(),
            title: entry.candidate.title.clone(),
            strategy: entry.candidate.source_strategy.clone(),
            technical_fit: scores.technical_fit,
            experience_fit: scores.experience_fit,
            location_fit: scores.location_fit,
            soft_skills_fit: scores.soft_skills_fit,
            overall_score: entry.report.overall_score,
            recommendation: entry.report.recommendation.label().to_string(),
        }
    }
}

/// Extract and score every page against one job description. Pages that
/// cannot be extracted are recorded as skipped; they never abort the batch.
pub async fn score_pages<P>(
    extractor: &ProfileExtractor,
    scorer: &CompatibilityScorer,
    pages: &[(String, P)],
    job_description: &str,
) -> BatchResult
where
    P: ProfilePage,
{
    let mut result = BatchResult::default();

    for (source, page) in pages {
        match extractor.extract(page).await {
            Ok(candidate) => {
                let report = scorer.score(&candidate, job_description);
                info!("{}: {}%", source, report.overall_score);
                result.entries.push(BatchEntry {
                    source: source.clone(),
                    candidate,
                    report,
                });
            }
            Err(e) => {
                warn!("Skipping {}: {}", source, e);
                result.skipped.push(SkippedPage {
                    source: source.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    result.sort_by_score();
    info!(
        "Batch completed: {} scored, {} skipped",
        result.entries.len(),
        result.skipped.len()
    );
    result
}

pub fn write_csv<W: Write>(result: &BatchResult, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in result.rows() {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}
