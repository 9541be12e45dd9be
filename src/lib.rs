//! Candidate profile extraction and job compatibility scoring

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod profile_extraction;
pub mod render;
pub mod scoring;
pub mod session;
pub mod types;
pub mod utils;

pub use error::{HireSightError, Result};
pub use profile_extraction::{ProfileExtractor, ProfilePage};
pub use scoring::CompatibilityScorer;
pub use session::AnalysisSession;
pub use types::{CandidateRecord, CompatibilityReport};

/// Extract a candidate from `page` and score it against `job_description`
pub async fn analyze_page<P>(
    extractor: &ProfileExtractor,
    scorer: &CompatibilityScorer,
    page: &P,
    job_description: &str,
) -> Result<(CandidateRecord, CompatibilityReport)>
where
    P: ProfilePage + ?Sized,
{
    let candidate = extractor.extract(page).await?;
    let report = scorer.score(&candidate, job_description);
    Ok((candidate, report))
}
