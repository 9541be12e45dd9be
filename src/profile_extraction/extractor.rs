// src/profile_extraction/extractor.rs
use scraper::Html;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{info, warn};

use super::page::{ProfilePage, ReadyState};
use super::page_text::{visible_text, PageTextFallback, SectionLookup};
use super::resolver::SelectorResolver;
use super::strategy::{default_strategies, ExtractionStrategy, ProfileField};
use crate::error::{HireSightError, Result};
use crate::types::candidate::CandidateRecord;

/// Delays used to tolerate pages that are still rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionTimings {
    /// Upper bound on waiting for the page to report itself loaded
    pub page_load_timeout: Duration,
    pub ready_poll: Duration,
    /// Pause after each scalar selector miss
    pub selector_delay: Duration,
    /// Pause before falling through to the next strategy
    pub strategy_delay: Duration,
}

impl Default for ExtractionTimings {
    fn default() -> Self {
        Self {
            page_load_timeout: Duration::from_secs(5),
            ready_poll: Duration::from_millis(100),
            selector_delay: Duration::from_millis(100),
            strategy_delay: Duration::from_secs(1),
        }
    }
}

impl ExtractionTimings {
    /// No pauses at all; for static snapshots that are already complete
    pub fn immediate() -> Self {
        Self {
            page_load_timeout: Duration::ZERO,
            ready_poll: Duration::ZERO,
            selector_delay: Duration::ZERO,
            strategy_delay: Duration::ZERO,
        }
    }
}

pub struct ProfileExtractor {
    strategies: Vec<ExtractionStrategy>,
    fallback: Box<dyn SectionLookup>,
    timings: ExtractionTimings,
}

impl ProfileExtractor {
    pub fn new(
        strategies: Vec<ExtractionStrategy>,
        fallback: Box<dyn SectionLookup>,
        timings: ExtractionTimings,
    ) -> Result<Self> {
        if strategies.is_empty() {
            return Err(HireSightError::Config(
                "at least one extraction strategy is required".to_string(),
            ));
        }

        Ok(Self {
            strategies,
            fallback,
            timings,
        })
    }

    /// Built-in strategies with the Portuguese and English text fallback
    pub fn with_defaults(timings: ExtractionTimings) -> Result<Self> {
        Self::new(
            default_strategies(),
            Box::new(PageTextFallback::new(&["pt", "en"])?),
            timings,
        )
    }

    pub fn strategies(&self) -> &[ExtractionStrategy] {
        &self.strategies
    }

    pub fn timings(&self) -> ExtractionTimings {
        self.timings
    }

    /// Try every strategy in priority order and return the first record that
    /// passes the validity check. Reads the page only.
    pub async fn extract<P>(&self, page: &P) -> Result<CandidateRecord>
    where
        P: ProfilePage + ?Sized,
    {
        self.wait_for_ready(page).await;

        let snapshot = page.snapshot().await?;
        let document = Html::parse_document(&snapshot.html);
        let page_text = visible_text(&document);

        let mut attempted = Vec::with_capacity(self.strategies.len());
        for (index, strategy) in self.strategies.iter().enumerate() {
            info!("Trying extraction strategy: {}", strategy.name);
            attempted.push(strategy.name.clone());

            let record = self
                .extract_with_strategy(&document, &page_text, strategy, &snapshot.url)
                .await;

            if record.is_valid() {
                info!(
                    "Extraction succeeded with strategy '{}' for {}",
                    strategy.name, snapshot.url
                );
                return Ok(record);
            }

            warn!(
                "Strategy '{}' found insufficient data, trying the next one",
                strategy.name
            );
            if index + 1 < self.strategies.len() {
                sleep(self.timings.strategy_delay).await;
            }
        }

        Err(HireSightError::InsufficientData { attempted })
    }

    async fn wait_for_ready<P>(&self, page: &P)
    where
        P: ProfilePage + ?Sized,
    {
        let poll = async {
            loop {
                if page.ready_state().await == ReadyState::Complete {
                    break;
                }
                sleep(self.timings.ready_poll).await;
            }
        };

        if timeout(self.timings.page_load_timeout, poll).await.is_err() {
            warn!(
                "Page not loaded after {:?}, extracting what is there",
                self.timings.page_load_timeout
            );
        }
    }

    /// Resolve every field with one strategy. Never fails; missing fields stay empty.
    pub async fn extract_with_strategy(
        &self,
        document: &Html,
        page_text: &str,
        strategy: &ExtractionStrategy,
        profile_url: &str,
    ) -> CandidateRecord {
        let resolver = SelectorResolver::new(document, self.timings.selector_delay);
        let selectors = &strategy.selectors;

        let mut record = CandidateRecord::empty(profile_url, &strategy.name);

        for (field, slot) in [
            (ProfileField::Name, &mut record.name),
            (ProfileField::Title, &mut record.title),
            (ProfileField::Location, &mut record.location),
            (ProfileField::Photo, &mut record.photo),
            (ProfileField::About, &mut record.about),
        ] {
            *slot = resolver
                .scalar(selectors.for_field(field), &selectors.capture(field))
                .await;
        }

        record.experience = resolver.experience(selectors.for_field(ProfileField::Experience));
        record.education = resolver.education(selectors.for_field(ProfileField::Education));
        record.skills = resolver.skills(selectors.for_field(ProfileField::Skills));

        if record.about.is_empty() {
            if let Some(about) = self.fallback.about(page_text) {
                record.about = about;
            }
        }
        if record.skills.is_empty() {
            record.skills = self.fallback.skills(page_text);
        }

        record
    }
}
