// src/profile_extraction/navigation.rs
//! Re-runs extraction when the page moves to another profile without a full
//! reload (single-page navigation).

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::extractor::ProfileExtractor;
use super::page::ProfilePage;
use crate::error::Result;
use crate::types::candidate::CandidateRecord;

/// One extraction attempt, tagged with the URL it was made for
#[derive(Debug)]
pub struct ExtractionOutcome {
    pub url: String,
    pub result: Result<CandidateRecord>,
}

#[derive(Debug, Clone, Copy)]
pub struct NavigationWatcher {
    poll_interval: Duration,
    settle_delay: Duration,
}

impl Default for NavigationWatcher {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            settle_delay: Duration::from_secs(2),
        }
    }
}

impl NavigationWatcher {
    pub fn new(poll_interval: Duration, settle_delay: Duration) -> Self {
        Self {
            poll_interval,
            settle_delay,
        }
    }

    /// Extract once, then keep polling the page URL and extract again after
    /// every change. Returns when the receiving side of `outcomes` goes away.
    ///
    /// Runs on the caller's task: parsed documents are not `Send`.
    pub async fn run<P>(
        &self,
        extractor: &ProfileExtractor,
        page: &P,
        outcomes: mpsc::Sender<ExtractionOutcome>,
    ) -> Result<()>
    where
        P: ProfilePage + ?Sized,
    {
        let mut last_url = page.current_url().await?;
        info!("Watching {} for navigation", last_url);

        let result = extractor.extract(page).await;
        if outcomes
            .send(ExtractionOutcome {
                url: last_url.clone(),
                result,
            })
            .await
            .is_err()
        {
            return Ok(());
        }

        loop {
            tokio::select! {
                _ = outcomes.closed() => {
                    debug!("Outcome receiver dropped, stopping watcher");
                    return Ok(());
                }
                _ = sleep(self.poll_interval) => {}
            }

            let url = match page.current_url().await {
                Ok(url) => url,
                Err(e) => {
                    warn!("Could not read current page URL: {}", e);
                    continue;
                }
            };
            if url == last_url {
                continue;
            }

            info!("Navigation detected: {} -> {}", last_url, url);
            last_url = url;
            sleep(self.settle_delay).await;

            let result = extractor.extract(page).await;
            if outcomes
                .send(ExtractionOutcome {
                    url: last_url.clone(),
                    result,
                })
                .await
                .is_err()
            {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile_extraction::extractor::ExtractionTimings;
    use crate::profile_extraction::page::{PageSnapshot, ReadyState};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// A page whose URL and content the test can swap underneath the watcher
    #[derive(Clone)]
    struct SwappablePage {
        state: Arc<Mutex<(String, String)>>,
    }

    impl SwappablePage {
        fn new(url: &str, html: &str) -> Self {
            Self {
                state: Arc::new(Mutex::new((url.to_string(), html.to_string()))),
            }
        }

        fn navigate(&self, url: &str, html: &str) {
            *self.state.lock().unwrap() = (url.to_string(), html.to_string());
        }
    }

    #[async_trait]
    impl ProfilePage for SwappablePage {
        async fn ready_state(&self) -> ReadyState {
            ReadyState::Complete
        }

        async fn current_url(&self) -> Result<String> {
            Ok(self.state.lock().unwrap().0.clone())
        }

        async fn snapshot(&self) -> Result<PageSnapshot> {
            let (url, html) = self.state.lock().unwrap().clone();
            Ok(PageSnapshot { url, html })
        }
    }

    fn profile(name: &str, location: &str) -> String {
        format!(
            r#"<html><body><h1 class="text-heading-xlarge">{name}</h1>
            <span class="text-body-small inline t-black--light break-words">{location}</span></body></html>"#
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_reextracts_after_navigation() {
        let extractor = ProfileExtractor::with_defaults(ExtractionTimings::immediate()).unwrap();
        let watcher = NavigationWatcher::default();
        let page = SwappablePage::new("https://example.com/in/jane", &profile("Jane", "Lisbon"));
        let (tx, mut rx) = mpsc::channel::<ExtractionOutcome>(4);

        let driver = async {
            let first = rx.recv().await.unwrap();
            assert_eq!(first.url, "https://example.com/in/jane");
            assert_eq!(first.result.unwrap().name, "Jane");

            page.navigate("https://example.com/in/joao", &profile("João", "Porto"));
            let started = tokio::time::Instant::now();

            let second = rx.recv().await.unwrap();
            assert_eq!(second.url, "https://example.com/in/joao");
            let record = second.result.unwrap();
            assert_eq!(record.name, "João");
            assert_eq!(record.location, "Porto");
            // one poll plus the settle delay
            assert!(started.elapsed() >= Duration::from_secs(2));

            drop(rx);
        };

        let (watch_result, _) = tokio::join!(watcher.run(&extractor, &page, tx), driver);
        assert!(watch_result.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_receiver_dropped() {
        let extractor = ProfileExtractor::with_defaults(ExtractionTimings::immediate()).unwrap();
        let page = SwappablePage::new("https://example.com/in/jane", &profile("Jane", "Lisbon"));
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        let watcher = NavigationWatcher::new(Duration::from_millis(10), Duration::ZERO);
        assert!(watcher.run(&extractor, &page, tx).await.is_ok());
    }
}
