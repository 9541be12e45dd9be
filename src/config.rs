// src/config.rs
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::backend::{BackendClient, CredentialStore};
use crate::error::{HireSightError, Result};
use crate::profile_extraction::{
    default_strategies, load_strategies, ExtractionTimings, NavigationWatcher, PageTextFallback,
    ProfileExtractor,
};

pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub page_load_timeout_ms: u64,
    pub ready_poll_ms: u64,
    pub selector_delay_ms: u64,
    pub strategy_delay_ms: u64,
    pub navigation_poll_ms: u64,
    pub navigation_settle_ms: u64,
    /// Locales of the page-text fallback, in order; empty disables it
    pub fallback_locales: Vec<String>,
    /// YAML file replacing the built-in strategies
    pub strategies_path: Option<PathBuf>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            page_load_timeout_ms: 5000,
            ready_poll_ms: 100,
            selector_delay_ms: 100,
            strategy_delay_ms: 1000,
            navigation_poll_ms: 1000,
            navigation_settle_ms: 2000,
            fallback_locales: vec!["pt".to_string(), "en".to_string()],
            strategies_path: None,
        }
    }
}

impl ExtractionConfig {
    pub fn timings(&self) -> ExtractionTimings {
        ExtractionTimings {
            page_load_timeout: Duration::from_millis(self.page_load_timeout_ms),
            ready_poll: Duration::from_millis(self.ready_poll_ms),
            selector_delay: Duration::from_millis(self.selector_delay_ms),
            strategy_delay: Duration::from_millis(self.strategy_delay_ms),
        }
    }

    pub fn navigation_watcher(&self) -> NavigationWatcher {
        NavigationWatcher::new(
            Duration::from_millis(self.navigation_poll_ms),
            Duration::from_millis(self.navigation_settle_ms),
        )
    }

    pub fn build_extractor(&self) -> Result<ProfileExtractor> {
        let strategies = match &self.strategies_path {
            Some(path) => load_strategies(path)?,
            None => default_strategies(),
        };
        let fallback = PageTextFallback::new(&self.fallback_locales)?;

        ProfileExtractor::new(strategies, Box::new(fallback), self.timings())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub credentials_path: PathBuf,
    pub extraction: ExtractionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            credentials_path: PathBuf::from(".hiresight/credentials.json"),
            extraction: ExtractionConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: Option<AppConfig>,
    #[serde(default)]
    production: Option<AppConfig>,
}

impl AppConfig {
    /// Load the section for the active environment, then apply env overrides.
    /// A missing file means built-in defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_yaml(&content, &environment)?
        } else {
            info!("{} not found, using defaults", path.display());
            Self::default()
        };

        config.apply_overrides(
            std::env::var("HIRESIGHT_API_URL").ok(),
            std::env::var("HIRESIGHT_CREDENTIALS").ok(),
        );
        Ok(config)
    }

    fn get_environment() -> String {
        std::env::var("HIRESIGHT_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    pub fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(content)?;

        let section = match environment {
            "production" => file.production,
            "local" => file.local,
            other => {
                return Err(HireSightError::Config(format!(
                    "unknown environment '{}', expected local or production",
                    other
                )))
            }
        };

        Ok(section.unwrap_or_else(|| {
            warn!("No '{}' section in configuration, using defaults", environment);
            Self::default()
        }))
    }

    pub fn apply_overrides(&mut self, api_url: Option<String>, credentials_path: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            info!("Backend URL overridden: {}", url);
            self.backend.base_url = url;
        }
        if let Some(path) = credentials_path.filter(|p| !p.trim().is_empty()) {
            self.credentials_path = PathBuf::from(path);
        }
    }

    pub fn credential_store(&self) -> CredentialStore {
        CredentialStore::new(&self.credentials_path)
    }

    pub fn backend_client(&self) -> Result<BackendClient> {
        BackendClient::new(
            &self.backend.base_url,
            self.backend.timeout_seconds,
            self.credential_store(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
local:
  backend:
    base_url: http://localhost:5000/api
  extraction:
    selector_delay_ms: 0
    fallback_locales: [en]
production:
  backend:
    base_url: https://api.hiresight.example/api
    timeout_seconds: 10
  credentials_path: /var/lib/hiresight/credentials.json
"#;

    #[test]
    fn test_sections_and_defaults() {
        let local = AppConfig::from_yaml(CONFIG, "local").unwrap();
        assert_eq!(local.backend.timeout_seconds, 30);
        assert_eq!(local.extraction.selector_delay_ms, 0);
        assert_eq!(local.extraction.strategy_delay_ms, 1000);
        assert_eq!(local.extraction.fallback_locales, vec!["en"]);
        assert_eq!(
            local.credentials_path,
            PathBuf::from(".hiresight/credentials.json")
        );

        let production = AppConfig::from_yaml(CONFIG, "production").unwrap();
        assert_eq!(production.backend.base_url, "https://api.hiresight.example/api");
        assert_eq!(production.backend.timeout_seconds, 10);
        assert_eq!(production.extraction, ExtractionConfig::default());
    }

    #[test]
    fn test_missing_section_and_unknown_environment() {
        let only_local = "local:\n  backend:\n    timeout_seconds: 5\n";
        assert_eq!(
            AppConfig::from_yaml(only_local, "production").unwrap(),
            AppConfig::default()
        );
        assert!(matches!(
            AppConfig::from_yaml(CONFIG, "staging"),
            Err(HireSightError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = AppConfig::load(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config.extraction, ExtractionConfig::default());
    }

    #[test]
    fn test_overrides_ignore_blank_values() {
        let mut config = AppConfig::default();
        config.apply_overrides(Some("http://10.0.0.5/api".to_string()), Some("  ".to_string()));
        assert_eq!(config.backend.base_url, "http://10.0.0.5/api");
        assert_eq!(
            config.credentials_path,
            PathBuf::from(".hiresight/credentials.json")
        );
    }

    #[test]
    fn test_extraction_settings_build_components() {
        let config = ExtractionConfig {
            fallback_locales: Vec::new(),
            selector_delay_ms: 0,
            ..ExtractionConfig::default()
        };
        let extractor = config.build_extractor().unwrap();
        assert_eq!(extractor.strategies().len(), 3);
        assert_eq!(extractor.timings().selector_delay, Duration::ZERO);
        assert_eq!(extractor.timings().strategy_delay, Duration::from_secs(1));

        let bad = ExtractionConfig {
            fallback_locales: vec!["klingon".to_string()],
            ..ExtractionConfig::default()
        };
        assert!(bad.build_extractor().is_err());
    }
}
