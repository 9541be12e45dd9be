//! Error types shared by extraction, scoring and the backend client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HireSightError {
    /// No extraction strategy produced a record that passes the validity check.
    #[error("insufficient profile data: no strategy succeeded (tried: {})", attempted.join(", "))]
    InsufficientData { attempted: Vec<String> },

    #[error("selector lookup failed for '{selector}': {reason}")]
    SelectorLookup { selector: String, reason: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("session expired, please log in again")]
    AuthExpired,

    #[error("not authenticated, run `hiresight login` first")]
    NotAuthenticated,

    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, HireSightError>;

impl From<reqwest::Error> for HireSightError {
    fn from(err: reqwest::Error) -> Self {
        HireSightError::Network(err.to_string())
    }
}

impl From<regex::Error> for HireSightError {
    fn from(err: regex::Error) -> Self {
        HireSightError::Config(format!("invalid pattern: {}", err))
    }
}

impl HireSightError {
    /// Errors after which the user is expected to log in again.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            HireSightError::AuthExpired | HireSightError::NotAuthenticated
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_lists_strategies() {
        let err = HireSightError::InsufficientData {
            attempted: vec!["Modern".to_string(), "Generic".to_string()],
        };
        assert!(err.to_string().contains("Modern, Generic"));
    }

    #[test]
    fn test_requires_login() {
        assert!(HireSightError::AuthExpired.requires_login());
        assert!(HireSightError::NotAuthenticated.requires_login());
        assert!(!HireSightError::Network("timeout".into()).requires_login());
    }
}
