// src/backend/credentials.rs
//! Local persistence of the backend token and the logged-in user

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    #[serde(default)]
    pub user: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored credentials, or `None` when nobody is logged in
    pub async fn load(&self) -> Result<Option<Credentials>> {
        if !fs::try_exists(&self.path).await? {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).await?;
        let credentials: Credentials = serde_json::from_str(&content)?;
        Ok(Some(credentials))
    }

    pub async fn token(&self) -> Result<Option<String>> {
        Ok(self.load().await?.map(|c| c.access_token))
    }

    pub async fn save(&self, credentials: &Credentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string_pretty(credentials)?;
        fs::write(&self.path, content).await?;
        info!("Credentials saved to {}", self.path.display());
        Ok(())
    }

    /// Remove stored credentials. Clearing an empty store is not an error.
    pub async fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                info!("Credentials cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No credentials to clear at {}", self.path.display());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
