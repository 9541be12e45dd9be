// src/backend/client.rs
//! REST client for the recruitment backend: authentication, CRUD collections,
//! candidate tags and notes, and saving finished analyses.

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::credentials::{CredentialStore, Credentials};
use crate::error::{HireSightError, Result};
use crate::types::backend::{
    AuthResponse, LoginRequest, RegisterRequest, Resource, SavedAnalysis,
};

const LOGIN_ENDPOINT: &str = "/auth/login";
const REGISTER_ENDPOINT: &str = "/auth/register";
const PROFILE_ENDPOINT: &str = "/auth/me";
const REFRESH_ENDPOINT: &str = "/auth/refresh";
const NOTES_ENDPOINT: &str = "/notes";

pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    credentials: CredentialStore,
}

impl BackendClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout_seconds: u64,
        credentials: CredentialStore,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Log in and keep the returned token for later calls
    pub async fn login(&self, email: &str, password: &str) -> Result<Credentials> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        info!("Logging in as {}", email);
        let response = self
            .client
            .post(self.url(LOGIN_ENDPOINT))
            .json(&body)
            .send()
            .await?;
        let value = self.read_public(response).await?;
        let auth: AuthResponse = serde_json::from_value(value)?;

        self.store_token(auth).await
    }

    /// Create an account. Logs the new user in when the backend hands back a token.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        info!("Registering {}", request.email);
        let response = self
            .client
            .post(self.url(REGISTER_ENDPOINT))
            .json(request)
            .send()
            .await?;
        let value = self.read_public(response).await?;
        let auth: AuthResponse = serde_json::from_value(value)?;

        if auth.access_token.is_some() {
            self.store_token(auth.clone()).await?;
        }
        Ok(auth)
    }

    /// Current user as the backend sees it; doubles as a token check
    pub async fn profile(&self) -> Result<Value> {
        self.send(Method::GET, PROFILE_ENDPOINT, None::<&()>).await
    }

    /// Exchange the current token for a fresh one. The stored user is kept
    /// when the response does not carry one.
    pub async fn refresh(&self) -> Result<Credentials> {
        let previous_user = self.credentials.load().await?.and_then(|c| c.user);
        let value = self.send(Method::POST, REFRESH_ENDPOINT, None::<&()>).await?;
        let mut auth: AuthResponse = serde_json::from_value(value)?;
        if auth.user.is_none() {
            auth.user = previous_user;
        }

        info!("Access token refreshed");
        self.store_token(auth).await
    }

    pub async fn logout(&self) -> Result<()> {
        self.credentials.clear().await
    }

    pub async fn list(&self, resource: Resource, query: &[(String, String)]) -> Result<Value> {
        let request = self
            .authorized(Method::GET, resource.path())
            .await?
            .query(query);
        self.execute(request).await
    }

    pub async fn get(&self, resource: Resource, id: &str) -> Result<Value> {
        let path = format!("{}/{}", resource.path(), id);
        self.send(Method::GET, &path, None::<&()>).await
    }

    pub async fn create(&self, resource: Resource, body: &Value) -> Result<Value> {
        self.send(Method::POST, resource.path(), Some(body)).await
    }

    pub async fn update(&self, resource: Resource, id: &str, body: &Value) -> Result<Value> {
        let path = format!("{}/{}", resource.path(), id);
        self.send(Method::PUT, &path, Some(body)).await
    }

    pub async fn delete(&self, resource: Resource, id: &str) -> Result<Value> {
        let path = format!("{}/{}", resource.path(), id);
        self.send(Method::DELETE, &path, None::<&()>).await
    }

    pub async fn add_candidate_tag(&self, candidate_id: &str, tag_id: &str) -> Result<Value> {
        let path = format!("{}/{}/tags", Resource::Candidates.path(), candidate_id);
        let body = serde_json::json!({ "tag_id": tag_id });
        self.send(Method::POST, &path, Some(&body)).await
    }

    pub async fn remove_candidate_tag(&self, candidate_id: &str, tag_id: &str) -> Result<Value> {
        let path = format!(
            "{}/{}/tags/{}",
            Resource::Candidates.path(),
            candidate_id,
            tag_id
        );
        self.send(Method::DELETE, &path, None::<&()>).await
    }

    pub async fn candidate_notes(&self, candidate_id: &str) -> Result<Value> {
        let path = format!("{}/{}/notes", Resource::Candidates.path(), candidate_id);
        self.send(Method::GET, &path, None::<&()>).await
    }

    pub async fn add_candidate_note(&self, candidate_id: &str, content: &str) -> Result<Value> {
        let path = format!("{}/{}/notes", Resource::Candidates.path(), candidate_id);
        let body = serde_json::json!({ "content": content });
        self.send(Method::POST, &path, Some(&body)).await
    }

    pub async fn update_note(&self, note_id: &str, content: &str) -> Result<Value> {
        let path = format!("{}/{}", NOTES_ENDPOINT, note_id);
        let body = serde_json::json!({ "content": content });
        self.send(Method::PUT, &path, Some(&body)).await
    }

    pub async fn delete_note(&self, note_id: &str) -> Result<Value> {
        let path = format!("{}/{}", NOTES_ENDPOINT, note_id);
        self.send(Method::DELETE, &path, None::<&()>).await
    }

    /// Persist a finished analysis as a candidate entry
    pub async fn save_analysis(&self, analysis: &SavedAnalysis) -> Result<Value> {
        info!("Saving analysis for {}", analysis.candidate_name);
        self.send(Method::POST, Resource::Candidates.path(), Some(analysis))
            .await
    }

    async fn store_token(&self, auth: AuthResponse) -> Result<Credentials> {
        let access_token = auth.access_token.ok_or_else(|| HireSightError::Backend {
            status: StatusCode::OK.as_u16(),
            message: auth
                .message
                .unwrap_or_else(|| "response carried no token".to_string()),
        })?;

        let credentials = Credentials {
            access_token,
            user: auth.user,
        };
        self.credentials.save(&credentials).await?;
        Ok(credentials)
    }

    async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.authorized(method, path).await?;
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(request).await
    }

    /// Request builder carrying the bearer token. Fails without touching the
    /// network when nobody is logged in.
    async fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let token = self
            .credentials
            .token()
            .await?
            .ok_or(HireSightError::NotAuthenticated)?;

        let url = self.url(path);
        debug!("{} {}", method, url);
        Ok(self.client.request(method, url).bearer_auth(token))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Value> {
        let response = request.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            warn!("Backend rejected the token, clearing stored credentials");
            self.credentials.clear().await?;
            return Err(HireSightError::AuthExpired);
        }

        self.read_public(response).await
    }

    async fn read_public(&self, response: Response) -> Result<Value> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = error_message(&text)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            error!("Backend error {}: {}", status, message);
            return Err(HireSightError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// `message` or `error` from a JSON error body, else the raw text
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => ["message", "error"]
            .iter()
            .find_map(|key| value.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .or_else(|| Some(trimmed.to_string())),
        Err(_) => Some(trimmed.to_string()),
    }
}
