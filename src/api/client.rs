//! HTTP client for the tracker's REST API, with connection pooling.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use serde_json::Value;

use crate::error::SubmitError;
use crate::model::EntityKind;

use super::RecordSubmitter;

pub struct TrackerClient {
    base_url: String,
    token: Option<String>,
    http_client: reqwest::Client,
}

impl TrackerClient {
    pub fn new(host: &str, token: Option<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("subtrack-cli/0.1")
            .build()
            .expect("Failed to build HTTP client");

        Self {
            base_url: host.trim_end_matches('/').to_string(),
            token,
            http_client,
        }
    }
}

#[async_trait]
impl RecordSubmitter for TrackerClient {
    async fn submit(&self, kind: EntityKind, payload: Value) -> Result<Value, SubmitError> {
        let url = format!("{}/api/{}", self.base_url, kind.collection());
        debug!("POST {url}");

        let mut request = self.http_client.post(&url).json(&payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SubmitError::failure(format!("request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await.unwrap_or(Value::Null));
        }

        let body = response.text().await.unwrap_or_default();
        let message =
            extract_message(&body).unwrap_or_else(|| format!("server returned {status}"));
        Err(classify(status, message))
    }
}

/// Duplicate/conflict detection: HTTP 409, with an "already exists" message
/// substring as a fallback for backends that wrap status codes. Best-effort
/// heuristic; everything else is a plain failure.
fn classify(status: StatusCode, message: String) -> SubmitError {
    if status == StatusCode::CONFLICT || message.to_lowercase().contains("already exists") {
        SubmitError::conflict(message)
    } else {
        SubmitError::failure(message)
    }
}

/// Pull a human-readable message out of a JSON error body, falling back to
/// the raw body when it is short, plain text.
fn extract_message(body: &str) -> Option<String> {
    if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error", "detail"] {
            if let Some(Value::String(message)) = obj.get(key) {
                if !message.trim().is_empty() {
                    return Some(message.trim().to_string());
                }
            }
        }
        return None;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed.len() > 200 {
        None
    } else {
        Some(trimmed.to_string())
    }
}
