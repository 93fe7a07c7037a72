// HTTP client for the wellness backend.
//
// Two request shapes go to the same `/chat` endpoint: a score delivery
// (`{"score": N}`) answered by `{"message": ...}`, and a free-text query
// (`{"query": ..., "timestamp": ...}`) answered by `{"response": ...}`.
// Each call is a single fire-and-forget attempt: no retry, no timeout, no
// authentication.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure of a single request attempt. Every variant is terminal for that
/// request; the orchestrator converts it into an error bubble in the
/// transcript and the conversation stays usable.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request never produced a decodable response (connection refused,
    /// reset, undecodable body, ...).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("service returned HTTP {status}")]
    UnexpectedStatus { status: StatusCode },
    /// The service answered 2xx but the expected reply field was missing.
    #[error("service response had no usable '{field}' field")]
    MalformedResponse { field: &'static str },
}

// ---------------------------------------------------------------------------
// WellnessClient
// ---------------------------------------------------------------------------

/// Client for the external wellness service.
pub struct WellnessClient {
    http: reqwest::Client,
    base_url: String,
}

impl WellnessClient {
    /// Create a client for the service rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        WellnessClient {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Build a client from the application config.
    pub fn from_config(config: &crate::config::Config) -> Self {
        WellnessClient::new(config.backend.base_url.clone())
    }

    fn chat_endpoint(&self) -> String {
        format!("{}/chat", self.base_url.trim_end_matches('/'))
    }

    /// Deliver a completed screening score and return the service's
    /// acknowledgement text.
    ///
    /// The score reply is required to carry a `message` field; a 2xx
    /// response without one is treated as malformed.
    pub async fn send_score(&self, score: u8) -> Result<String, ServiceError> {
        let body = serde_json::json!({ "score": score });
        debug!(score, "delivering screening score");

        let response = self
            .http
            .post(self.chat_endpoint())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::UnexpectedStatus { status });
        }

        let value: Value = response.json().await?;
        parse_score_reply(&value).ok_or(ServiceError::MalformedResponse { field: "message" })
    }

    /// Forward a user chat message stamped with the send time.
    ///
    /// Returns `Ok(None)` when the service answers 2xx without a `response`
    /// field; the caller substitutes its fixed fallback text. Only transport
    /// problems and non-2xx statuses are errors.
    pub async fn send_query(
        &self,
        query: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<String>, ServiceError> {
        let body = serde_json::json!({
            "query": query,
            "timestamp": format_timestamp(timestamp),
        });
        debug!("forwarding chat query");

        let response = self
            .http
            .post(self.chat_endpoint())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::UnexpectedStatus { status });
        }

        let value: Value = response.json().await?;
        Ok(parse_query_reply(&value))
    }
}

// ---------------------------------------------------------------------------
// Reply parsing helpers
// ---------------------------------------------------------------------------

/// Extract the acknowledgement text from a score-delivery reply.
///
/// Expected shape: `{ "status": "success", "score": N, "message": "..." }`;
/// only `message` matters here.
pub(crate) fn parse_score_reply(value: &Value) -> Option<String> {
    value.get("message")?.as_str().map(|s| s.to_string())
}

/// Extract the reply text from a chat-query response.
///
/// Expected shape: `{ "status": "success", "response": "...", "timestamp":
/// "..." }`; a missing or non-string `response` reads as `None`.
pub(crate) fn parse_query_reply(value: &Value) -> Option<String> {
    value.get("response")?.as_str().map(|s| s.to_string())
}

/// UTC timestamp in the wire format the service expects
/// (RFC 3339 with millisecond precision and a `Z` suffix).
pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
