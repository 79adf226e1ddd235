//! Delegated encouragement generation.
//!
//! # Responsibility
//! - Define the collaborator contract for external text generation.
//! - Provide a blocking HTTP implementation of that contract.
//!
//! # Invariants
//! - One request per call; no retry.
//! - Every failure mode maps to a `GenerationError` instead of panicking.
//! - Request timeouts are owned by the HTTP client, not the caller.

use crate::model::entry::Mood;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Payload sent to the external generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncouragementRequest {
    pub mood: Mood,
    pub reflection: String,
}

/// Failure of one delegated generation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Client setup, connection, or timeout failure.
    Transport(String),
    /// Server answered with a non-success HTTP status.
    Status(u16),
    /// Body could not be decoded into the expected shape.
    Malformed(String),
    /// Body decoded but carried no usable text.
    Empty,
}

impl Display for GenerationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "generation transport failed: {message}"),
            Self::Status(code) => write!(f, "generation service returned HTTP {code}"),
            Self::Malformed(message) => write!(f, "generation response is malformed: {message}"),
            Self::Empty => write!(f, "generation response is empty"),
        }
    }
}

impl Error for GenerationError {}

impl GenerationError {
    /// Short stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Status(_) => "status",
            Self::Malformed(_) => "malformed",
            Self::Empty => "empty",
        }
    }
}

/// External text-generation collaborator.
pub trait EncouragementSource {
    /// Stable identifier for diagnostics.
    fn source_id(&self) -> &str;
    /// Performs exactly one generation attempt.
    fn fetch(&self, request: &EncouragementRequest) -> Result<String, GenerationError>;
}

#[derive(Debug, Deserialize)]
struct EncouragementResponse {
    encouragement: String,
}

/// Blocking HTTP generator posting `{mood, reflection}` as JSON.
///
/// Expects a JSON object with a string `encouragement` field in return.
pub struct HttpEncouragementSource {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
}

impl HttpEncouragementSource {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| GenerationError::Transport(format!("failed to build client: {err}")))?;

        Ok(Self {
            endpoint: endpoint.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

impl EncouragementSource for HttpEncouragementSource {
    fn source_id(&self) -> &str {
        "http"
    }

    fn fetch(&self, request: &EncouragementRequest) -> Result<String, GenerationError> {
        let mut builder = self.client.post(self.endpoint.as_str()).json(request);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder
            .send()
            .map_err(|err| GenerationError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Status(status.as_u16()));
        }

        let body: EncouragementResponse = response
            .json()
            .map_err(|err| GenerationError::Malformed(err.to_string()))?;

        if body.encouragement.trim().is_empty() {
            return Err(GenerationError::Empty);
        }
        Ok(body.encouragement)
    }
}

#[cfg(test)]
mod tests {
    use super::{EncouragementRequest, GenerationError, HttpEncouragementSource};
    use crate::model::entry::Mood;
    use std::time::Duration;

    #[test]
    fn request_serializes_mood_as_lowercase_key() {
        let request = EncouragementRequest {
            mood: Mood::Overwhelmed,
            reflection: "deadlines".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["mood"], "overwhelmed");
        assert_eq!(json["reflection"], "deadlines");
    }

    #[test]
    fn blank_api_key_is_ignored() {
        let source = HttpEncouragementSource::new(
            "http://127.0.0.1:1/encourage",
            Some("   ".to_string()),
            Duration::from_millis(200),
        )
        .unwrap();
        assert!(source.api_key.is_none());
        assert_eq!(source.endpoint(), "http://127.0.0.1:1/encourage");
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(GenerationError::Status(502).code(), "status");
        assert_eq!(GenerationError::Empty.code(), "empty");
    }
}
