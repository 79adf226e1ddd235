//! Encouragement generation.
//!
//! # Responsibility
//! - Choose between rule-based and delegated generation.
//! - Fall back to rules when the delegated attempt fails.
//!
//! # Invariants
//! - `generate` always returns non-empty text.
//! - At most one delegated attempt per call.
//! - The outcome says which path produced the text so callers can tell the
//!   user when offline generation was used.

pub mod delegate;
pub mod rules;

use crate::config::JournalConfig;
use crate::model::entry::Mood;
use delegate::{EncouragementRequest, EncouragementSource, GenerationError, HttpEncouragementSource};
use log::{info, warn};
use rand::Rng;
use std::time::{Duration, Instant};

/// Which path produced an encouragement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationSource {
    /// Local rules, because delegation is off or unconfigured.
    Rules,
    /// Verbatim text from the external collaborator.
    Delegated,
    /// Local rules after the external collaborator failed.
    OfflineFallback,
}

impl GenerationSource {
    /// Whether the user should be told that offline mode was used.
    pub fn is_offline_fallback(self) -> bool {
        self == Self::OfflineFallback
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rules => "rules",
            Self::Delegated => "delegated",
            Self::OfflineFallback => "offline_fallback",
        }
    }
}

/// Generated text plus the path that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub text: String,
    pub source: GenerationSource,
}

/// Encouragement generator with optional delegation.
pub struct EncouragementGenerator {
    delegate: Option<Box<dyn EncouragementSource>>,
}

impl EncouragementGenerator {
    /// Generator that only uses local rules.
    pub fn rule_based() -> Self {
        Self { delegate: None }
    }

    /// Generator that tries `source` first and falls back to rules.
    pub fn delegated(source: Box<dyn EncouragementSource>) -> Self {
        Self {
            delegate: Some(source),
        }
    }

    /// Builds the generator selected by `config`.
    ///
    /// # Errors
    /// - Returns an error when delegation is enabled and the HTTP client cannot
    ///   be built. A missing endpoint is rejected earlier by config validation;
    ///   here it degrades to rules.
    pub fn from_config(config: &JournalConfig) -> Result<Self, GenerationError> {
        if !config.use_delegated_generation {
            return Ok(Self::rule_based());
        }

        let Some(endpoint) = config.delegate.endpoint.as_deref() else {
            warn!("event=generator_init module=generator status=degraded reason=missing_endpoint");
            return Ok(Self::rule_based());
        };

        let source = HttpEncouragementSource::new(
            endpoint,
            config.delegate.api_key.clone(),
            Duration::from_millis(config.delegate.timeout_ms),
        )?;
        Ok(Self::delegated(Box::new(source)))
    }

    pub fn is_delegated(&self) -> bool {
        self.delegate.is_some()
    }

    /// Produces the encouragement for one reflection.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        mood: Mood,
        reflection: &str,
        rng: &mut R,
    ) -> GenerationOutcome {
        let Some(source) = self.delegate.as_deref() else {
            return GenerationOutcome {
                text: rules::rule_based_message(mood, reflection, rng),
                source: GenerationSource::Rules,
            };
        };

        let started_at = Instant::now();
        let request = EncouragementRequest {
            mood,
            reflection: reflection.to_string(),
        };

        let fetched = source.fetch(&request).and_then(|text| {
            if text.trim().is_empty() {
                Err(GenerationError::Empty)
            } else {
                Ok(text)
            }
        });

        match fetched {
            Ok(text) => {
                info!(
                    "event=generate module=generator status=ok source={} mood={} duration_ms={} text_len={}",
                    source.source_id(),
                    mood,
                    started_at.elapsed().as_millis(),
                    text.len()
                );
                GenerationOutcome {
                    text,
                    source: GenerationSource::Delegated,
                }
            }
            Err(err) => {
                warn!(
                    "event=generate module=generator status=fallback source={} mood={} duration_ms={} error_code={} error={}",
                    source.source_id(),
                    mood,
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                GenerationOutcome {
                    text: rules::rule_based_message(mood, reflection, rng),
                    source: GenerationSource::OfflineFallback,
                }
            }
        }
    }
}

impl Default for EncouragementGenerator {
    fn default() -> Self {
        Self::rule_based()
    }
}
