// concierge/src/config.rs

use crate::error::{RouterError, RouterResult};
use crate::models::UserId;
use std::env;
use std::time::Duration;

/// Tunables for a `Router`.
#[derive(Debug, Clone)]
pub struct RouterConfig {
  /// Upper bound for any single collaborator call (catalog, order store, log, embeddings).
  pub collaborator_timeout: Duration,
  /// Used when a message carries no user id. There is no auth layer in this crate.
  pub default_user_id: UserId,
  /// Trimmed messages shorter than this are rejected as too short.
  pub min_message_chars: usize,
  /// Untrimmed messages longer than this are rejected as too long.
  pub max_message_chars: usize,
  pub recommendation_limit: usize,
  /// Neighbours requested from the similarity service, when one is wired in.
  pub similarity_k: usize,
}

impl Default for RouterConfig {
  fn default() -> Self {
    Self {
      collaborator_timeout: Duration::from_secs(5),
      default_user_id: 1,
      min_message_chars: 2,
      max_message_chars: 500,
      recommendation_limit: 5,
      similarity_k: 3,
    }
  }
}

impl RouterConfig {
  /// Defaults overridden by any `CONCIERGE_*` variables that are set.
  ///
  /// Recognised: `CONCIERGE_COLLABORATOR_TIMEOUT_MS`, `CONCIERGE_DEFAULT_USER_ID`,
  /// `CONCIERGE_MIN_MESSAGE_CHARS`, `CONCIERGE_MAX_MESSAGE_CHARS`,
  /// `CONCIERGE_RECOMMENDATION_LIMIT`, `CONCIERGE_SIMILARITY_K`.
  pub fn from_env() -> RouterResult<Self> {
    let defaults = Self::default();

    let timeout_ms = parse_var("CONCIERGE_COLLABORATOR_TIMEOUT_MS")?
      .unwrap_or(defaults.collaborator_timeout.as_millis() as u64);

    let config = Self {
      collaborator_timeout: Duration::from_millis(timeout_ms),
      default_user_id: parse_var("CONCIERGE_DEFAULT_USER_ID")?.unwrap_or(defaults.default_user_id),
      min_message_chars: parse_var("CONCIERGE_MIN_MESSAGE_CHARS")?.unwrap_or(defaults.min_message_chars),
      max_message_chars: parse_var("CONCIERGE_MAX_MESSAGE_CHARS")?.unwrap_or(defaults.max_message_chars),
      recommendation_limit: parse_var("CONCIERGE_RECOMMENDATION_LIMIT")?.unwrap_or(defaults.recommendation_limit),
      similarity_k: parse_var("CONCIERGE_SIMILARITY_K")?.unwrap_or(defaults.similarity_k),
    };
    config.validate()?;

    tracing::debug!(config = ?config, "Router configuration loaded.");
    Ok(config)
  }

  pub fn validate(&self) -> RouterResult<()> {
    if self.collaborator_timeout.is_zero() {
      return Err(RouterError::Config("collaborator timeout must be non-zero".to_string()));
    }
    if self.min_message_chars > self.max_message_chars {
      return Err(RouterError::Config(format!(
        "min_message_chars ({}) exceeds max_message_chars ({})",
        self.min_message_chars, self.max_message_chars
      )));
    }
    Ok(())
  }
}

fn parse_var<T>(name: &str) -> RouterResult<Option<T>>
where
  T: std::str::FromStr,
  T::Err: std::fmt::Display,
{
  match env::var(name) {
    Ok(raw) => raw
      .trim()
      .parse::<T>()
      .map(Some)
      .map_err(|e| RouterError::Config(format!("Invalid {}: {}", name, e))),
    Err(env::VarError::NotPresent) => Ok(None),
    Err(e) => Err(RouterError::Config(format!("Unreadable {}: {}", name, e))),
  }
}
