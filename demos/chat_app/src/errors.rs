// concierge/demos/chat_app/src/errors.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Router Error: {source}")]
  Router {
    #[from]
    source: concierge::RouterError,
  },

  #[error("I/O Error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Serialization Error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
