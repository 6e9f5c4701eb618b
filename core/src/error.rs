// concierge/src/error.rs
use anyhow::Error as AnyhowError;
use std::time::Duration;
use thiserror::Error;

/// Failures raised by the stage pipeline engine itself.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Stage not found: {stage_name}")]
    StageNotFound { stage_name: String },

    #[error("Handler missing for non-optional stage: {stage_name}")]
    HandlerMissing { stage_name: String },
}

/// Everything that can go wrong while routing one chat turn.
///
/// User-facing rejections and extraction misses are *not* errors; they are
/// regular responses. Only collaborator trouble and broken invariants land here.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("Collaborator '{collaborator}' failed: {source}")]
    Collaborator {
        collaborator: &'static str,
        #[source]
        source: AnyhowError,
    },

    #[error("Collaborator '{collaborator}' did not answer within {after:?}")]
    Timeout {
        collaborator: &'static str,
        after: Duration,
    },

    #[error("Pipeline error: {source}")]
    Pipeline {
        #[from]
        source: PipelineError,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal router error: {0}")]
    Internal(String),
}

pub type RouterResult<T, E = RouterError> = std::result::Result<T, E>;
