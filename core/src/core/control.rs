// concierge/src/core/control.rs

//! Flow signals returned by stage handlers, and the outcome of a whole run.

/// Returned by every handler: keep going, or end the run right here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  Continue,
  /// No further handlers of this stage, and no later stage, will run.
  /// This is how a guard stage rejects a message without raising an error.
  Stop,
}

/// Outcome of a run that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  /// Every stage was either executed or skipped.
  Completed,
  /// A handler returned `PipelineControl::Stop`.
  Stopped,
}
