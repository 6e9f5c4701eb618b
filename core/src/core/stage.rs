// concierge/src/core/stage.rs

//! A single named stage of a pipeline and the handler type bound to it.

use super::{ContextData, PipelineControl};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Evaluated right before a stage runs; `true` skips the stage entirely.
pub type SkipCondition<TData> = Arc<dyn Fn(ContextData<TData>) -> bool + Send + Sync + 'static>;

/// An async stage handler.
///
/// It receives its own clone of the run's `ContextData`, must release any lock
/// guard before awaiting, and tells the pipeline whether to go on.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>
    + Send
    + Sync,
>;

/// Name, optionality and skip condition of one stage.
#[derive(Clone)]
pub struct StageDef<T: 'static + Send + Sync> {
  pub name: String,
  /// An optional stage without handlers is passed over instead of failing the run.
  pub optional: bool,
  pub skip_if: Option<SkipCondition<T>>,
}

impl<T: 'static + Send + Sync> std::fmt::Debug for StageDef<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StageDef")
      .field("name", &self.name)
      .field("optional", &self.optional)
      .field("skip_if_present", &self.skip_if.is_some())
      .finish()
  }
}
