// concierge/src/pipeline/execution.rs

//! `Pipeline::run()`: walks the stages in order and enforces the early-exit contract.

use crate::core::context_data::ContextData;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::core::stage::Handler;
use crate::error::PipelineError;
use crate::pipeline::definition::Pipeline;
use tracing::{debug, debug_span, error, info, instrument, trace, Instrument};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  /// Executes every stage against `ctx_data`.
  ///
  /// Per stage: evaluate `skip_if`, then run `before`, `on` and `after`
  /// handlers in registration order. The first `Stop` ends the run with
  /// `PipelineResult::Stopped`; the first error ends it with that error.
  /// A non-optional stage with no handlers at all fails with
  /// `PipelineError::HandlerMissing`.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(
      context_type = %std::any::type_name::<TData>(),
      num_stages = self.stages.len(),
    ),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    debug!("Pipeline run starting.");

    for (stage_idx, stage) in self.stages.iter().enumerate() {
      let stage_name = stage.name.as_str();

      if let Some(skip) = &stage.skip_if {
        if skip(ctx_data.clone()) {
          debug!(stage = stage_name, "Stage skipped by skip_if condition.");
          continue;
        }
      }

      let phases: [(&'static str, Option<&Vec<Handler<TData, Err>>>); 3] = [
        ("before", self.before.get(stage_name)),
        ("on", self.on.get(stage_name)),
        ("after", self.after.get(stage_name)),
      ];

      let has_handlers = phases.iter().any(|(_, h)| h.is_some_and(|v| !v.is_empty()));
      if !has_handlers {
        if stage.optional {
          debug!(stage = stage_name, "Optional stage has no handlers, skipping.");
          continue;
        }
        error!(stage = stage_name, "Non-optional stage has no handlers.");
        return Err(Err::from(PipelineError::HandlerMissing {
          stage_name: stage.name.clone(),
        }));
      }

      for (phase, handlers) in phases {
        let Some(handlers) = handlers else { continue };
        for (handler_idx, handler) in handlers.iter().enumerate() {
          let span = debug_span!(
            "stage_handler",
            stage = stage_name,
            stage_index = stage_idx,
            phase,
            handler_index = handler_idx
          );
          match handler(ctx_data.clone()).instrument(span).await {
            Ok(PipelineControl::Continue) => trace!(stage = stage_name, phase, "Handler continued."),
            Ok(PipelineControl::Stop) => {
              info!(stage = stage_name, phase, "Pipeline stopped by handler.");
              return Ok(PipelineResult::Stopped);
            }
            Err(e) => {
              error!(stage = stage_name, phase, error = %e, "Stage handler failed.");
              return Err(e);
            }
          }
        }
      }
      debug!(stage = stage_name, "Stage finished.");
    }

    debug!("Pipeline run completed.");
    Ok(PipelineResult::Completed)
  }
}
