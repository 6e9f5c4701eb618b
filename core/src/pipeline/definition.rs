// concierge/src/pipeline/definition.rs

//! The `Pipeline<TData, Err>` struct plus construction and structural edits.

use crate::core::stage::{Handler, SkipCondition, StageDef};
use crate::error::PipelineError;
use std::collections::HashMap;

/// An ordered list of named stages, each carrying `before` / `on` / `after` handlers.
///
/// `TData` is the per-run data shared through `ContextData`; `Err` is what
/// handlers fail with. Engine-level failures (a required stage without handlers)
/// reach the caller through `Err: From<PipelineError>`.
pub struct Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  pub(crate) stages: Vec<StageDef<TData>>,

  pub(crate) before: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) on: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) after: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  /// Creates a pipeline from `(name, optional, skip_if)` triples, in run order.
  pub fn new(stage_defs: &[(&str, bool, Option<SkipCondition<TData>>)]) -> Self {
    let stages = stage_defs
      .iter()
      .map(|(name, optional, skip_if)| StageDef {
        name: (*name).to_string(),
        optional: *optional,
        skip_if: skip_if.clone(),
      })
      .collect();

    Self {
      stages,
      before: HashMap::new(),
      on: HashMap::new(),
      after: HashMap::new(),
    }
  }

  pub fn stage_names(&self) -> Vec<&str> {
    self.stages.iter().map(|s| s.name.as_str()).collect()
  }

  /// Index of a stage. Panics on unknown names: a typo in a stage name is a
  /// wiring bug, not a runtime condition.
  pub(crate) fn stage_index(&self, stage_name: &str) -> usize {
    match self.stages.iter().position(|s| s.name == stage_name) {
      Some(idx) => idx,
      None => panic!("Pipeline setup error: stage '{}' is not defined.", stage_name),
    }
  }

  fn ensure_stage_not_exists(&self, stage_name: &str) {
    if self.stages.iter().any(|s| s.name == stage_name) {
      panic!("Pipeline setup error: stage '{}' is already defined.", stage_name);
    }
  }

  pub fn insert_before_stage<S: Into<String>>(
    &mut self,
    existing_stage: &str,
    new_stage: S,
    optional: bool,
    skip_if: Option<SkipCondition<TData>>,
  ) {
    let idx = self.stage_index(existing_stage);
    let name: String = new_stage.into();
    self.ensure_stage_not_exists(&name);
    self.stages.insert(idx, StageDef { name, optional, skip_if });
  }

  pub fn insert_after_stage<S: Into<String>>(
    &mut self,
    existing_stage: &str,
    new_stage: S,
    optional: bool,
    skip_if: Option<SkipCondition<TData>>,
  ) {
    let idx = self.stage_index(existing_stage);
    let name: String = new_stage.into();
    self.ensure_stage_not_exists(&name);
    self.stages.insert(idx + 1, StageDef { name, optional, skip_if });
  }

  /// Removes a stage together with all of its handlers.
  pub fn remove_stage(&mut self, stage_name: &str) -> Result<(), PipelineError> {
    let idx = self
      .stages
      .iter()
      .position(|s| s.name == stage_name)
      .ok_or_else(|| PipelineError::StageNotFound {
        stage_name: stage_name.to_string(),
      })?;
    self.stages.remove(idx);
    self.before.remove(stage_name);
    self.on.remove(stage_name);
    self.after.remove(stage_name);
    Ok(())
  }

  pub fn set_optional(&mut self, stage_name: &str, optional: bool) {
    let idx = self.stage_index(stage_name);
    self.stages[idx].optional = optional;
  }

  pub fn set_skip_condition(&mut self, stage_name: &str, skip_if: Option<SkipCondition<TData>>) {
    let idx = self.stage_index(stage_name);
    self.stages[idx].skip_if = skip_if;
  }
}
