pub mod context_data;
pub mod control;
pub mod stage;

pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use stage::{Handler, SkipCondition, StageDef};
