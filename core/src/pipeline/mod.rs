// concierge/src/pipeline/mod.rs

//! The `Pipeline<TData, Err>` engine: definition, handler hooks, and execution.

pub mod definition;
pub mod execution;
pub mod hooks;

pub use definition::Pipeline;
