// concierge/src/lib.rs

//! Concierge: a staged conversational request router for an e-commerce chat bot.
//!
//! Every inbound message walks the same pipeline:
//!  - a content filter rejects profanity, spam and malformed input;
//!  - a rule-based intent classifier labels what is left;
//!  - exactly one responder answers: the multi-turn order dialogue, the
//!    product/FAQ lookup, or the recommender.
//!
//! Storage, interaction logging and similarity search sit behind async traits
//! in [`collab`]; in-memory implementations ship with the crate.
//!
//! The stages run on a small async pipeline engine ([`Pipeline`]) with named
//! stages, `before`/`on`/`after` handlers, skip conditions and early exit.

pub mod agents;
pub mod collab;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod router;
pub mod session;

// --- Re-exports for the Public API ---

pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::stage::{Handler, SkipCondition, StageDef};
pub use crate::pipeline::Pipeline;

pub use crate::agents::{
  AgentReply, ContentFilter, DetailsResponder, FieldExtractor, FilterVerdict, IntentClassifier, OrderStateMachine,
  OrderTurn, Preferences, RecommendationResponder, RejectionReason,
};
pub use crate::collab::{
  ContentLookup, FlatIndex, InMemoryCatalog, InMemoryInteractionLog, InMemoryOrderStore, InteractionLog, OrderStore,
  SimilaritySearch,
};
pub use crate::config::RouterConfig;
pub use crate::error::{PipelineError, RouterError, RouterResult};
pub use crate::router::{ResponseStatus, Router, RouterResponse};
pub use crate::session::SessionStore;
