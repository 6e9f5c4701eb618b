// concierge/src/agents/mod.rs

//! The stages a chat turn passes through: the guard (content filter), the intent
//! classifier, the order dialogue and the two single-turn responders.

pub mod classifier;
pub mod details;
pub mod extract;
pub mod guard;
pub mod order;
pub mod recommendation;

use regex::{Regex, RegexBuilder};
use serde_json::Value;

pub use classifier::IntentClassifier;
pub use details::DetailsResponder;
pub use extract::FieldExtractor;
pub use guard::{ContentFilter, FilterVerdict, RejectionReason};
pub use order::{OrderStateMachine, OrderTurn};
pub use recommendation::{Preferences, RecommendationResponder};

/// What a responder hands back to the router.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentReply {
  pub response: String,
  pub extra_data: Value,
}

/// Compiles one of the crate's built-in, case-insensitive patterns.
///
/// The patterns are string literals in this crate; a failure here is a
/// programming error caught by the first test that touches the agent.
pub(crate) fn builtin_regex(pattern: &str) -> Regex {
  RegexBuilder::new(pattern)
    .case_insensitive(true)
    .build()
    .unwrap_or_else(|e| panic!("built-in pattern {:?} does not compile: {}", pattern, e))
}
