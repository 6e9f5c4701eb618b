// concierge/src/models/intent.rs

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentLabel {
  Order,
  Details,
  Recommendation,
  Unknown,
}

impl IntentLabel {
  pub fn as_str(&self) -> &'static str {
    match self {
      IntentLabel::Order => "order",
      IntentLabel::Details => "details",
      IntentLabel::Recommendation => "recommendation",
      IntentLabel::Unknown => "unknown",
    }
  }

  /// Responder that handles this intent. Unknown goes to the informational
  /// catch-all rather than to an error.
  pub fn agent(&self) -> AgentName {
    match self {
      IntentLabel::Order => AgentName::Order,
      IntentLabel::Details | IntentLabel::Unknown => AgentName::Details,
      IntentLabel::Recommendation => AgentName::Recommendation,
    }
  }
}

impl fmt::Display for IntentLabel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Classifier output: the winning label and how many of its patterns matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
  pub label: IntentLabel,
  pub score: usize,
}

impl Intent {
  pub fn unknown(score: usize) -> Self {
    Self {
      label: IntentLabel::Unknown,
      score,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentName {
  #[serde(rename = "guard_agent")]
  Guard,
  #[serde(rename = "order_agent")]
  Order,
  #[serde(rename = "details_agent")]
  Details,
  #[serde(rename = "recommendation_agent")]
  Recommendation,
}

impl AgentName {
  pub fn as_str(&self) -> &'static str {
    match self {
      AgentName::Guard => "guard_agent",
      AgentName::Order => "order_agent",
      AgentName::Details => "details_agent",
      AgentName::Recommendation => "recommendation_agent",
    }
  }
}

impl fmt::Display for AgentName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
