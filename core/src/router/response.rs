// concierge/src/router/response.rs

use crate::agents::RejectionReason;
use crate::models::{AgentName, IntentLabel};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shown whenever a turn fails for reasons the customer cannot fix.
pub const APOLOGY: &str = "I'm sorry, but I encountered an error while processing your request. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
  Success,
  Rejected,
  Error,
}

/// What the router hands back for every message, whatever happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouterResponse {
  pub status: ResponseStatus,
  pub response_text: String,
  pub intent: IntentLabel,
  pub agent_name: AgentName,
  pub extra_data: Value,
}

impl RouterResponse {
  pub fn success(intent: IntentLabel, agent_name: AgentName, response_text: String, extra_data: Value) -> Self {
    Self {
      status: ResponseStatus::Success,
      response_text,
      intent,
      agent_name,
      extra_data,
    }
  }

  pub fn rejected(reason: RejectionReason) -> Self {
    Self {
      status: ResponseStatus::Rejected,
      response_text: reason.user_message().to_string(),
      intent: IntentLabel::Unknown,
      agent_name: AgentName::Guard,
      extra_data: serde_json::json!({ "reason": reason }),
    }
  }

  /// Generic apology; `intent` and `agent_name` say how far the turn got.
  pub fn error(intent: IntentLabel, agent_name: AgentName) -> Self {
    Self {
      status: ResponseStatus::Error,
      response_text: APOLOGY.to_string(),
      intent,
      agent_name,
      extra_data: Value::Object(Default::default()),
    }
  }

  pub fn is_success(&self) -> bool {
    self.status == ResponseStatus::Success
  }
}
