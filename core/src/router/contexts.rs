// concierge/src/router/contexts.rs

use crate::agents::{AgentReply, RejectionReason};
use crate::models::{AgentName, Intent, OrderContext, UserId};

/// Everything one turn accumulates as it moves through the stages.
#[derive(Debug, Clone)]
pub struct TurnData {
  /// The message exactly as received.
  pub message: String,
  pub user_id: UserId,
  /// Trimmed text, set once the content filter accepts the message.
  pub filtered: Option<String>,
  pub rejection: Option<RejectionReason>,
  pub intent: Option<Intent>,
  /// Responder chosen by the classify stage.
  pub route: Option<AgentName>,
  /// Working copy of the session's order context; written back only on success.
  pub order: OrderContext,
  pub reply: Option<AgentReply>,
}

impl TurnData {
  pub fn new(message: impl Into<String>, user_id: UserId, order: OrderContext) -> Self {
    Self {
      message: message.into(),
      user_id,
      filtered: None,
      rejection: None,
      intent: None,
      route: None,
      order,
      reply: None,
    }
  }

  /// Text the responders work on: the filtered message, or the raw one before filtering.
  pub fn text(&self) -> &str {
    self.filtered.as_deref().unwrap_or(&self.message)
  }

  pub fn routed_to(&self, agent: AgentName) -> bool {
    self.route == Some(agent)
  }
}
