// concierge/src/models/message.rs

use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// One inbound chat message, exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
  pub text: String,
  pub user_id: Option<UserId>,
  /// Scopes the multi-turn order dialogue; falls back to the user id.
  pub session_id: Option<String>,
}

impl Message {
  pub fn new(text: impl Into<String>) -> Self {
    Self {
      text: text.into(),
      user_id: None,
      session_id: None,
    }
  }

  pub fn from_user(mut self, user_id: UserId) -> Self {
    self.user_id = Some(user_id);
    self
  }

  pub fn in_session(mut self, session_id: impl Into<String>) -> Self {
    self.session_id = Some(session_id.into());
    self
  }
}
