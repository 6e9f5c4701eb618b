// concierge/src/models/interaction.rs

use super::intent::{AgentName, IntentLabel};
use super::message::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Append-only audit entry for one handled turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
  pub user_id: UserId,
  pub message: String,
  pub intent: IntentLabel,
  pub response: String,
  pub agent: AgentName,
  pub timestamp: DateTime<Utc>,
}
