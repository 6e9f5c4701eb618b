// concierge/src/agents/guard.rs

//! First stage of every turn: reject profanity, spam and malformed input.

use super::builtin_regex;
use regex::Regex;
use serde::{Deserialize, Serialize};

const PROFANITY: &str =
  r"\b(fuck|shit|ass|bitch|cunt|damn|dick|piss|cock|pussy|asshole)\b";

const SPAM: &[&str] = &[
  r"buy now",
  r"click here",
  r"limited time offer",
  r"www\.",
  r"http",
  r"\b[a-z0-9-]+\.(com|net|org|biz|info|xyz)\b",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
  Profanity,
  Spam,
  TooShort,
  TooLong,
}

impl RejectionReason {
  /// Text shown to the user in place of an answer.
  pub fn user_message(&self) -> &'static str {
    match self {
      RejectionReason::Profanity => "Your message contains inappropriate language. Please rephrase your request.",
      RejectionReason::Spam => {
        "Your message appears to be spam or promotional content, which is not supported."
      }
      RejectionReason::TooShort => "Please provide a valid message.",
      RejectionReason::TooLong => "Your message is too long. Please keep your message under 500 characters.",
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      RejectionReason::Profanity => "profanity",
      RejectionReason::Spam => "spam",
      RejectionReason::TooShort => "too_short",
      RejectionReason::TooLong => "too_long",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterVerdict {
  /// Carries the trimmed message that later stages work on.
  Accepted { text: String },
  Rejected { reason: RejectionReason },
}

impl FilterVerdict {
  pub fn is_accepted(&self) -> bool {
    matches!(self, FilterVerdict::Accepted { .. })
  }

  pub fn reason(&self) -> Option<RejectionReason> {
    match self {
      FilterVerdict::Accepted { .. } => None,
      FilterVerdict::Rejected { reason } => Some(*reason),
    }
  }
}

#[derive(Debug, Clone)]
pub struct ContentFilter {
  profanity: Regex,
  spam: Vec<Regex>,
  min_chars: usize,
  max_chars: usize,
}

impl ContentFilter {
  pub fn new() -> Self {
    Self::with_limits(2, 500)
  }

  pub fn with_limits(min_chars: usize, max_chars: usize) -> Self {
    Self {
      profanity: builtin_regex(PROFANITY),
      spam: SPAM.iter().map(|p| builtin_regex(p)).collect(),
      min_chars,
      max_chars,
    }
  }

  /// Rules apply in a fixed order and the first hit decides:
  /// profanity, spam, too short (trimmed), too long (untrimmed).
  /// Lengths count characters, not bytes.
  pub fn check(&self, message: &str) -> FilterVerdict {
    if self.profanity.is_match(message) {
      return FilterVerdict::Rejected {
        reason: RejectionReason::Profanity,
      };
    }

    if self.spam.iter().any(|p| p.is_match(message)) {
      return FilterVerdict::Rejected {
        reason: RejectionReason::Spam,
      };
    }

    let trimmed = message.trim();
    if trimmed.chars().count() < self.min_chars {
      return FilterVerdict::Rejected {
        reason: RejectionReason::TooShort,
      };
    }

    if message.chars().count() > self.max_chars {
      return FilterVerdict::Rejected {
        reason: RejectionReason::TooLong,
      };
    }

    FilterVerdict::Accepted {
      text: trimmed.to_string(),
    }
  }
}

impl Default for ContentFilter {
  fn default() -> Self {
    Self::new()
  }
}
