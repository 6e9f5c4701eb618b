// concierge/demos/chat_app/src/config.rs

use crate::errors::{AppError, Result};
use concierge::RouterConfig;
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub user_id: i64,
  /// Falls back to the user id inside the router when unset.
  pub session_id: Option<String>,
  /// Print the full response as JSON instead of just the text.
  pub json_output: bool,
  /// Build a similarity index over the sample catalog.
  pub with_similarity: bool,
  pub router: RouterConfig,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let get_env = |var_name: &str| env::var(var_name).ok().filter(|v| !v.trim().is_empty());

    let user_id = get_env("CHAT_USER_ID")
      .unwrap_or_else(|| "1".to_string())
      .trim()
      .parse::<i64>()
      .map_err(|e| AppError::Config(format!("Invalid CHAT_USER_ID: {}", e)))?;
    let session_id = get_env("CHAT_SESSION_ID");
    let json_output = parse_flag("CHAT_JSON_OUTPUT", get_env("CHAT_JSON_OUTPUT"))?;
    let with_similarity = parse_flag("CHAT_SIMILARITY", get_env("CHAT_SIMILARITY"))?;
    let router = RouterConfig::from_env()?;

    tracing::info!("Chat configuration loaded successfully.");
    Ok(Self {
      user_id,
      session_id,
      json_output,
      with_similarity,
      router,
    })
  }
}

fn parse_flag(name: &str, raw: Option<String>) -> Result<bool> {
  match raw.as_deref().map(str::trim) {
    None => Ok(false),
    Some("1") | Some("true") | Some("yes") => Ok(true),
    Some("0") | Some("false") | Some("no") => Ok(false),
    Some(other) => Err(AppError::Config(format!("Invalid {} value: '{}'", name, other))),
  }
}
