// concierge/demos/chat_app/src/main.rs

mod config;
mod errors;

use crate::config::AppConfig;
use crate::errors::Result as AppResult;

use concierge::{FlatIndex, InMemoryCatalog, InMemoryInteractionLog, InMemoryOrderStore, Router, RouterResponse};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> AppResult<()> {
  // Logs go to stderr so replies on stdout stay clean.
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE)
    .with_writer(std::io::stderr)
    .init();

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => cfg,
    Err(e) => {
      tracing::error!(error = %e, "Failed to load chat configuration.");
      return Err(e);
    }
  };

  let catalog = InMemoryCatalog::sample();
  let index = app_config
    .with_similarity
    .then(|| Arc::new(FlatIndex::from_catalog(catalog.products(), catalog.faqs())));

  let orders = Arc::new(InMemoryOrderStore::new());
  let mut router = Router::new(
    app_config.router.clone(),
    Arc::new(catalog),
    orders.clone(),
    Arc::new(InMemoryInteractionLog::new()),
  );
  if let Some(index) = index {
    router = router.with_similarity(index);
  }
  tracing::info!(stages = ?router.stage_names(), "Router ready.");

  let mut stdout = tokio::io::stdout();
  stdout.write_all(b"Type a message, or 'quit' to exit.\n> ").await?;
  stdout.flush().await?;

  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  while let Some(line) = lines.next_line().await? {
    let line = line.trim();
    if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
      break;
    }

    let response = router
      .handle(line, Some(app_config.user_id), app_config.session_id.as_deref())
      .await;
    let rendered = render(&response, app_config.json_output)?;
    stdout.write_all(rendered.as_bytes()).await?;
    stdout.write_all(b"\n> ").await?;
    stdout.flush().await?;
  }

  router.flush_interactions().await;
  tracing::info!(orders_placed = orders.orders().len(), "Chat session ended.");
  Ok(())
}

fn render(response: &RouterResponse, json: bool) -> AppResult<String> {
  if json {
    return Ok(serde_json::to_string_pretty(response)?);
  }
  Ok(format!("[{} / {}] {}", response.agent_name.as_str(), response.intent.as_str(), response.response_text))
}
