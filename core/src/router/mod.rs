// concierge/src/router/mod.rs

//! The orchestrator: one `handle` call per inbound chat message.
//!
//! A turn locks its session, runs the stage pipeline over a working copy of
//! the session's `OrderContext`, and then commits:
//! - success: the context is written back and the interaction recorded;
//! - rejection: nothing is written back, the interaction is recorded under `guard_agent`;
//! - failure: nothing is written back or recorded, the caller gets an apology.
//!
//! Interaction writes run on background tasks after the reply is built.

pub mod contexts;
pub mod response;
pub mod stages;

pub use contexts::TurnData;
pub use response::{ResponseStatus, RouterResponse, APOLOGY};

use crate::agents::{
  ContentFilter, DetailsResponder, IntentClassifier, OrderStateMachine, RecommendationResponder,
};
use crate::collab::{bounded, ContentLookup, InteractionLog, OrderStore, SimilaritySearch};
use crate::config::RouterConfig;
use crate::core::{ContextData, PipelineResult};
use crate::error::{RouterError, RouterResult};
use crate::models::{AgentName, InteractionRecord, IntentLabel, Message, OrderContext, UserId};
use crate::pipeline::Pipeline;
use crate::session::SessionStore;
use chrono::Utc;
use parking_lot::Mutex;
use stages::Agents;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, field, info, instrument, warn, Instrument};
use uuid::Uuid;

pub struct Router {
  config: RouterConfig,
  pipeline: Pipeline<TurnData, RouterError>,
  catalog: Arc<dyn ContentLookup>,
  orders: Arc<dyn OrderStore>,
  interactions: Arc<dyn InteractionLog>,
  sessions: SessionStore,
  pending_log: Mutex<JoinSet<()>>,
}

impl Router {
  pub fn new(
    config: RouterConfig,
    catalog: Arc<dyn ContentLookup>,
    orders: Arc<dyn OrderStore>,
    interactions: Arc<dyn InteractionLog>,
  ) -> Self {
    let pipeline = stages::build(Arc::new(Self::agents(&config, &catalog, &orders, None)));
    Self {
      config,
      pipeline,
      catalog,
      orders,
      interactions,
      sessions: SessionStore::new(),
      pending_log: Mutex::new(JoinSet::new()),
    }
  }

  /// Rebuilds the stages so the details responder attaches similarity neighbours.
  pub fn with_similarity(mut self, similarity: Arc<dyn SimilaritySearch>) -> Self {
    let agents = Self::agents(&self.config, &self.catalog, &self.orders, Some(similarity));
    self.pipeline = stages::build(Arc::new(agents));
    self
  }

  fn agents(
    config: &RouterConfig,
    catalog: &Arc<dyn ContentLookup>,
    orders: &Arc<dyn OrderStore>,
    similarity: Option<Arc<dyn SimilaritySearch>>,
  ) -> Agents {
    let timeout = config.collaborator_timeout;
    let mut details = DetailsResponder::new(catalog.clone(), timeout);
    if let Some(similarity) = similarity {
      details = details.with_similarity(similarity, config.similarity_k);
    }
    Agents {
      filter: ContentFilter::with_limits(config.min_message_chars, config.max_message_chars),
      classifier: IntentClassifier::new(),
      order: OrderStateMachine::new(catalog.clone(), orders.clone(), timeout),
      details,
      recommendation: RecommendationResponder::new(catalog.clone(), config.recommendation_limit, timeout),
    }
  }

  pub fn config(&self) -> &RouterConfig {
    &self.config
  }

  pub fn stage_names(&self) -> Vec<&str> {
    self.pipeline.stage_names()
  }

  /// Current order context of a session with an order in progress, if no turn is holding it.
  pub fn session_context(&self, session_key: &str) -> Option<OrderContext> {
    self.sessions.get(session_key)
  }

  /// Sessions currently kept, including any held by an in-flight turn.
  pub fn active_sessions(&self) -> usize {
    self.sessions.len()
  }

  /// Drops a session's order context.
  pub fn forget_session(&self, session_key: &str) -> bool {
    self.sessions.remove(session_key)
  }

  pub async fn handle(&self, text: &str, user_id: Option<UserId>, session_id: Option<&str>) -> RouterResponse {
    self
      .handle_message(Message {
        text: text.to_string(),
        user_id,
        session_id: session_id.map(str::to_string),
      })
      .await
  }

  /// Never fails: every outcome, including collaborator trouble, is a `RouterResponse`.
  #[instrument(
    name = "Router::handle",
    skip_all,
    fields(request_id = %Uuid::new_v4(), user_id = field::Empty, session = field::Empty)
  )]
  pub async fn handle_message(&self, message: Message) -> RouterResponse {
    let user_id = message.user_id.unwrap_or(self.config.default_user_id);
    let session_key = message.session_id.clone().unwrap_or_else(|| user_id.to_string());
    let span = tracing::Span::current();
    span.record("user_id", user_id);
    span.record("session", session_key.as_str());

    let mut session = self.sessions.lock(&session_key).await;
    let ctx = ContextData::new(TurnData::new(message.text.clone(), user_id, (*session).clone()));

    let outcome = self.pipeline.run(ctx.clone()).await;
    let turn = ctx.into_inner();

    let response = match outcome.and_then(|result| Self::respond(result, &turn)) {
      Ok(response) => response,
      Err(e) => {
        error!(error = %e, "Turn failed; session left unchanged.");
        self.sessions.release(&session_key, session);
        return RouterResponse::error(
          turn.intent.map_or(IntentLabel::Unknown, |i| i.label),
          turn.route.unwrap_or(AgentName::Details),
        );
      }
    };

    if response.is_success() {
      *session = turn.order;
    }
    self.sessions.release(&session_key, session);

    info!(
      status = ?response.status,
      intent = %response.intent,
      agent = %response.agent_name,
      "Turn handled."
    );
    self.record(user_id, &message.text, &response);
    response
  }

  fn respond(result: PipelineResult, turn: &TurnData) -> RouterResult<RouterResponse> {
    match result {
      PipelineResult::Stopped => {
        let reason = turn
          .rejection
          .ok_or_else(|| RouterError::Internal("pipeline stopped without a rejection".to_string()))?;
        Ok(RouterResponse::rejected(reason))
      }
      PipelineResult::Completed => {
        let (Some(intent), Some(agent), Some(reply)) = (turn.intent, turn.route, turn.reply.clone()) else {
          return Err(RouterError::Internal("pipeline completed without a reply".to_string()));
        };
        Ok(RouterResponse::success(intent.label, agent, reply.response, reply.extra_data))
      }
    }
  }

  /// Queues the interaction write on a background task; the reply never waits for it.
  fn record(&self, user_id: UserId, message: &str, response: &RouterResponse) {
    let record = InteractionRecord {
      user_id,
      message: message.to_string(),
      intent: response.intent,
      response: response.response_text.clone(),
      agent: response.agent_name,
      timestamp: Utc::now(),
    };
    let log = self.interactions.clone();
    let timeout = self.config.collaborator_timeout;

    let mut pending = self.pending_log.lock();
    while pending.try_join_next().is_some() {}
    pending.spawn(
      async move {
        if let Err(e) = bounded("interaction_log", timeout, log.record(record)).await {
          warn!(error = %e, "Interaction could not be recorded.");
        }
      }
      .in_current_span(),
    );
  }

  /// Waits for every queued interaction write to finish or time out.
  ///
  /// Writes still pending when the router is dropped are aborted.
  pub async fn flush_interactions(&self) {
    let mut pending = std::mem::take(&mut *self.pending_log.lock());
    while pending.join_next().await.is_some() {}
  }
}
