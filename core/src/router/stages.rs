// concierge/src/router/stages.rs

//! Wiring of the agents into a `Pipeline<TurnData, RouterError>`.
//!
//! content_filter -> classify_intent -> exactly one of the three responder
//! stages. A rejected message stops the run after the first stage.

use super::contexts::TurnData;
use crate::agents::{
  AgentReply, ContentFilter, DetailsResponder, FilterVerdict, IntentClassifier, OrderStateMachine, RecommendationResponder,
};
use crate::core::{ContextData, PipelineControl, SkipCondition};
use crate::error::RouterError;
use crate::models::{AgentName, IntentLabel};
use crate::pipeline::Pipeline;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

pub const CONTENT_FILTER: &str = "content_filter";
pub const CLASSIFY_INTENT: &str = "classify_intent";
pub const ORDER_AGENT: &str = "order_agent";
pub const DETAILS_AGENT: &str = "details_agent";
pub const RECOMMENDATION_AGENT: &str = "recommendation_agent";

pub(crate) struct Agents {
  pub filter: ContentFilter,
  pub classifier: IntentClassifier,
  pub order: OrderStateMachine,
  pub details: DetailsResponder,
  pub recommendation: RecommendationResponder,
}

fn unless_routed_to(agent: AgentName) -> Option<SkipCondition<TurnData>> {
  Some(Arc::new(move |ctx: ContextData<TurnData>| !ctx.read().routed_to(agent)))
}

pub(crate) fn build(agents: Arc<Agents>) -> Pipeline<TurnData, RouterError> {
  let mut pipeline = Pipeline::new(&[
    (CONTENT_FILTER, false, None),
    (CLASSIFY_INTENT, false, None),
    (ORDER_AGENT, false, unless_routed_to(AgentName::Order)),
    (DETAILS_AGENT, false, unless_routed_to(AgentName::Details)),
    (RECOMMENDATION_AGENT, false, unless_routed_to(AgentName::Recommendation)),
  ]);

  let a = agents.clone();
  pipeline.on_stage(CONTENT_FILTER, move |ctx: ContextData<TurnData>| {
    let agents = a.clone();
    Box::pin(async move {
      let mut data = ctx.write();
      match agents.filter.check(&data.message) {
        FilterVerdict::Accepted { text } => {
          data.filtered = Some(text);
          Ok::<_, RouterError>(PipelineControl::Continue)
        }
        FilterVerdict::Rejected { reason } => {
          info!(reason = reason.as_str(), "Message rejected by content filter.");
          data.rejection = Some(reason);
          data.route = Some(AgentName::Guard);
          Ok(PipelineControl::Stop)
        }
      }
    })
  });

  let a = agents.clone();
  pipeline.on_stage(CLASSIFY_INTENT, move |ctx: ContextData<TurnData>| {
    let agents = a.clone();
    Box::pin(async move {
      let mut data = ctx.write();
      let intent = agents.classifier.classify(data.text());
      let route = if data.order.in_progress() || intent.label == IntentLabel::Order {
        AgentName::Order
      } else {
        intent.label.agent()
      };
      debug!(intent = %intent.label, score = intent.score, route = %route, "Turn routed.");
      data.intent = Some(intent);
      data.route = Some(route);
      Ok::<_, RouterError>(PipelineControl::Continue)
    })
  });

  let a = agents.clone();
  pipeline.on_stage(ORDER_AGENT, move |ctx: ContextData<TurnData>| {
    let agents = a.clone();
    Box::pin(async move {
      let (text, user_id, order) = {
        let data = ctx.read();
        (data.text().to_string(), data.user_id, data.order.clone())
      };

      let turn = agents.order.advance(&text, user_id, order).await?;

      let mut data = ctx.write();
      let extra_data = json!({ "order": turn.context.summary_json() });
      data.order = turn.context;
      data.reply = Some(AgentReply {
        response: turn.response,
        extra_data,
      });
      Ok::<_, RouterError>(PipelineControl::Continue)
    })
  });

  let a = agents.clone();
  pipeline.on_stage(DETAILS_AGENT, move |ctx: ContextData<TurnData>| {
    let agents = a.clone();
    Box::pin(async move {
      let text = ctx.read().text().to_string();
      let reply = agents.details.respond(&text).await?;
      ctx.write().reply = Some(reply);
      Ok::<_, RouterError>(PipelineControl::Continue)
    })
  });

  let a = agents;
  pipeline.on_stage(RECOMMENDATION_AGENT, move |ctx: ContextData<TurnData>| {
    let agents = a.clone();
    Box::pin(async move {
      let text = ctx.read().text().to_string();
      let reply = agents.recommendation.respond(&text).await?;
      ctx.write().reply = Some(reply);
      Ok::<_, RouterError>(PipelineControl::Continue)
    })
  });

  pipeline
}
