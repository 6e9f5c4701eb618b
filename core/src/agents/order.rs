// concierge/src/agents/order.rs

//! The multi-turn ordering dialogue.
//!
//! `advance` is a function of `(message, context)`: the new state and the
//! reply are computed together, so a session can resume from nothing but its
//! stored `OrderContext`.

use super::builtin_regex;
use super::extract::FieldExtractor;
use crate::collab::{bounded, ContentLookup, OrderStore};
use crate::error::{RouterError, RouterResult};
use crate::models::{
  format_cents, OrderContext, OrderDraft, OrderLine, OrderState, OrderStatus, PaymentStatus, ProductSnapshot, UserId,
};
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

const CONFIRM_WORDS: &str = r"\b(yes|yeah|yep|confirm|proceed|ok|okay|sure|go ahead)\b";
const REJECT_WORDS: &str = r"\b(no|nope|cancel|stop|don't|do not)\b";

const ACCEPTED_METHODS: &str = "We accept credit card, debit card, PayPal, or cash on delivery.";

/// Result of one dialogue step.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTurn {
  pub context: OrderContext,
  pub response: String,
}

impl OrderTurn {
  fn new(context: OrderContext, response: impl Into<String>) -> Self {
    Self {
      context,
      response: response.into(),
    }
  }
}

pub struct OrderStateMachine {
  extractor: FieldExtractor,
  catalog: Arc<dyn ContentLookup>,
  orders: Arc<dyn OrderStore>,
  timeout: Duration,
  confirm: Regex,
  reject: Regex,
}

impl OrderStateMachine {
  pub fn new(catalog: Arc<dyn ContentLookup>, orders: Arc<dyn OrderStore>, timeout: Duration) -> Self {
    Self {
      extractor: FieldExtractor::new(),
      catalog,
      orders,
      timeout,
      confirm: builtin_regex(CONFIRM_WORDS),
      reject: builtin_regex(REJECT_WORDS),
    }
  }

  /// Moves `context` one step forward.
  ///
  /// Only collaborator trouble is an `Err`; every extraction miss is a
  /// re-prompt that leaves the state where it was.
  #[instrument(name = "OrderStateMachine::advance", skip_all, fields(state = %context.state), err(Display))]
  pub async fn advance(&self, message: &str, user_id: UserId, context: OrderContext) -> RouterResult<OrderTurn> {
    let turn = match context.state {
      OrderState::Init | OrderState::ProductSelection => self.select_product(message, context).await?,
      OrderState::QuantitySelection => self.select_quantity(message, context),
      OrderState::AddressCollection => self.collect_address(message, context),
      OrderState::PaymentMethod => self.select_payment(message, context),
      OrderState::Confirmation => self.confirm(message, user_id, context).await?,
      OrderState::Complete => OrderTurn::new(
        OrderContext::new(),
        "Your order has been processed successfully. Is there anything else I can help you with?",
      ),
    };
    debug!(next_state = %turn.context.state, "Order dialogue advanced.");
    Ok(turn)
  }

  async fn select_product(&self, message: &str, mut context: OrderContext) -> RouterResult<OrderTurn> {
    let first_ask = context.state == OrderState::Init;

    let Some(name) = self.extractor.extract_product_name(message) else {
      // Stays in Init so the next message is classified afresh.
      if first_ask {
        return Ok(OrderTurn::new(context, "What product would you like to order today?"));
      }
      return Ok(OrderTurn::new(
        context,
        "I didn't catch which product you want. Could you please specify the product name?",
      ));
    };

    let found = bounded("content_lookup", self.timeout, self.catalog.find_product_by_name(&name)).await?;
    let Some(product) = found else {
      return Ok(OrderTurn::new(
        context,
        format!(
          "I couldn't find a product called '{}'. Could you please specify a different product?",
          name
        ),
      ));
    };

    let response = if first_ask {
      format!(
        "I found {}. It costs {}. How many would you like to order?",
        product.name,
        product.price_display()
      )
    } else {
      format!(
        "Great! You've selected {}. It costs {}. How many would you like to order?",
        product.name,
        product.price_display()
      )
    };
    context.product = Some(ProductSnapshot::from(&product));
    context.quantity = None;
    context.state = OrderState::QuantitySelection;
    Ok(OrderTurn::new(context, response))
  }

  fn select_quantity(&self, message: &str, mut context: OrderContext) -> OrderTurn {
    let Some(quantity) = self.extractor.extract_quantity(message) else {
      return OrderTurn::new(
        context,
        "I need to know how many you'd like to order. Please provide a quantity.",
      );
    };

    if quantity == 0 {
      return OrderTurn::new(
        context,
        "The quantity must be greater than zero. How many would you like to order?",
      );
    }

    let Some(product) = context.product.clone() else {
      context.state = OrderState::ProductSelection;
      return OrderTurn::new(
        context,
        "I didn't catch which product you want. Could you please specify the product name?",
      );
    };

    if quantity > product.stock {
      return OrderTurn::new(
        context,
        format!(
          "I'm sorry, we only have {} units in stock. Please select a smaller quantity.",
          product.stock
        ),
      );
    }

    context.quantity = Some(quantity);
    context.state = OrderState::AddressCollection;
    let total = context.total_cents().unwrap_or_default();
    OrderTurn::new(
      context,
      format!(
        "You've selected {} x {}. Your total is {}. Please provide your delivery address.",
        quantity,
        product.name,
        format_cents(total)
      ),
    )
  }

  fn collect_address(&self, message: &str, mut context: OrderContext) -> OrderTurn {
    match self.extractor.extract_address(message) {
      Some(address) => {
        context.address = Some(address);
        context.state = OrderState::PaymentMethod;
        OrderTurn::new(
          context,
          format!(
            "Thanks for providing your address. How would you like to pay? {}",
            ACCEPTED_METHODS
          ),
        )
      }
      None => OrderTurn::new(
        context,
        "I need a valid delivery address to proceed with your order. Please provide your full address including street, city, and zip code.",
      ),
    }
  }

  fn select_payment(&self, message: &str, mut context: OrderContext) -> OrderTurn {
    let Some(method) = self.extractor.extract_payment_method(message) else {
      return OrderTurn::new(
        context,
        format!("Please select a valid payment method. {}", ACCEPTED_METHODS),
      );
    };

    context.payment_method = Some(method);
    context.state = OrderState::Confirmation;
    let summary = format!(
      "Great! Here's a summary of your order:\n\n\
       Product: {}\n\
       Quantity: {}\n\
       Total Price: {}\n\
       Delivery Address: {}\n\
       Payment Method: {}\n\n\
       Would you like to confirm this order?",
      context.product.as_ref().map(|p| p.name.as_str()).unwrap_or_default(),
      context.quantity.unwrap_or_default(),
      format_cents(context.total_cents().unwrap_or_default()),
      context.address.as_deref().unwrap_or_default(),
      method.label(),
    );
    OrderTurn::new(context, summary)
  }

  async fn confirm(&self, message: &str, user_id: UserId, mut context: OrderContext) -> RouterResult<OrderTurn> {
    if self.confirm.is_match(message) {
      let draft = draft_from(&context, user_id)?;
      let order_id = bounded("order_store", self.timeout, self.orders.create(draft)).await?;
      info!(order_id, user_id, "Order created.");

      context.order_id = Some(order_id);
      context.state = OrderState::Complete;
      return Ok(OrderTurn::new(
        context,
        format!(
          "Thank you! Your order has been confirmed. Your order ID is #{}. You will receive a confirmation email shortly.",
          order_id
        ),
      ));
    }

    if self.reject.is_match(message) {
      info!(user_id, "Order cancelled at confirmation.");
      context.reset();
      return Ok(OrderTurn::new(
        context,
        "I've canceled your order. Is there anything else you'd like to order?",
      ));
    }

    Ok(OrderTurn::new(
      context,
      "I didn't understand your response. Please confirm with 'yes' or cancel with 'no'.",
    ))
  }
}

/// Builds the persisted draft. Reaching Confirmation without every field is a
/// broken invariant, not something the customer can fix by typing.
fn draft_from(context: &OrderContext, user_id: UserId) -> RouterResult<OrderDraft> {
  let missing = |field: &str| RouterError::Internal(format!("confirmation reached without {}", field));

  let product = context.product.as_ref().ok_or_else(|| missing("a product"))?;
  let quantity = context.quantity.ok_or_else(|| missing("a quantity"))?;
  let address = context.address.clone().ok_or_else(|| missing("an address"))?;
  let payment_method = context.payment_method.ok_or_else(|| missing("a payment method"))?;
  let total_cents = context.total_cents().ok_or_else(|| missing("a total"))?;

  Ok(OrderDraft {
    user_id,
    lines: vec![OrderLine {
      product_id: product.id,
      quantity,
    }],
    total_cents,
    status: OrderStatus::Pending,
    payment_status: PaymentStatus::Unpaid,
    payment_method,
    shipping_address: address,
  })
}
