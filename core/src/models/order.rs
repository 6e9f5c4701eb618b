// concierge/src/models/order.rs

use super::message::UserId;
use super::product::{format_cents, Product, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type OrderId = i64;

/// Where a session stands in the ordering dialogue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
  #[default]
  Init,
  ProductSelection,
  QuantitySelection,
  AddressCollection,
  PaymentMethod,
  Confirmation,
  Complete,
}

impl OrderState {
  pub fn as_str(&self) -> &'static str {
    match self {
      OrderState::Init => "init",
      OrderState::ProductSelection => "product_selection",
      OrderState::QuantitySelection => "quantity_selection",
      OrderState::AddressCollection => "address_collection",
      OrderState::PaymentMethod => "payment_method",
      OrderState::Confirmation => "confirmation",
      OrderState::Complete => "complete",
    }
  }
}

impl fmt::Display for OrderState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
  CreditCard,
  DebitCard,
  PayPal,
  CashOnDelivery,
}

impl PaymentMethod {
  pub fn label(&self) -> &'static str {
    match self {
      PaymentMethod::CreditCard => "credit card",
      PaymentMethod::DebitCard => "debit card",
      PaymentMethod::PayPal => "PayPal",
      PaymentMethod::CashOnDelivery => "cash on delivery",
    }
  }
}

impl fmt::Display for PaymentMethod {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// The catalog entry as it looked when the customer picked it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
  pub id: ProductId,
  pub name: String,
  pub price_cents: i64,
  pub stock: u32,
}

impl From<&Product> for ProductSnapshot {
  fn from(product: &Product) -> Self {
    Self {
      id: product.id,
      name: product.name.clone(),
      price_cents: product.price_cents,
      stock: product.stock,
    }
  }
}

/// Mutable per-session state of an in-progress order.
///
/// There is deliberately no stored total: `total_cents()` derives it from the
/// current snapshot price and quantity, so it exists exactly when both do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderContext {
  pub state: OrderState,
  pub product: Option<ProductSnapshot>,
  pub quantity: Option<u32>,
  pub address: Option<String>,
  pub payment_method: Option<PaymentMethod>,
  pub order_id: Option<OrderId>,
}

impl OrderContext {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn total_cents(&self) -> Option<i64> {
    match (&self.product, self.quantity) {
      (Some(product), Some(quantity)) => Some(product.price_cents * i64::from(quantity)),
      _ => None,
    }
  }

  /// True while a dialogue is underway, i.e. the next message belongs to the order agent.
  pub fn in_progress(&self) -> bool {
    self.state != OrderState::Init
  }

  /// Drops every collected field and returns to `Init`.
  pub fn reset(&mut self) {
    *self = Self::default();
  }

  /// JSON view used in responses; includes the derived total.
  pub fn summary_json(&self) -> serde_json::Value {
    serde_json::json!({
      "state": self.state,
      "product": self.product,
      "quantity": self.quantity,
      "total_cents": self.total_cents(),
      "total": self.total_cents().map(format_cents),
      "address": self.address,
      "payment_method": self.payment_method,
      "order_id": self.order_id,
    })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
  Pending,
  Paid,
  Failed,
  Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
  Paid,
  Unpaid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
  pub product_id: ProductId,
  pub quantity: u32,
}

/// Everything an `OrderStore` needs to persist a new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
  pub user_id: UserId,
  pub lines: Vec<OrderLine>,
  pub total_cents: i64,
  pub status: OrderStatus,
  pub payment_status: PaymentStatus,
  pub payment_method: PaymentMethod,
  pub shipping_address: String,
}

/// A persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
  pub id: OrderId,
  pub user_id: UserId,
  pub lines: Vec<OrderLine>,
  pub total_cents: i64,
  pub status: OrderStatus,
  pub payment_status: PaymentStatus,
  pub payment_method: PaymentMethod,
  pub shipping_address: String,
  pub created_at: DateTime<Utc>,
}

impl Order {
  pub fn from_draft(id: OrderId, draft: OrderDraft, created_at: DateTime<Utc>) -> Self {
    Self {
      id,
      user_id: draft.user_id,
      lines: draft.lines,
      total_cents: draft.total_cents,
      status: draft.status,
      payment_status: draft.payment_status,
      payment_method: draft.payment_method,
      shipping_address: draft.shipping_address,
      created_at,
    }
  }
}
