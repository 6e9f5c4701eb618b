// tests/order_flow_tests.rs
mod common;

use common::*;
use concierge::models::{OrderContext, OrderLine, OrderState, OrderStatus, PaymentMethod, PaymentStatus, Product, ProductSnapshot};
use concierge::{InMemoryCatalog, InMemoryOrderStore, OrderStateMachine, RouterError};
use serial_test::serial;
use std::sync::Arc;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_millis(200);

fn machine_with(catalog: InMemoryCatalog) -> (OrderStateMachine, Arc<InMemoryOrderStore>) {
  let orders = Arc::new(InMemoryOrderStore::new());
  (OrderStateMachine::new(Arc::new(catalog), orders.clone(), TIMEOUT), orders)
}

async fn drive(machine: &OrderStateMachine, messages: &[&str]) -> (OrderContext, Vec<String>) {
  let mut context = OrderContext::new();
  let mut responses = Vec::new();
  for message in messages {
    let turn = machine.advance(message, 42, context).await.unwrap();
    context = turn.context;
    responses.push(turn.response);
  }
  (context, responses)
}

#[tokio::test]
#[serial]
async fn test_full_dialogue_from_init_to_complete() {
  setup_tracing();
  let (machine, orders) = machine_with(InMemoryCatalog::sample());

  let turn = machine.advance("I want to buy a Smart Watch", 42, OrderContext::new()).await.unwrap();
  assert_eq!(turn.context.state, OrderState::QuantitySelection);
  let product = turn.context.product.clone().unwrap();
  assert_eq!(product.id, 3);
  assert_eq!(product.name, "Smart Watch");
  assert!(turn.response.contains("$149.99"));
  assert_eq!(turn.context.total_cents(), None);

  let turn = machine.advance("2", 42, turn.context).await.unwrap();
  assert_eq!(turn.context.state, OrderState::AddressCollection);
  assert_eq!(turn.context.quantity, Some(2));
  assert_eq!(turn.context.total_cents(), Some(2 * 14999));
  assert!(turn.response.contains("$299.98"));

  let turn = machine.advance("123 Main St, Springfield", 42, turn.context).await.unwrap();
  assert_eq!(turn.context.state, OrderState::PaymentMethod);
  assert_eq!(turn.context.address.as_deref(), Some("123 Main St, Springfield"));
  assert!(turn.response.contains("PayPal"));

  let turn = machine.advance("credit card", 42, turn.context).await.unwrap();
  assert_eq!(turn.context.state, OrderState::Confirmation);
  assert_eq!(turn.context.payment_method, Some(PaymentMethod::CreditCard));
  assert!(turn.response.contains("Product: Smart Watch"));
  assert!(turn.response.contains("Quantity: 2"));
  assert!(turn.response.contains("Total Price: $299.98"));
  assert!(turn.response.contains("Delivery Address: 123 Main St, Springfield"));
  assert!(turn.response.contains("Payment Method: credit card"));
  assert!(orders.orders().is_empty(), "nothing is persisted before confirmation");

  let turn = machine.advance("yes", 42, turn.context).await.unwrap();
  assert_eq!(turn.context.state, OrderState::Complete);
  assert_eq!(turn.context.order_id, Some(1));
  assert!(turn.response.contains("#1"));

  let stored = orders.orders();
  assert_eq!(stored.len(), 1);
  let order = &stored[0];
  assert_eq!(order.id, 1);
  assert_eq!(order.user_id, 42);
  assert_eq!(order.lines, vec![OrderLine { product_id: 3, quantity: 2 }]);
  assert_eq!(order.total_cents, 29998);
  assert_eq!(order.status, OrderStatus::Pending);
  assert_eq!(order.payment_status, PaymentStatus::Unpaid);
  assert_eq!(order.payment_method, PaymentMethod::CreditCard);
  assert_eq!(order.shipping_address, "123 Main St, Springfield");

  let turn = machine.advance("thanks!", 42, turn.context).await.unwrap();
  assert_eq!(turn.context, OrderContext::new());
  assert!(turn.response.contains("processed successfully"));
}

#[tokio::test]
#[serial]
async fn test_complete_resets_without_reprocessing_the_message() {
  setup_tracing();
  let (machine, _) = machine_with(InMemoryCatalog::sample());
  let completed = OrderContext {
    state: OrderState::Complete,
    order_id: Some(9),
    ..OrderContext::new()
  };

  let turn = machine.advance("I want to buy a Coffee Maker", 42, completed).await.unwrap();
  assert_eq!(turn.context.state, OrderState::Init);
  assert_eq!(turn.context.product, None);
  assert_eq!(turn.context.order_id, None);
}

#[tokio::test]
#[serial]
async fn test_quantity_above_stock_is_refused_with_actual_stock() {
  setup_tracing();
  let (machine, _) = machine_with(low_stock_catalog());
  let (context, responses) = drive(&machine, &["I want to buy a Desk Lamp", "10"]).await;

  assert_eq!(context.state, OrderState::QuantitySelection);
  assert_eq!(context.quantity, None);
  assert!(responses[1].contains('5'), "response: {}", responses[1]);

  let turn = machine.advance("5", 42, context).await.unwrap();
  assert_eq!(turn.context.state, OrderState::AddressCollection);
  assert_eq!(turn.context.total_cents(), Some(5 * 2500));
}

#[tokio::test]
#[serial]
async fn test_zero_and_missing_quantity_reprompt() {
  setup_tracing();
  let (machine, _) = machine_with(InMemoryCatalog::sample());
  let (context, responses) = drive(&machine, &["I want to buy a Smart Watch", "0 pieces", "lots"]).await;

  assert_eq!(context.state, OrderState::QuantitySelection);
  assert!(responses[1].contains("greater than zero"));
  assert!(responses[2].contains("provide a quantity"));
}

#[tokio::test]
#[serial]
async fn test_cancellation_clears_every_field() {
  setup_tracing();
  let (machine, orders) = machine_with(InMemoryCatalog::sample());
  let (context, responses) = drive(
    &machine,
    &[
      "I want to buy a Coffee Maker",
      "1",
      "42 Wallaby Way, Sydney",
      "paypal",
      "no thanks",
    ],
  )
  .await;

  assert_eq!(context, OrderContext::new());
  assert_eq!(context.product, None);
  assert_eq!(context.quantity, None);
  assert_eq!(context.address, None);
  assert_eq!(context.payment_method, None);
  assert!(responses[4].contains("canceled"));
  assert!(orders.orders().is_empty());
}

#[tokio::test]
#[serial]
async fn test_unclear_confirmation_reprompts() {
  setup_tracing();
  let (machine, orders) = machine_with(InMemoryCatalog::sample());
  let (context, responses) = drive(
    &machine,
    &["I want to buy a Coffee Maker", "1", "42 Wallaby Way, Sydney", "cash", "hmm, maybe later"],
  )
  .await;

  assert_eq!(context.state, OrderState::Confirmation);
  assert_eq!(context.payment_method, Some(PaymentMethod::CashOnDelivery));
  assert!(responses[4].contains("confirm with 'yes'"));
  assert!(orders.orders().is_empty());
}

#[tokio::test]
#[serial]
async fn test_product_selection_prompts() {
  setup_tracing();
  let (machine, _) = machine_with(InMemoryCatalog::sample());

  let turn = machine.advance("I'd like to order", 42, OrderContext::new()).await.unwrap();
  assert_eq!(turn.context.state, OrderState::Init);
  assert!(!turn.context.in_progress());
  assert!(turn.response.contains("What product would you like"));

  let selecting = OrderContext {
    state: OrderState::ProductSelection,
    ..OrderContext::new()
  };
  let turn = machine.advance("something nice", 42, selecting).await.unwrap();
  assert_eq!(turn.context.state, OrderState::ProductSelection);
  assert!(turn.response.contains("didn't catch which product"));

  let turn = machine.advance("buy a unicorn", 42, turn.context).await.unwrap();
  assert_eq!(turn.context.state, OrderState::ProductSelection);
  assert!(turn.response.contains("'unicorn'"));

  let turn = machine.advance("buy the Cotton T", 42, turn.context).await.unwrap();
  assert_eq!(turn.context.state, OrderState::QuantitySelection);
  assert!(turn.response.starts_with("Great! You've selected Cotton T-Shirt"));
}

#[tokio::test]
#[serial]
async fn test_unknown_product_keeps_init_state() {
  setup_tracing();
  let (machine, _) = machine_with(InMemoryCatalog::sample());
  let turn = machine.advance("I want to buy a unicorn", 42, OrderContext::new()).await.unwrap();
  assert_eq!(turn.context.state, OrderState::Init);
  assert!(turn.response.contains("couldn't find a product called 'unicorn'"));
}

#[tokio::test]
#[serial]
async fn test_out_of_stock_product_blocks_at_quantity() {
  setup_tracing();
  let catalog = InMemoryCatalog::new(vec![Product::new(1, "Vintage Radio", "Electronics", 5000, 0, "Sold out.")], vec![]);
  let (machine, _) = machine_with(catalog);
  let turn = machine.advance("I want to buy a Vintage Radio", 42, OrderContext::new()).await.unwrap();
  assert_eq!(turn.context.state, OrderState::QuantitySelection);
  assert_eq!(turn.context.product.as_ref().map(|p| p.stock), Some(0));

  let turn = machine.advance("1", 42, turn.context).await.unwrap();
  assert_eq!(turn.context.state, OrderState::QuantitySelection);
  assert_eq!(turn.context.quantity, None);
  assert!(turn.response.contains("we only have 0 units in stock"));
}

#[tokio::test]
#[serial]
async fn test_invalid_address_and_payment_reprompt() {
  setup_tracing();
  let (machine, _) = machine_with(InMemoryCatalog::sample());
  let (context, responses) = drive(
    &machine,
    &["I want to buy a Smart Watch", "1", "somewhere nice", "123 Main St, Springfield", "bitcoin"],
  )
  .await;

  assert!(responses[2].contains("valid delivery address"));
  assert!(responses[4].contains("valid payment method"));
  assert_eq!(context.state, OrderState::PaymentMethod);
}

#[tokio::test]
#[serial]
async fn test_quantity_without_product_returns_to_product_selection() {
  setup_tracing();
  let (machine, _) = machine_with(InMemoryCatalog::sample());
  let context = OrderContext {
    state: OrderState::QuantitySelection,
    ..OrderContext::new()
  };
  let turn = machine.advance("2", 42, context).await.unwrap();
  assert_eq!(turn.context.state, OrderState::ProductSelection);
}

#[tokio::test]
#[serial]
async fn test_confirmation_with_missing_fields_is_an_internal_error() {
  setup_tracing();
  let (machine, orders) = machine_with(InMemoryCatalog::sample());
  let context = OrderContext {
    state: OrderState::Confirmation,
    product: Some(ProductSnapshot {
      id: 3,
      name: "Smart Watch".to_string(),
      price_cents: 14999,
      stock: 30,
    }),
    ..OrderContext::new()
  };
  match machine.advance("yes", 42, context).await {
    Err(RouterError::Internal(msg)) => assert!(msg.contains("quantity")),
    other => panic!("Expected RouterError::Internal, got {:?}", other),
  }
  assert!(orders.orders().is_empty());
}

#[tokio::test]
#[serial]
async fn test_order_store_failure_surfaces_as_collaborator_error() {
  setup_tracing();
  let store = Arc::new(RejectingOrderStore::default());
  let machine = OrderStateMachine::new(Arc::new(InMemoryCatalog::sample()), store.clone(), TIMEOUT);

  let mut context = OrderContext::new();
  for message in ["I want to buy a Smart Watch", "1", "123 Main St, Springfield", "paypal"] {
    context = machine.advance(message, 42, context).await.unwrap().context;
  }
  match machine.advance("yes please", 42, context).await {
    Err(RouterError::Collaborator { collaborator, .. }) => assert_eq!(collaborator, "order_store"),
    other => panic!("Expected RouterError::Collaborator, got {:?}", other),
  }
  assert_eq!(store.attempts.load(std::sync::atomic::Ordering::SeqCst), 1);
}
