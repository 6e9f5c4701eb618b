// concierge/src/models/mod.rs

//! Plain data carried between the router, its agents and the collaborators.

pub mod intent;
pub mod interaction;
pub mod message;
pub mod order;
pub mod product;

pub use intent::{AgentName, Intent, IntentLabel};
pub use interaction::InteractionRecord;
pub use message::{Message, UserId};
pub use order::{
  Order, OrderContext, OrderDraft, OrderId, OrderLine, OrderState, OrderStatus, PaymentMethod, PaymentStatus,
  ProductSnapshot,
};
pub use product::{format_cents, Faq, Product, ProductId};
