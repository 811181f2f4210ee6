//! Event types emitted by a session.
//!
//! Rendering collaborators subscribe to these events and redraw their order
//! lists whenever an `OrdersUpdated` snapshot arrives.

use crate::{Order, OrderStatus, StatusChange};
use serde::{Deserialize, Serialize};

/// Main event type encompassing all session events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEvent {
	/// Events about individual orders.
	Order(OrderEvent),
	/// Fresh active/completed lists after a mutation.
	OrdersUpdated(OrdersSnapshot),
}

/// Events related to a single order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OrderEvent {
	/// A draft was accepted and a new order created.
	Placed { order: Order },
	/// An order moved one step forward.
	Advanced {
		order_id: String,
		from: OrderStatus,
		to: OrderStatus,
	},
	/// A completed order received a rating.
	Rated { order_id: String, stars: u8 },
}

impl From<StatusChange> for OrderEvent {
	fn from(change: StatusChange) -> Self {
		OrderEvent::Advanced {
			order_id: change.order_id,
			from: change.from,
			to: change.to,
		}
	}
}

/// Consistent view of the session's orders, split by lifecycle stage.
///
/// Both lists are ordered most-recently-created first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrdersSnapshot {
	pub active: Vec<Order>,
	pub completed: Vec<Order>,
}

impl OrdersSnapshot {
	pub fn len(&self) -> usize {
		self.active.len() + self.completed.len()
	}

	pub fn is_empty(&self) -> bool {
		self.active.is_empty() && self.completed.is_empty()
	}
}
