//! Order state machine implementation.
//!
//! Orders move through a fixed lifecycle:
//! Pending -> Processing -> Delivery -> Completed.
//! Every transition is a single step forward; Completed is terminal.

use laundry_types::{current_timestamp, Order, OrderStatus, StatusChange};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors that can occur during order state management.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderStateError {
	#[error("Invalid state transition from {from:?} to {to:?}")]
	InvalidTransition { from: OrderStatus, to: OrderStatus },
	#[error("Order not found: {0}")]
	OrderNotFound(String),
}

/// Static transition table; each state maps to its allowed next states.
static TRANSITIONS: Lazy<HashMap<OrderStatus, HashSet<OrderStatus>>> = Lazy::new(|| {
	let mut m = HashMap::new();
	m.insert(
		OrderStatus::Pending,
		HashSet::from([OrderStatus::Processing]),
	);
	m.insert(
		OrderStatus::Processing,
		HashSet::from([OrderStatus::Delivery]),
	);
	m.insert(
		OrderStatus::Delivery,
		HashSet::from([OrderStatus::Completed]),
	);
	m.insert(OrderStatus::Completed, HashSet::new()); // terminal
	m
});

/// Applies validated status transitions to orders.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrderStateMachine;

impl OrderStateMachine {
	pub fn new() -> Self {
		Self
	}

	/// Checks if a state transition is valid
	pub fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
		TRANSITIONS
			.get(&from)
			.is_some_and(|allowed| allowed.contains(&to))
	}

	/// Transitions an order to a new status with validation.
	pub fn transition(
		&self,
		order: &mut Order,
		to: OrderStatus,
	) -> Result<StatusChange, OrderStateError> {
		let from = order.status;
		if !Self::is_valid_transition(from, to) {
			return Err(OrderStateError::InvalidTransition { from, to });
		}

		order.status = to;
		order.updated_at = current_timestamp();

		Ok(StatusChange {
			order_id: order.id.clone(),
			from,
			to,
		})
	}

	/// Moves an order one step forward.
	///
	/// Returns `None` for orders that are already completed.
	pub fn advance(&self, order: &mut Order) -> Option<StatusChange> {
		if order.status.is_terminal() {
			return None;
		}
		self.transition(order, order.status.advance()).ok()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use laundry_types::testing::sample_order;

	#[test]
	fn test_forward_steps_are_valid() {
		for pair in OrderStatus::ALL.windows(2) {
			assert!(OrderStateMachine::is_valid_transition(pair[0], pair[1]));
		}
	}

	#[test]
	fn test_skips_and_regressions_are_rejected() {
		assert!(!OrderStateMachine::is_valid_transition(
			OrderStatus::Pending,
			OrderStatus::Delivery
		));
		assert!(!OrderStateMachine::is_valid_transition(
			OrderStatus::Delivery,
			OrderStatus::Processing
		));
		assert!(!OrderStateMachine::is_valid_transition(
			OrderStatus::Processing,
			OrderStatus::Processing
		));

		let mut order = sample_order(OrderStatus::Pending);
		let err = OrderStateMachine::new()
			.transition(&mut order, OrderStatus::Completed)
			.unwrap_err();
		assert_eq!(
			err,
			OrderStateError::InvalidTransition {
				from: OrderStatus::Pending,
				to: OrderStatus::Completed,
			}
		);
		assert_eq!(order.status, OrderStatus::Pending);
	}

	#[test]
	fn test_completed_is_terminal() {
		for to in OrderStatus::ALL {
			assert!(!OrderStateMachine::is_valid_transition(
				OrderStatus::Completed,
				to
			));
		}

		let mut order = sample_order(OrderStatus::Completed);
		let before = order.clone();
		assert!(OrderStateMachine::new()
			.transition(&mut order, OrderStatus::Pending)
			.is_err());
		assert_eq!(order, before);
	}

	#[test]
	fn test_advance_walks_the_lifecycle() {
		let machine = OrderStateMachine::new();
		let mut order = sample_order(OrderStatus::Pending);

		let change = machine.advance(&mut order).unwrap();
		assert_eq!(change.from, OrderStatus::Pending);
		assert_eq!(change.to, OrderStatus::Processing);
		assert_eq!(change.order_id, order.id);
		assert!(order.updated_at > 0);

		machine.advance(&mut order).unwrap();
		machine.advance(&mut order).unwrap();
		assert_eq!(order.status, OrderStatus::Completed);

		// Completed is terminal
		assert!(machine.advance(&mut order).is_none());
		assert_eq!(order.status, OrderStatus::Completed);
	}
}
