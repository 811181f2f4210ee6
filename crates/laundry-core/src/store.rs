//! Order lifecycle store.
//!
//! Owns every order placed during a session. Orders enter through
//! [`OrderLifecycleStore::create`] once their draft validates against the
//! catalog, and afterwards only ever move forward through the state machine.
//! All reads and writes go through a single lock, so a tick never interleaves
//! with a creation and list reads always see a consistent snapshot.

use crate::state::{OrderStateError, OrderStateMachine};
use chrono::NaiveDate;
use laundry_order::{AdvanceDecision, AdvanceStrategy};
use laundry_types::{
	current_timestamp, local_today, Order, OrderDraft, OrderStatus, OrdersSnapshot, ProviderCatalog,
	StatusChange, ValidationError,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::instrument;

/// Lowest and highest accepted star rating.
pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// Errors that can occur when rating an order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RatingError {
	#[error("Order not found: {0}")]
	OrderNotFound(String),
	#[error("Order {0} is not completed yet")]
	NotCompleted(String),
	#[error("Rating must be between 1 and 5, got {0}")]
	OutOfRange(u8),
}

/// In-memory collection of a session's orders.
pub struct OrderLifecycleStore {
	catalog: Arc<ProviderCatalog>,
	state_machine: OrderStateMachine,
	/// Most recently created first.
	orders: RwLock<Vec<Order>>,
}

impl OrderLifecycleStore {
	pub fn new(catalog: Arc<ProviderCatalog>) -> Self {
		Self {
			catalog,
			state_machine: OrderStateMachine::new(),
			orders: RwLock::new(Vec::new()),
		}
	}

	pub fn catalog(&self) -> &ProviderCatalog {
		&self.catalog
	}

	/// Validates a draft against today's local date and records the order.
	pub async fn create(&self, draft: &OrderDraft) -> Result<Order, ValidationError> {
		self.create_on(draft, local_today()).await
	}

	/// Validates a draft against `today` and records the order.
	///
	/// A rejected draft leaves the store untouched. A malformed offering
	/// price is not a rejection; the order is created without a total.
	#[instrument(skip_all, fields(service = %draft.service))]
	pub async fn create_on(
		&self,
		draft: &OrderDraft,
		today: NaiveDate,
	) -> Result<Order, ValidationError> {
		let resolved = draft.validate(&self.catalog, today)?;
		let offering = resolved.offering;

		let total = laundry_pricing::total_if_available(&offering.unit_price, resolved.item_count);

		let now = current_timestamp();
		let order = Order {
			id: Order::generate_id(),
			service: offering.name.clone(),
			provider_name: non_blank(draft.provider_name.as_deref()),
			status: OrderStatus::Pending,
			address: draft.address.trim().to_string(),
			pickup_date: draft.pickup_date,
			pickup_time: draft.pickup_time,
			delivery_date: draft.delivery_date,
			delivery_time: draft.delivery_time,
			item_count: resolved.item_count,
			unit: offering.unit(),
			total,
			notes: non_blank(draft.notes.as_deref()),
			rating: None,
			created_at: now,
			updated_at: now,
		};

		self.orders.write().await.insert(0, order.clone());

		tracing::info!(
			order_id = %order.short_id(),
			quantity = %order.quantity_label(),
			"Order created"
		);
		Ok(order)
	}

	/// Runs one tick of the status simulation.
	///
	/// Every non-terminal order advances at most one step, when the strategy
	/// says so. Completed orders are never offered to the strategy.
	pub async fn advance_tick(&self, strategy: &dyn AdvanceStrategy) -> Vec<StatusChange> {
		let mut orders = self.orders.write().await;
		let mut changes = Vec::new();

		for order in orders.iter_mut().filter(|o| o.is_active()) {
			if strategy.should_advance(order).await != AdvanceDecision::Advance {
				continue;
			}
			if let Some(change) = self.state_machine.advance(order) {
				tracing::debug!(
					order_id = %order.short_id(),
					from = %change.from,
					to = %change.to,
					"Order advanced"
				);
				changes.push(change);
			}
		}

		changes
	}

	/// Applies a status reported by an external source.
	///
	/// The transition must be a single forward step.
	pub async fn transition(
		&self,
		order_id: &str,
		to: OrderStatus,
	) -> Result<StatusChange, OrderStateError> {
		let mut orders = self.orders.write().await;
		let order = orders
			.iter_mut()
			.find(|o| o.id == order_id)
			.ok_or_else(|| OrderStateError::OrderNotFound(order_id.to_string()))?;
		self.state_machine.transition(order, to)
	}

	/// Records a customer rating on a completed order.
	pub async fn rate(&self, order_id: &str, stars: u8) -> Result<Order, RatingError> {
		if !RATING_RANGE.contains(&stars) {
			return Err(RatingError::OutOfRange(stars));
		}

		let mut orders = self.orders.write().await;
		let order = orders
			.iter_mut()
			.find(|o| o.id == order_id)
			.ok_or_else(|| RatingError::OrderNotFound(order_id.to_string()))?;
		if order.status != OrderStatus::Completed {
			return Err(RatingError::NotCompleted(order_id.to_string()));
		}

		order.rating = Some(stars);
		order.updated_at = current_timestamp();
		Ok(order.clone())
	}

	pub async fn get(&self, order_id: &str) -> Option<Order> {
		self.orders
			.read()
			.await
			.iter()
			.find(|o| o.id == order_id)
			.cloned()
	}

	/// Orders that have not completed yet, newest first.
	pub async fn list_active(&self) -> Vec<Order> {
		self.snapshot().await.active
	}

	/// Completed orders, newest first.
	pub async fn list_completed(&self) -> Vec<Order> {
		self.snapshot().await.completed
	}

	/// Both lists taken under one read lock.
	pub async fn snapshot(&self) -> OrdersSnapshot {
		let orders = self.orders.read().await;
		let (active, completed): (Vec<Order>, Vec<Order>) =
			orders.iter().cloned().partition(Order::is_active);
		OrdersSnapshot { active, completed }
	}

	pub async fn len(&self) -> usize {
		self.orders.read().await.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.orders.read().await.is_empty()
	}
}

fn non_blank(value: Option<&str>) -> Option<String> {
	value
		.map(str::trim)
		.filter(|v| !v.is_empty())
		.map(str::to_string)
}
