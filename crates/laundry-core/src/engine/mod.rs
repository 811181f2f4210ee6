//! Session engine that drives the order lifecycle.
//!
//! This module contains the SessionEngine, which owns the lifecycle store and
//! the advance strategy of one session. It turns every mutation into events
//! on the event bus and runs the periodic status simulation.

pub mod event_bus;
pub mod lifecycle;
pub mod ticker;

use crate::state::OrderStateError;
use crate::store::{OrderLifecycleStore, RatingError};
use laundry_config::Config;
use laundry_order::AdvanceStrategy;
use laundry_types::{
	Order, OrderDraft, OrderEvent, OrderStatus, OrdersSnapshot, SessionEvent, StatusChange,
	ValidationError,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast::error::RecvError;
use tracing::instrument;

/// Errors that can occur during engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Invalid order: {0}")]
	Validation(#[from] ValidationError),
	#[error("Rating rejected: {0}")]
	Rating(#[from] RatingError),
	#[error("Status update rejected: {0}")]
	State(#[from] OrderStateError),
}

/// Engine for a single ordering session.
#[derive(Clone)]
pub struct SessionEngine {
	/// Session configuration.
	pub(crate) config: Config,
	/// Orders placed in this session.
	pub(crate) store: Arc<OrderLifecycleStore>,
	/// Decides which orders advance on each tick.
	pub(crate) strategy: Arc<dyn AdvanceStrategy>,
	/// Event bus for observers of this session.
	pub(crate) event_bus: event_bus::EventBus,
}

impl SessionEngine {
	pub fn new(
		config: Config,
		store: Arc<OrderLifecycleStore>,
		strategy: Arc<dyn AdvanceStrategy>,
		event_bus: event_bus::EventBus,
	) -> Self {
		Self {
			config,
			store,
			strategy,
			event_bus,
		}
	}

	/// Places an order from a draft.
	///
	/// On success the new order is announced, followed by fresh order lists.
	/// A rejected draft publishes nothing.
	#[instrument(skip_all, fields(session = %self.config.session.id))]
	pub async fn place_order(&self, draft: &OrderDraft) -> Result<Order, EngineError> {
		let order = match self.store.create(draft).await {
			Ok(order) => order,
			Err(e) => {
				tracing::warn!(error = %e, "Order rejected");
				return Err(e.into());
			},
		};

		self.event_bus
			.publish(SessionEvent::Order(OrderEvent::Placed {
				order: order.clone(),
			}))
			.ok();
		self.publish_snapshot().await;

		Ok(order)
	}

	/// Runs one simulation tick and publishes the resulting changes.
	///
	/// Fresh order lists are published even when nothing moved.
	pub async fn tick(&self) -> Vec<StatusChange> {
		let changes = self.store.advance_tick(self.strategy.as_ref()).await;

		for change in &changes {
			self.event_bus
				.publish(SessionEvent::Order(change.clone().into()))
				.ok();
		}
		self.publish_snapshot().await;

		tracing::debug!(
			session = %self.config.session.id,
			advanced = changes.len(),
			"Tick complete"
		);
		changes
	}

	/// Applies a status pushed by a provider feed.
	#[instrument(skip_all, fields(session = %self.config.session.id, to = %to))]
	pub async fn apply_status(
		&self,
		order_id: &str,
		to: OrderStatus,
	) -> Result<StatusChange, EngineError> {
		let change = self.store.transition(order_id, to).await?;

		self.event_bus
			.publish(SessionEvent::Order(change.clone().into()))
			.ok();
		self.publish_snapshot().await;

		Ok(change)
	}

	/// Rates a completed order.
	pub async fn rate_order(&self, order_id: &str, stars: u8) -> Result<Order, EngineError> {
		let order = self.store.rate(order_id, stars).await?;

		tracing::info!(order_id = %order.short_id(), stars, "Order rated");
		self.event_bus
			.publish(SessionEvent::Order(OrderEvent::Rated {
				order_id: order.id.clone(),
				stars,
			}))
			.ok();
		self.publish_snapshot().await;

		Ok(order)
	}

	/// Current active and completed lists.
	pub async fn snapshot(&self) -> OrdersSnapshot {
		self.store.snapshot().await
	}

	/// Main execution loop for the session.
	///
	/// Starts the tick timer and logs session activity until ctrl-c.
	pub async fn run(&self) -> Result<(), EngineError> {
		self.initialize().await?;

		let mut events = self.event_bus.subscribe();
		let ticker = self.start();

		loop {
			tokio::select! {
				event = events.recv() => {
					match event {
						Ok(SessionEvent::Order(OrderEvent::Advanced { order_id, from, to })) => {
							tracing::info!(
								order_id = %laundry_types::short_id(&order_id),
								%from,
								%to,
								"Status changed"
							);
						},
						Ok(SessionEvent::OrdersUpdated(snapshot)) => {
							tracing::debug!(
								active = snapshot.active.len(),
								completed = snapshot.completed.len(),
								"Orders updated"
							);
						},
						Ok(_) => {},
						Err(RecvError::Lagged(skipped)) => {
							tracing::warn!(skipped, "Event receiver lagged");
						},
						Err(RecvError::Closed) => break,
					}
				}

				// Shutdown signal
				_ = tokio::signal::ctrl_c() => {
					break;
				}
			}
		}

		ticker.shutdown();
		self.shutdown().await
	}

	/// Returns a reference to the event bus.
	pub fn event_bus(&self) -> &event_bus::EventBus {
		&self.event_bus
	}

	/// Returns a reference to the configuration.
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Returns a reference to the lifecycle store.
	pub fn store(&self) -> &Arc<OrderLifecycleStore> {
		&self.store
	}

	async fn publish_snapshot(&self) {
		let snapshot = self.store.snapshot().await;
		self.event_bus
			.publish(SessionEvent::OrdersUpdated(snapshot))
			.ok();
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::event_bus::EventBus;
	use super::*;
	use laundry_order::implementations::strategies::fixed::FixedStrategy;
	use laundry_types::testing::{sample_catalog, sample_draft};
	use std::str::FromStr;

	const TEST_CONFIG: &str = r#"
[session]
id = "engine-test"
event_capacity = 16

[simulation]
tick_interval_seconds = 30

[advance]
primary = "always"
[advance.implementations.always]
"#;

	pub(crate) fn test_config() -> Config {
		let mut config = Config::from_str(TEST_CONFIG).unwrap();
		config.catalog = sample_catalog();
		config
	}

	pub(crate) fn engine_with(strategy: FixedStrategy) -> SessionEngine {
		let config = test_config();
		let store = Arc::new(OrderLifecycleStore::new(Arc::new(config.catalog.clone())));
		SessionEngine::new(config, store, Arc::new(strategy), EventBus::new(16))
	}

	fn today() -> chrono::NaiveDate {
		laundry_types::local_today()
	}

	#[tokio::test]
	async fn test_place_order_publishes_order_then_lists() {
		let engine = engine_with(FixedStrategy::never());
		let mut events = engine.event_bus().subscribe();

		let order = engine.place_order(&sample_draft(today())).await.unwrap();

		match events.recv().await.unwrap() {
			SessionEvent::Order(OrderEvent::Placed { order: placed }) => {
				assert_eq!(placed.id, order.id)
			},
			other => panic!("unexpected event: {:?}", other),
		}
		match events.recv().await.unwrap() {
			SessionEvent::OrdersUpdated(snapshot) => {
				assert_eq!(snapshot.active, vec![order]);
				assert!(snapshot.completed.is_empty());
			},
			other => panic!("unexpected event: {:?}", other),
		}
	}

	#[tokio::test]
	async fn test_rejected_order_publishes_nothing() {
		let engine = engine_with(FixedStrategy::never());
		let mut events = engine.event_bus().subscribe();

		let mut draft = sample_draft(today());
		draft.address = "   ".to_string();
		let result = engine.place_order(&draft).await;

		assert!(matches!(
			result,
			Err(EngineError::Validation(ValidationError::MissingAddress))
		));
		assert!(events.try_recv().is_err());
		assert!(engine.snapshot().await.is_empty());
	}

	#[tokio::test]
	async fn test_tick_publishes_changes_and_lists() {
		let engine = engine_with(FixedStrategy::always());
		let order = engine.place_order(&sample_draft(today())).await.unwrap();
		let mut events = engine.event_bus().subscribe();

		let changes = engine.tick().await;
		assert_eq!(changes.len(), 1);

		match events.recv().await.unwrap() {
			SessionEvent::Order(OrderEvent::Advanced { order_id, from, to }) => {
				assert_eq!(order_id, order.id);
				assert_eq!(from, OrderStatus::Pending);
				assert_eq!(to, OrderStatus::Processing);
			},
			other => panic!("unexpected event: {:?}", other),
		}
		assert!(matches!(
			events.recv().await.unwrap(),
			SessionEvent::OrdersUpdated(_)
		));
	}

	#[tokio::test]
	async fn test_completed_order_moves_lists_and_can_be_rated() {
		let engine = engine_with(FixedStrategy::always());
		let order = engine.place_order(&sample_draft(today())).await.unwrap();

		assert!(matches!(
			engine.rate_order(&order.id, 5).await,
			Err(EngineError::Rating(RatingError::NotCompleted(_)))
		));

		for _ in 0..3 {
			engine.tick().await;
		}
		let snapshot = engine.snapshot().await;
		assert!(snapshot.active.is_empty());
		assert_eq!(snapshot.completed.len(), 1);

		let rated = engine.rate_order(&order.id, 5).await.unwrap();
		assert_eq!(rated.rating, Some(5));
	}

	#[tokio::test]
	async fn test_apply_status_rejects_skips() {
		let engine = engine_with(FixedStrategy::never());
		let order = engine.place_order(&sample_draft(today())).await.unwrap();

		assert!(matches!(
			engine.apply_status(&order.id, OrderStatus::Completed).await,
			Err(EngineError::State(OrderStateError::InvalidTransition { .. }))
		));

		let change = engine
			.apply_status(&order.id, OrderStatus::Processing)
			.await
			.unwrap();
		assert_eq!(change.to, OrderStatus::Processing);
	}
}
