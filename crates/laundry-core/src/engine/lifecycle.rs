//! Lifecycle management for the session engine.
//!
//! Handles initialization and shutdown of a session.

use super::SessionEngine;

impl SessionEngine {
	/// Performs any initialization required before running
	pub async fn initialize(&self) -> Result<(), super::EngineError> {
		let catalog = self.store.catalog();
		if catalog.offerings.is_empty() {
			return Err(super::EngineError::Config(
				"Catalog has no service offerings".to_string(),
			));
		}

		tracing::info!(
			session = %self.config.session.id,
			offerings = catalog.offerings.len(),
			providers = catalog.providers.len(),
			strategy = %self.config.advance.primary,
			"Initializing session engine"
		);
		Ok(())
	}

	/// Performs cleanup operations
	pub async fn shutdown(&self) -> Result<(), super::EngineError> {
		let snapshot = self.store.snapshot().await;
		tracing::info!(
			session = %self.config.session.id,
			active = snapshot.active.len(),
			completed = snapshot.completed.len(),
			"Shutting down session engine"
		);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use crate::engine::tests::engine_with;
	use crate::engine::{event_bus::EventBus, EngineError, SessionEngine};
	use crate::store::OrderLifecycleStore;
	use laundry_order::implementations::strategies::fixed::FixedStrategy;
	use laundry_types::ProviderCatalog;
	use std::sync::Arc;

	#[tokio::test]
	async fn test_initialize_requires_offerings() {
		assert!(engine_with(FixedStrategy::never()).initialize().await.is_ok());

		let empty = SessionEngine::new(
			crate::engine::tests::test_config(),
			Arc::new(OrderLifecycleStore::new(Arc::new(ProviderCatalog::default()))),
			Arc::new(FixedStrategy::never()),
			EventBus::new(4),
		);
		assert!(matches!(empty.initialize().await, Err(EngineError::Config(_))));
		assert!(empty.shutdown().await.is_ok());
	}
}
