//! Builder pattern for constructing session engines.
//!
//! Composes a SessionEngine from configuration, creating the advance strategy
//! through the registered factory functions.

use crate::engine::{event_bus::EventBus, SessionEngine};
use crate::store::OrderLifecycleStore;
use laundry_config::Config;
use laundry_order::{AdvanceStrategy, StrategyError};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during session engine construction.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Missing required component: {0}")]
	MissingComponent(String),
}

/// Builder for constructing a SessionEngine with a pluggable advance strategy.
pub struct SessionBuilder {
	config: Config,
}

impl SessionBuilder {
	/// Creates a new SessionBuilder with the given configuration.
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	/// Builds the SessionEngine using the given strategy factories.
	pub fn build<STF>(
		self,
		strategy_factories: HashMap<String, STF>,
	) -> Result<SessionEngine, BuilderError>
	where
		STF: Fn(&toml::Value) -> Result<Box<dyn AdvanceStrategy>, StrategyError>,
	{
		// Create strategy implementations
		let mut strategy_impls = HashMap::new();
		for (name, config) in &self.config.advance.implementations {
			let Some(factory) = strategy_factories.get(name) else {
				tracing::warn!(
					component = "advance",
					implementation = %name,
					"No factory registered, skipping"
				);
				continue;
			};

			match factory(config) {
				Ok(implementation) => {
					strategy_impls.insert(name.clone(), implementation);
					let is_primary = &self.config.advance.primary == name;
					tracing::info!(component = "advance", implementation = %name, enabled = %is_primary, "Loaded");
				},
				Err(e) => {
					tracing::error!(
						component = "advance",
						implementation = %name,
						error = %e,
						"Failed to create advance strategy"
					);
					return Err(BuilderError::Config(format!(
						"Failed to create advance strategy '{}': {}",
						name, e
					)));
				},
			}
		}

		if strategy_impls.is_empty() {
			return Err(BuilderError::MissingComponent(
				"No valid advance strategy implementations available".into(),
			));
		}

		let primary = &self.config.advance.primary;
		let strategy: Arc<dyn AdvanceStrategy> = strategy_impls
			.remove(primary)
			.ok_or_else(|| {
				BuilderError::Config(format!(
					"Primary advance strategy '{}' failed to load or has invalid configuration",
					primary
				))
			})?
			.into();

		self.config
			.catalog
			.check_consistency()
			.map_err(BuilderError::Config)?;
		let catalog = Arc::new(self.config.catalog.clone());
		tracing::info!(
			component = "catalog",
			offerings = catalog.offerings.len(),
			providers = catalog.providers.len(),
			"Loaded"
		);

		let store = Arc::new(OrderLifecycleStore::new(catalog));
		let event_bus = EventBus::new(self.config.session.event_capacity);

		Ok(SessionEngine::new(self.config, store, strategy, event_bus))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::engine::tests::test_config;
	use laundry_order::{get_all_strategy_implementations, StrategyFactory};

	fn factories() -> HashMap<String, StrategyFactory> {
		get_all_strategy_implementations()
			.into_iter()
			.map(|(name, factory)| (name.to_string(), factory))
			.collect()
	}

	fn table(s: &str) -> toml::Value {
		toml::Value::Table(toml::from_str(s).unwrap())
	}

	#[tokio::test]
	async fn test_build_with_registered_strategy() {
		let engine = SessionBuilder::new(test_config()).build(factories()).unwrap();

		assert_eq!(engine.config().session.id, "engine-test");
		assert_eq!(engine.store().catalog().offerings.len(), 5);
		assert!(engine.snapshot().await.is_empty());
	}

	#[test]
	fn test_unknown_primary_is_rejected() {
		let mut config = test_config();
		config.advance.primary = "random".to_string();

		let result = SessionBuilder::new(config).build(factories());
		assert!(matches!(result, Err(BuilderError::Config(_))));
	}

	#[test]
	fn test_invalid_strategy_config_is_rejected() {
		let mut config = test_config();
		config.advance.primary = "random".to_string();
		config
			.advance
			.implementations
			.insert("random".to_string(), table("probability = 1.5"));

		let result = SessionBuilder::new(config).build(factories());
		assert!(matches!(result, Err(BuilderError::Config(msg)) if msg.contains("random")));
	}

	#[test]
	fn test_no_known_strategies() {
		let result = SessionBuilder::new(test_config()).build(HashMap::<String, StrategyFactory>::new());
		assert!(matches!(result, Err(BuilderError::MissingComponent(_))));
	}
}
