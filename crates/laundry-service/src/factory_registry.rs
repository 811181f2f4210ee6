//! Dynamic factory registry for session implementations.
//!
//! This module provides a centralized registry for the advance strategy
//! factories, allowing the strategy to be picked by name in configuration.

use laundry_config::Config;
use laundry_core::{SessionBuilder, SessionEngine};
use laundry_order::StrategyFactory;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Global registry for all implementation factories
pub struct FactoryRegistry {
	pub strategy: HashMap<String, StrategyFactory>,
}

impl FactoryRegistry {
	/// Create a new empty registry
	pub fn new() -> Self {
		Self {
			strategy: HashMap::new(),
		}
	}

	/// Register a strategy implementation
	pub fn register_strategy(&mut self, name: impl Into<String>, factory: StrategyFactory) {
		self.strategy.insert(name.into(), factory);
	}

	/// Names of all registered strategies, sorted.
	pub fn strategy_names(&self) -> Vec<String> {
		let mut names: Vec<_> = self.strategy.keys().cloned().collect();
		names.sort();
		names
	}
}

// Global registry instance
static REGISTRY: OnceLock<FactoryRegistry> = OnceLock::new();

/// Initialize the global registry with all available implementations
pub fn initialize_registry() -> &'static FactoryRegistry {
	REGISTRY.get_or_init(|| {
		let mut registry = FactoryRegistry::new();

		// Auto-register all strategy implementations
		for (name, factory) in laundry_order::get_all_strategy_implementations() {
			tracing::debug!("Registering strategy implementation: {}", name);
			registry.register_strategy(name, factory);
		}

		registry
	})
}

/// Get the global factory registry
pub fn get_registry() -> &'static FactoryRegistry {
	initialize_registry()
}

/// Build a session engine using the registry and config
pub fn build_session_from_config(
	config: Config,
) -> Result<SessionEngine, Box<dyn std::error::Error>> {
	let registry = get_registry();

	let mut strategy_factories = HashMap::new();
	for name in config.advance.implementations.keys() {
		let Some(factory) = registry.strategy.get(name) else {
			return Err(format!(
				"Unknown strategy implementation '{}'. Available: [{}]",
				name,
				registry.strategy_names().join(", ")
			)
			.into());
		};
		strategy_factories.insert(name.clone(), *factory);
	}

	Ok(SessionBuilder::new(config).build(strategy_factories)?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::str::FromStr;

	const CONFIG: &str = r#"
[session]
id = "registry-test"

[advance]
primary = "random"
[advance.implementations.random]
probability = 0.5
seed = 11

[[catalog.offerings]]
name = "Express"
unit_price = "$2.50/lb"
"#;

	#[test]
	fn test_registry_contains_bundled_strategies() {
		assert_eq!(
			get_registry().strategy_names(),
			vec!["always", "never", "random"]
		);
	}

	#[test]
	fn test_build_from_config() {
		let config = Config::from_str(CONFIG).unwrap();
		let engine = build_session_from_config(config).unwrap();
		assert_eq!(engine.config().session.id, "registry-test");
	}

	#[test]
	fn test_unknown_strategy_lists_available() {
		let config =
			Config::from_str(&format!("{}\n[advance.implementations.webhook]\n", CONFIG)).unwrap();

		let Err(err) = build_session_from_config(config) else {
			panic!("unknown strategy should be rejected");
		};
		let err = err.to_string();
		assert!(err.contains("webhook"));
		assert!(err.contains("always, never, random"));
	}
}
