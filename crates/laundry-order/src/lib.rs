//! Status advance strategies for the laundry ordering system.
//!
//! A session periodically asks its advance strategy, order by order, whether
//! an order should move one step forward. The strategy only decides; the
//! lifecycle store applies the transition. The bundled strategies simulate a
//! provider's progress, and a real status feed (push or poll) plugs in behind
//! the same trait.

use async_trait::async_trait;
use laundry_types::{ConfigSchema, ImplementationRegistry, Order};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod strategies {
		pub mod fixed;
		pub mod random;
	}
}

/// Errors that can occur during strategy creation.
#[derive(Debug, Error)]
pub enum StrategyError {
	/// Error that occurs when strategy configuration is invalid.
	#[error("Invalid configuration: {0}")]
	InvalidConfig(String),
}

/// Decision made by an advance strategy for one order on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceDecision {
	/// Move the order one step forward.
	Advance,
	/// Leave the order where it is.
	Hold,
}

/// Trait defining the interface for status advance strategies.
///
/// Strategies are consulted once per tick for every non-terminal order.
/// They are never asked about completed orders.
#[async_trait]
pub trait AdvanceStrategy: Send + Sync {
	/// Returns the configuration schema for this strategy implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Decides whether the order should advance on this tick.
	async fn should_advance(&self, order: &Order) -> AdvanceDecision;
}

/// Type alias for strategy factory functions.
pub type StrategyFactory = fn(&toml::Value) -> Result<Box<dyn AdvanceStrategy>, StrategyError>;

/// Registry trait for strategy implementations.
pub trait StrategyRegistry: ImplementationRegistry<Factory = StrategyFactory> {}

/// Get all registered strategy implementations.
///
/// Returns a vector of (name, factory) tuples for all available strategy implementations.
pub fn get_all_strategy_implementations() -> Vec<(&'static str, StrategyFactory)> {
	use implementations::strategies::{fixed, random};

	vec![
		(random::Registry::NAME, random::Registry::factory()),
		(fixed::AlwaysRegistry::NAME, fixed::AlwaysRegistry::factory()),
		(fixed::NeverRegistry::NAME, fixed::NeverRegistry::factory()),
	]
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_all_strategies_registered() {
		let names: Vec<&str> = get_all_strategy_implementations()
			.into_iter()
			.map(|(name, _)| name)
			.collect();
		assert_eq!(names, vec!["random", "always", "never"]);
	}
}
