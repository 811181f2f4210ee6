//! Fixed advance strategies.
//!
//! `always` moves every open order forward on each tick, `never` holds them
//! all. Useful for demos and for driving a session deterministically.

use async_trait::async_trait;
use laundry_types::{ConfigSchema, ImplementationRegistry, Order, Schema, SchemaError};

use crate::{AdvanceDecision, AdvanceStrategy, StrategyError, StrategyFactory, StrategyRegistry};

/// Strategy returning the same decision for every order.
pub struct FixedStrategy {
	decision: AdvanceDecision,
}

impl FixedStrategy {
	pub fn always() -> Self {
		Self {
			decision: AdvanceDecision::Advance,
		}
	}

	pub fn never() -> Self {
		Self {
			decision: AdvanceDecision::Hold,
		}
	}
}

/// Configuration schema for FixedStrategy. It takes no settings.
pub struct FixedStrategySchema;

impl ConfigSchema for FixedStrategySchema {
	fn validate(&self, config: &toml::Value) -> Result<(), SchemaError> {
		Schema::new(vec![], vec![]).validate(config)
	}
}

#[async_trait]
impl AdvanceStrategy for FixedStrategy {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(FixedStrategySchema)
	}

	async fn should_advance(&self, _order: &Order) -> AdvanceDecision {
		self.decision
	}
}

/// Registry for the `always` strategy.
pub struct AlwaysRegistry;

impl ImplementationRegistry for AlwaysRegistry {
	const NAME: &'static str = "always";
	type Factory = StrategyFactory;

	fn factory() -> Self::Factory {
		|config: &toml::Value| -> Result<Box<dyn AdvanceStrategy>, StrategyError> {
			FixedStrategySchema
				.validate(config)
				.map_err(|e| StrategyError::InvalidConfig(e.to_string()))?;
			Ok(Box::new(FixedStrategy::always()))
		}
	}
}

impl StrategyRegistry for AlwaysRegistry {}

/// Registry for the `never` strategy.
pub struct NeverRegistry;

impl ImplementationRegistry for NeverRegistry {
	const NAME: &'static str = "never";
	type Factory = StrategyFactory;

	fn factory() -> Self::Factory {
		|config: &toml::Value| -> Result<Box<dyn AdvanceStrategy>, StrategyError> {
			FixedStrategySchema
				.validate(config)
				.map_err(|e| StrategyError::InvalidConfig(e.to_string()))?;
			Ok(Box::new(FixedStrategy::never()))
		}
	}
}

impl StrategyRegistry for NeverRegistry {}
