//! Random advance strategy.
//!
//! Simulates a provider working through its orders: on every tick each open
//! order moves forward with a fixed probability.

use async_trait::async_trait;
use laundry_types::{
	ConfigSchema, Field, FieldType, ImplementationRegistry, Order, Schema, SchemaError,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

use crate::{AdvanceDecision, AdvanceStrategy, StrategyError, StrategyFactory, StrategyRegistry};

/// Default chance that an order advances on a given tick.
pub const DEFAULT_PROBABILITY: f64 = 0.3;

/// Strategy that advances each order with a fixed probability per tick.
pub struct RandomStrategy {
	probability: f64,
	rng: Mutex<StdRng>,
}

impl RandomStrategy {
	/// Creates a strategy seeded from the operating system.
	pub fn new(probability: f64) -> Result<Self, StrategyError> {
		Self::with_rng(probability, StdRng::from_entropy())
	}

	/// Creates a strategy with a reproducible sequence of decisions.
	pub fn seeded(probability: f64, seed: u64) -> Result<Self, StrategyError> {
		Self::with_rng(probability, StdRng::seed_from_u64(seed))
	}

	fn with_rng(probability: f64, rng: StdRng) -> Result<Self, StrategyError> {
		if !(0.0..=1.0).contains(&probability) {
			return Err(StrategyError::InvalidConfig(format!(
				"probability must be between 0 and 1, got {}",
				probability
			)));
		}

		Ok(Self {
			probability,
			rng: Mutex::new(rng),
		})
	}
}

/// Configuration schema for RandomStrategy.
pub struct RandomStrategySchema;

impl ConfigSchema for RandomStrategySchema {
	fn validate(&self, config: &toml::Value) -> Result<(), SchemaError> {
		let schema = Schema::new(
			// Required fields
			vec![],
			// Optional fields
			vec![
				Field::new(
					"probability",
					FieldType::Float {
						min: Some(0.0),
						max: Some(1.0),
					},
				)
				.with_validator(|value| match value.as_float() {
					Some(p) if p.is_nan() => Err("probability cannot be NaN".to_string()),
					_ => Ok(()),
				}),
				Field::new(
					"seed",
					FieldType::Integer {
						min: Some(0),
						max: None,
					},
				),
			],
		);

		schema.validate(config)
	}
}

#[async_trait]
impl AdvanceStrategy for RandomStrategy {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(RandomStrategySchema)
	}

	async fn should_advance(&self, _order: &Order) -> AdvanceDecision {
		let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
		if rng.gen_bool(self.probability) {
			AdvanceDecision::Advance
		} else {
			AdvanceDecision::Hold
		}
	}
}

/// Factory function to create a random strategy from configuration.
///
/// Configuration parameters:
/// - `probability`: chance per tick that an order advances (default: 0.3)
/// - `seed`: optional seed for reproducible runs
pub fn create_strategy(config: &toml::Value) -> Result<Box<dyn AdvanceStrategy>, StrategyError> {
	RandomStrategySchema
		.validate(config)
		.map_err(|e| StrategyError::InvalidConfig(e.to_string()))?;

	let probability = config
		.get("probability")
		.and_then(|v| v.as_float().or_else(|| v.as_integer().map(|i| i as f64)))
		.unwrap_or(DEFAULT_PROBABILITY);

	let strategy = match config.get("seed").and_then(|v| v.as_integer()) {
		Some(seed) => RandomStrategy::seeded(probability, seed as u64)?,
		None => RandomStrategy::new(probability)?,
	};

	tracing::debug!(probability, "Created random advance strategy");
	Ok(Box::new(strategy))
}

/// Registry for the random strategy implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "random";
	type Factory = StrategyFactory;

	fn factory() -> Self::Factory {
		create_strategy
	}
}

impl StrategyRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;
	use laundry_types::testing::sample_order;
	use laundry_types::OrderStatus;

	fn table(s: &str) -> toml::Value {
		toml::Value::Table(toml::from_str(s).unwrap())
	}

	#[tokio::test]
	async fn test_probability_bounds_are_absolute() {
		let order = sample_order(OrderStatus::Pending);

		let never = RandomStrategy::seeded(0.0, 1).unwrap();
		let always = RandomStrategy::seeded(1.0, 1).unwrap();
		for _ in 0..50 {
			assert_eq!(never.should_advance(&order).await, AdvanceDecision::Hold);
			assert_eq!(always.should_advance(&order).await, AdvanceDecision::Advance);
		}
	}

	#[tokio::test]
	async fn test_seeded_strategies_agree() {
		let order = sample_order(OrderStatus::Pending);
		let a = RandomStrategy::seeded(0.3, 42).unwrap();
		let b = RandomStrategy::seeded(0.3, 42).unwrap();

		for _ in 0..20 {
			assert_eq!(a.should_advance(&order).await, b.should_advance(&order).await);
		}
	}

	#[test]
	fn test_rejects_out_of_range_probability() {
		assert!(RandomStrategy::new(1.2).is_err());
		assert!(RandomStrategy::new(-0.1).is_err());
		assert!(create_strategy(&table("probability = 2.0")).is_err());
		assert!(create_strategy(&table("probability = nan")).is_err());
	}

	#[test]
	fn test_factory_defaults() {
		let strategy = create_strategy(&table("")).unwrap();
		assert!(strategy.config_schema().validate(&table("seed = 3")).is_ok());
	}
}
