//! Configuration module for the laundry ordering system.
//!
//! This module provides structures and utilities for managing session
//! configuration. Configuration is read from TOML, with `${VAR}` and
//! `${VAR:-default}` placeholders resolved from the environment before parsing,
//! and validated as a whole before use.

use chrono::{Days, NaiveDate, NaiveTime};
use laundry_types::{OrderDraft, ProviderCatalog};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Time format accepted for pickup and delivery slots.
pub const TIME_FORMAT: &str = "%H:%M";

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		let message = err.message().to_string();
		ConfigError::Parse(message)
	}
}

/// Main configuration structure for a laundry ordering session.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Configuration specific to the session.
	pub session: SessionConfig,
	/// Timer settings for the simulated status advance.
	#[serde(default)]
	pub simulation: SimulationConfig,
	/// Advance strategy selection and settings.
	pub advance: AdvanceConfig,
	/// Providers and their service offerings.
	#[serde(default)]
	pub catalog: ProviderCatalog,
	/// Orders placed automatically when a demo session starts.
	#[serde(default)]
	pub demo: DemoConfig,
}

/// Configuration specific to the session.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
	/// Identifier used in logs.
	pub id: String,
	/// Capacity of the session event channel.
	/// Defaults to 64 if not specified.
	#[serde(default = "default_event_capacity")]
	pub event_capacity: usize,
}

/// Returns the default session event channel capacity.
fn default_event_capacity() -> usize {
	64
}

/// Timer settings for the simulated status advance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
	/// Seconds between two advance ticks.
	/// Defaults to 30 seconds if not specified.
	#[serde(default = "default_tick_interval_seconds")]
	pub tick_interval_seconds: u64,
}

/// Returns the default tick interval in seconds.
fn default_tick_interval_seconds() -> u64 {
	30
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			tick_interval_seconds: default_tick_interval_seconds(),
		}
	}
}

/// Configuration for advance strategies.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdvanceConfig {
	/// Which strategy implementation to use as primary.
	pub primary: String,
	/// Map of strategy implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Orders placed automatically when a demo session starts.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DemoConfig {
	#[serde(default)]
	pub orders: Vec<DemoOrderConfig>,
}

/// A demo order, with dates relative to the day the session starts.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DemoOrderConfig {
	pub service: String,
	#[serde(default)]
	pub provider: Option<String>,
	pub address: String,
	pub items: i64,
	#[serde(default)]
	pub pickup_in_days: u64,
	#[serde(default = "default_pickup_time")]
	pub pickup_time: String,
	#[serde(default = "default_delivery_in_days")]
	pub delivery_in_days: u64,
	#[serde(default = "default_delivery_time")]
	pub delivery_time: String,
	#[serde(default)]
	pub notes: Option<String>,
}

fn default_pickup_time() -> String {
	"10:00".to_string()
}

fn default_delivery_in_days() -> u64 {
	2
}

fn default_delivery_time() -> String {
	"14:00".to_string()
}

fn parse_time(field: &str, value: &str) -> Result<NaiveTime, ConfigError> {
	NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|e| {
		ConfigError::Validation(format!("Invalid {} '{}': {}", field, value, e))
	})
}

fn offset_date(today: NaiveDate, days: u64) -> Result<NaiveDate, ConfigError> {
	today
		.checked_add_days(Days::new(days))
		.ok_or_else(|| ConfigError::Validation(format!("Date offset {} is out of range", days)))
}

impl DemoOrderConfig {
	/// Builds the order draft this demo order describes for a session
	/// starting on `today`.
	///
	/// The draft is not validated here; the lifecycle store does that.
	pub fn to_draft(&self, today: NaiveDate) -> Result<OrderDraft, ConfigError> {
		Ok(OrderDraft {
			service: self.service.clone(),
			provider_name: self.provider.clone(),
			address: self.address.clone(),
			item_count: self.items,
			pickup_date: offset_date(today, self.pickup_in_days)?,
			pickup_time: parse_time("pickup_time", &self.pickup_time)?,
			delivery_date: offset_date(today, self.delivery_in_days)?,
			delivery_time: parse_time("delivery_time", &self.delivery_time)?,
			notes: self.notes.clone(),
		})
	}
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)));
				},
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

impl Config {
	/// Loads configuration from a file, resolving environment variables.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let content = tokio::fs::read_to_string(path).await?;
		content.parse()
	}

	/// Validates the configuration to ensure all required fields are properly set.
	///
	/// - Ensures session ID is not empty
	/// - Checks the tick interval is between 1 second and 24 hours
	/// - Validates the primary advance strategy is configured
	/// - Checks catalog offerings are unique and providers reference real offerings
	/// - Checks demo order times parse
	fn validate(&self) -> Result<(), ConfigError> {
		if self.session.id.is_empty() {
			return Err(ConfigError::Validation("Session ID cannot be empty".into()));
		}
		if self.session.event_capacity == 0 {
			return Err(ConfigError::Validation(
				"Session event_capacity must be greater than 0".into(),
			));
		}

		if self.simulation.tick_interval_seconds == 0 {
			return Err(ConfigError::Validation(
				"Simulation tick_interval_seconds must be greater than 0".into(),
			));
		}
		if self.simulation.tick_interval_seconds > 86400 {
			return Err(ConfigError::Validation(
				"Simulation tick_interval_seconds cannot exceed 86400 (24 hours)".into(),
			));
		}

		if self.advance.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Advance primary implementation cannot be empty".into(),
			));
		}
		if !self
			.advance
			.implementations
			.contains_key(&self.advance.primary)
		{
			return Err(ConfigError::Validation(format!(
				"Primary advance strategy '{}' not found in implementations",
				self.advance.primary
			)));
		}

		self.catalog
			.check_consistency()
			.map_err(ConfigError::Validation)?;

		for order in &self.demo.orders {
			parse_time("pickup_time", &order.pickup_time)?;
			parse_time("delivery_time", &order.delivery_time)?;
		}

		Ok(())
	}
}

/// Parse a TOML string into a validated Config.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
