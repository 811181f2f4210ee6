//! Pricing types.
//!
//! The arithmetic lives in `laundry-pricing`; these types are shared so that
//! orders can carry their pricing unit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How an offering is priced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PricingUnit {
	/// Priced per garment.
	#[default]
	Item,
	/// Priced per pound (or other weight unit).
	Weight,
}

/// Suffixes recognised as weight units.
const WEIGHT_SUFFIXES: &[&str] = &["lb", "lbs", "pound", "pounds", "kg"];

impl PricingUnit {
	/// Picks the unit from the suffix of a price expression.
	///
	/// `$1.50/lb` is priced by weight; anything else (including a missing
	/// suffix) is priced per item.
	pub fn from_expression(expression: &str) -> Self {
		let suffix = match expression.rsplit_once('/') {
			Some((_, suffix)) => suffix.trim().to_lowercase(),
			None => return PricingUnit::Item,
		};

		if WEIGHT_SUFFIXES.contains(&suffix.as_str()) {
			PricingUnit::Weight
		} else {
			PricingUnit::Item
		}
	}

	/// Quantity label shown next to the count.
	pub fn label(self) -> &'static str {
		match self {
			PricingUnit::Item => "items",
			PricingUnit::Weight => "lbs",
		}
	}
}

impl fmt::Display for PricingUnit {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

/// A parsed unit price expression.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceExpression {
	/// Currency marker that prefixed the rate.
	pub currency: char,
	/// Price per unit.
	pub rate: Decimal,
	pub unit: PricingUnit,
}
