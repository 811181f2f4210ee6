//! Price calculation for the laundry ordering system.
//!
//! Providers publish their rates as short price expressions such as
//! `$1.50/lb` or `$4.99/item`. This module extracts the numeric rate from such
//! an expression and turns a rate and a quantity into a rounded total.
//!
//! Everything here is a pure function of its inputs.

use laundry_types::{format_money, PriceExpression, PricingUnit, ServiceOffering};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Number of decimal places totals are rounded to.
pub const CURRENCY_DECIMALS: u32 = 2;

/// Currency marker followed by digits and an optional fractional part.
static PRICE_TOKEN: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"([$€£])\s*(\d[\d,]*(?:\.\d+)?)").expect("price token pattern is valid")
});

/// Amount written with comma thousands separators, e.g. `1,000.00`.
static GROUPED_AMOUNT: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"^\d{1,3}(?:,\d{3})+(?:\.\d+)?$").expect("grouped amount pattern is valid")
});

/// Errors that can occur while pricing an order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PricingError {
	/// The expression does not contain exactly one currency-prefixed number.
	#[error("Malformed price expression: '{0}'")]
	MalformedPriceExpression(String),
	/// Rate times quantity does not fit in a decimal.
	#[error("Price overflow for {quantity} x {rate}")]
	Overflow { rate: Decimal, quantity: u32 },
}

/// Parses a unit price expression into its currency, rate and unit.
///
/// The expression must contain exactly one numeric token prefixed by a
/// currency marker; anything following the token is only used to pick the
/// pricing unit. Commas are accepted only as thousands separators.
pub fn parse_price_expression(expression: &str) -> Result<PriceExpression, PricingError> {
	let malformed = || PricingError::MalformedPriceExpression(expression.to_string());

	let mut tokens = PRICE_TOKEN.captures_iter(expression);
	let token = tokens.next().ok_or_else(malformed)?;
	if tokens.next().is_some() {
		return Err(malformed());
	}

	let currency = token
		.get(1)
		.and_then(|m| m.as_str().chars().next())
		.ok_or_else(malformed)?;
	let amount = token.get(2).map(|m| m.as_str()).ok_or_else(malformed)?;
	if amount.contains(',') && !GROUPED_AMOUNT.is_match(amount) {
		return Err(malformed());
	}
	let rate = Decimal::from_str(&amount.replace(',', "")).map_err(|_| malformed())?;

	Ok(PriceExpression {
		currency,
		rate,
		unit: PricingUnit::from_expression(expression),
	})
}

/// Multiplies a rate by a quantity and rounds half-up to cents.
pub fn total_for_rate(rate: Decimal, quantity: u32) -> Result<Decimal, PricingError> {
	rate.checked_mul(Decimal::from(quantity))
		.map(|total| {
			total.round_dp_with_strategy(CURRENCY_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
		})
		.ok_or(PricingError::Overflow { rate, quantity })
}

/// Computes the total for `quantity` units of a price expression.
///
/// The caller is responsible for rejecting non-positive quantities.
pub fn compute_total(unit_price_expression: &str, quantity: u32) -> Result<Decimal, PricingError> {
	let expression = parse_price_expression(unit_price_expression)?;
	total_for_rate(expression.rate, quantity)
}

/// Like [`compute_total`], but reports an unavailable total as `None`.
///
/// Orders keep `None` and display it as zero.
pub fn total_if_available(unit_price_expression: &str, quantity: u32) -> Option<Decimal> {
	match compute_total(unit_price_expression, quantity) {
		Ok(total) => Some(total),
		Err(e) => {
			tracing::warn!(expression = %unit_price_expression, error = %e, "Total unavailable");
			None
		},
	}
}

/// A priced quantity of one offering, ready for an order summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceQuote {
	pub service: String,
	pub currency: char,
	pub rate: Decimal,
	pub unit: PricingUnit,
	pub quantity: u32,
	pub total: Decimal,
}

impl PriceQuote {
	/// Prices `quantity` units of the given offering.
	pub fn for_offering(offering: &ServiceOffering, quantity: u32) -> Result<Self, PricingError> {
		let expression = parse_price_expression(&offering.unit_price)?;
		let total = total_for_rate(expression.rate, quantity)?;

		Ok(Self {
			service: offering.name.clone(),
			currency: expression.currency,
			rate: expression.rate,
			unit: expression.unit,
			quantity,
			total,
		})
	}

	/// Quantity with its unit label, e.g. `4 lbs`.
	pub fn quantity_label(&self) -> String {
		format!("{} {}", self.quantity, self.unit.label())
	}

	/// Total with currency marker, e.g. `$6.00`.
	pub fn total_label(&self) -> String {
		format_money(self.currency, self.total)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn dec(s: &str) -> Decimal {
		Decimal::from_str(s).unwrap()
	}

	#[test]
	fn test_compute_total_per_weight() {
		assert_eq!(compute_total("$1.50/lb", 4).unwrap(), dec("6.00"));
	}

	#[test]
	fn test_compute_total_per_item() {
		assert_eq!(compute_total("$4.99/item", 3).unwrap(), dec("14.97"));
	}

	#[test]
	fn test_compute_total_rounds_half_up() {
		assert_eq!(compute_total("$0.125/item", 1).unwrap(), dec("0.13"));
		assert_eq!(compute_total("$0.005/lb", 1).unwrap(), dec("0.01"));
		assert_eq!(compute_total("$2.50/lb", 5).unwrap(), dec("12.50"));
	}

	#[test]
	fn test_malformed_expressions() {
		for expression in ["free", "", "$", "1.50/lb", "$1.50 or $2.00"] {
			assert_eq!(
				compute_total(expression, 2),
				Err(PricingError::MalformedPriceExpression(expression.to_string())),
				"expression {:?}",
				expression
			);
		}
	}

	#[test]
	fn test_total_if_available() {
		assert_eq!(total_if_available("free", 3), None);
		assert_eq!(total_if_available("$3.99/lb", 2), Some(dec("7.98")));
	}

	#[test]
	fn test_thousands_separators() {
		assert_eq!(compute_total("$1,000.00/item", 2).unwrap(), dec("2000.00"));
		assert_eq!(compute_total("$12,500/item", 1).unwrap(), dec("12500"));

		for expression in ["$1,00/item", "$1,0000/item", "$1,/lb", "$10,00.50/lb"] {
			assert_eq!(
				compute_total(expression, 1),
				Err(PricingError::MalformedPriceExpression(expression.to_string())),
				"expression {:?}",
				expression
			);
		}
	}

	#[test]
	fn test_parse_price_expression() {
		let expression = parse_price_expression("€ 2.5 / lbs").unwrap();
		assert_eq!(expression.currency, '€');
		assert_eq!(expression.rate, dec("2.5"));
		assert_eq!(expression.unit, PricingUnit::Weight);

		let expression = parse_price_expression("$12").unwrap();
		assert_eq!(expression.rate, dec("12"));
		assert_eq!(expression.unit, PricingUnit::Item);
	}

	#[test]
	fn test_price_quote_labels() {
		let offering = ServiceOffering::new("Wash & Fold", "$1.50/lb");
		let quote = PriceQuote::for_offering(&offering, 8).unwrap();
		assert_eq!(quote.quantity_label(), "8 lbs");
		assert_eq!(quote.total_label(), "$12.00");

		let offering = ServiceOffering::new("Premium", "ask us");
		assert!(PriceQuote::for_offering(&offering, 1).is_err());
	}
}
