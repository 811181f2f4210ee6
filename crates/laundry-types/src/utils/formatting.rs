//! String formatting utilities.
//!
//! Provides helpers for the short order badges and money amounts shown on
//! order cards.

use rust_decimal::Decimal;

/// Returns the last four characters of an order id.
///
/// Ids shorter than four characters are returned unchanged.
pub fn short_id(id: &str) -> &str {
	let start = id
		.char_indices()
		.rev()
		.nth(3)
		.map(|(i, _)| i)
		.unwrap_or(0);
	&id[start..]
}

/// Formats an amount with its currency marker and two decimal places.
pub fn format_money(currency: char, amount: Decimal) -> String {
	let mut value = amount.round_dp(2);
	value.rescale(2);
	format!("{}{}", currency, value)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::str::FromStr;

	#[test]
	fn test_short_id() {
		assert_eq!(short_id("ORD1234"), "1234");
		assert_eq!(short_id("AB"), "AB");
		assert_eq!(short_id(""), "");
	}

	#[test]
	fn test_format_money() {
		assert_eq!(format_money('$', Decimal::from_str("6").unwrap()), "$6.00");
		assert_eq!(format_money('$', Decimal::from_str("14.97").unwrap()), "$14.97");
		assert_eq!(format_money('$', Decimal::ZERO), "$0.00");
	}
}
