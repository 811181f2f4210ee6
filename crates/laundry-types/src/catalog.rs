//! Provider catalog types.
//!
//! Providers and their published service offerings are static data supplied by
//! configuration. Orders must reference an offering that exists here.

use serde::{Deserialize, Serialize};

use crate::{PricingUnit, ValidationError};

/// A named, priced service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceOffering {
	/// Display name, e.g. "Wash & Fold".
	pub name: String,
	/// Price expression such as `$1.50/lb` or `$4.99/item`.
	pub unit_price: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

impl ServiceOffering {
	pub fn new(name: impl Into<String>, unit_price: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			unit_price: unit_price.into(),
			description: None,
		}
	}

	/// Pricing unit encoded in the price expression suffix.
	pub fn unit(&self) -> PricingUnit {
		PricingUnit::from_expression(&self.unit_price)
	}
}

/// A laundry business near the customer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Provider {
	pub id: String,
	pub name: String,
	pub address: String,
	#[serde(default)]
	pub rating: Option<f32>,
	/// Human readable distance, e.g. "0.8 mi".
	#[serde(default)]
	pub distance: Option<String>,
	/// Opening hours, e.g. "7AM - 10PM".
	#[serde(default)]
	pub hours: Option<String>,
	/// Names of the catalog offerings this provider publishes.
	#[serde(default)]
	pub services: Vec<String>,
}

impl Provider {
	pub fn offers(&self, service: &str) -> bool {
		self.services.iter().any(|s| s == service)
	}
}

/// All offerings and providers known to a session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProviderCatalog {
	#[serde(default)]
	pub offerings: Vec<ServiceOffering>,
	#[serde(default)]
	pub providers: Vec<Provider>,
}

impl ProviderCatalog {
	pub fn offering(&self, name: &str) -> Option<&ServiceOffering> {
		self.offerings.iter().find(|o| o.name == name)
	}

	pub fn provider(&self, name: &str) -> Option<&Provider> {
		self.providers.iter().find(|p| p.name == name)
	}

	/// Offerings published by the named provider, in provider order.
	pub fn offerings_for(&self, provider: &str) -> Vec<&ServiceOffering> {
		self.provider(provider)
			.map(|p| {
				p.services
					.iter()
					.filter_map(|name| self.offering(name))
					.collect()
			})
			.unwrap_or_default()
	}

	/// Finds the offering an order refers to.
	///
	/// With a provider, the provider must exist and publish the service.
	/// Without one, any catalog offering with that name matches.
	pub fn resolve(
		&self,
		provider: Option<&str>,
		service: &str,
	) -> Result<&ServiceOffering, ValidationError> {
		let unknown = || ValidationError::UnknownService {
			service: service.to_string(),
			provider: provider.map(str::to_string),
		};

		if let Some(provider_name) = provider {
			let provider = self
				.provider(provider_name)
				.ok_or_else(|| ValidationError::UnknownProvider(provider_name.to_string()))?;
			if !provider.offers(service) {
				return Err(unknown());
			}
		}

		self.offering(service).ok_or_else(unknown)
	}

	/// Checks that offering names are unique and that providers only
	/// reference offerings that exist.
	pub fn check_consistency(&self) -> Result<(), String> {
		for (i, offering) in self.offerings.iter().enumerate() {
			if offering.name.trim().is_empty() {
				return Err(format!("Offering #{} has an empty name", i));
			}
			if self.offerings[..i].iter().any(|o| o.name == offering.name) {
				return Err(format!("Duplicate offering '{}'", offering.name));
			}
		}

		for provider in &self.providers {
			for service in &provider.services {
				if self.offering(service).is_none() {
					return Err(format!(
						"Provider '{}' references unknown offering '{}'",
						provider.name, service
					));
				}
			}
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn catalog() -> ProviderCatalog {
		ProviderCatalog {
			offerings: vec![
				ServiceOffering::new("Wash & Fold", "$1.50/lb"),
				ServiceOffering::new("Dry Cleaning", "$4.99/item"),
			],
			providers: vec![Provider {
				id: "2".to_string(),
				name: "Bubble Wash".to_string(),
				address: "9 Harbor Rd".to_string(),
				rating: None,
				distance: Some("1.2 mi".to_string()),
				hours: None,
				services: vec!["Dry Cleaning".to_string()],
			}],
		}
	}

	#[test]
	fn test_offerings_for_provider() {
		let catalog = catalog();
		let offerings = catalog.offerings_for("Bubble Wash");
		assert_eq!(offerings.len(), 1);
		assert_eq!(offerings[0].unit(), PricingUnit::Item);
		assert!(catalog.offerings_for("Nobody").is_empty());
	}

	#[test]
	fn test_resolve_without_provider() {
		let catalog = catalog();
		assert_eq!(
			catalog.resolve(None, "Wash & Fold").unwrap().unit(),
			PricingUnit::Weight
		);
		assert!(catalog.resolve(None, "Ironing").is_err());
	}

	#[test]
	fn test_consistency_rejects_dangling_service() {
		let mut catalog = catalog();
		assert!(catalog.check_consistency().is_ok());

		catalog.providers[0].services.push("Express".to_string());
		let err = catalog.check_consistency().unwrap_err();
		assert!(err.contains("Express"));
	}

	#[test]
	fn test_consistency_rejects_duplicates() {
		let mut catalog = catalog();
		catalog
			.offerings
			.push(ServiceOffering::new("Wash & Fold", "$2.00/lb"));
		assert!(catalog.check_consistency().is_err());
	}
}
