//! Test fixtures.

use chrono::{Days, NaiveDate, NaiveTime};

use crate::{Order, OrderDraft, OrderStatus, PricingUnit, Provider, ProviderCatalog, ServiceOffering};

/// The four house offerings and two nearby providers.
pub fn sample_catalog() -> ProviderCatalog {
	ProviderCatalog {
		offerings: vec![
			ServiceOffering::new("Wash & Fold", "$1.50/lb"),
			ServiceOffering::new("Dry Cleaning", "$4.99/item"),
			ServiceOffering::new("Express", "$2.50/lb"),
			ServiceOffering::new("Premium", "$3.99/lb"),
			ServiceOffering::new("Stain Treatment", "call for price"),
		],
		providers: vec![
			Provider {
				id: "1".to_string(),
				name: "Fresh & Clean Laundry".to_string(),
				address: "123 Main St".to_string(),
				rating: Some(4.8),
				distance: Some("0.8 mi".to_string()),
				hours: Some("7AM - 10PM".to_string()),
				services: vec!["Wash & Fold".to_string(), "Dry Cleaning".to_string()],
			},
			Provider {
				id: "2".to_string(),
				name: "Sparkle Wash".to_string(),
				address: "456 Oak Ave".to_string(),
				rating: Some(4.5),
				distance: Some("1.2 mi".to_string()),
				hours: Some("8AM - 8PM".to_string()),
				services: vec!["Express".to_string(), "Premium".to_string()],
			},
		],
	}
}

/// A valid draft for 4 lbs of Wash & Fold picked up on `today`.
pub fn sample_draft(today: NaiveDate) -> OrderDraft {
	OrderDraft {
		service: "Wash & Fold".to_string(),
		provider_name: None,
		address: "42 Elm Street".to_string(),
		item_count: 4,
		pickup_date: today,
		pickup_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
		delivery_date: today.checked_add_days(Days::new(2)).unwrap(),
		delivery_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
		notes: None,
	}
}

/// An order in the given status.
pub fn sample_order(status: OrderStatus) -> Order {
	let pickup = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
	Order {
		id: Order::generate_id(),
		service: "Wash & Fold".to_string(),
		provider_name: None,
		status,
		address: "42 Elm Street".to_string(),
		pickup_date: pickup,
		pickup_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
		delivery_date: pickup.checked_add_days(Days::new(2)).unwrap(),
		delivery_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
		item_count: 5,
		unit: PricingUnit::Weight,
		total: None,
		notes: None,
		rating: None,
		created_at: 0,
		updated_at: 0,
	}
}
