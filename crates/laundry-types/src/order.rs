//! Order types for the laundry ordering system.
//!
//! This module defines the canonical order status sequence together with the
//! display metadata derived from it, the order record owned by the lifecycle
//! store, and the unvalidated draft submitted by the order form.

use chrono::{Days, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::{short_id, PricingUnit, ProviderCatalog, ServiceOffering};

/// Percentage points covered by each lifecycle step.
pub const PROGRESS_PER_STEP: u8 = 25;

/// Status of an order, in strict forward order.
///
/// `Completed` is the only terminal state and is absorbing under
/// [`OrderStatus::advance`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
	/// Order placed, waiting for the provider to pick it up.
	Pending,
	/// Laundry is being washed or cleaned.
	Processing,
	/// Laundry is on its way back to the customer.
	Delivery,
	/// Order delivered.
	Completed,
}

impl OrderStatus {
	/// Every status in lifecycle order.
	pub const ALL: [OrderStatus; 4] = [
		OrderStatus::Pending,
		OrderStatus::Processing,
		OrderStatus::Delivery,
		OrderStatus::Completed,
	];

	/// Position of this status in the lifecycle (0..=3).
	pub fn step_index(self) -> usize {
		match self {
			OrderStatus::Pending => 0,
			OrderStatus::Processing => 1,
			OrderStatus::Delivery => 2,
			OrderStatus::Completed => 3,
		}
	}

	/// Progress percentage shown by the tracker.
	pub fn progress(self) -> u8 {
		(self.step_index() as u8 + 1) * PROGRESS_PER_STEP
	}

	/// Returns the next status in the lifecycle.
	///
	/// `Completed` maps to itself.
	pub fn advance(self) -> OrderStatus {
		match self {
			OrderStatus::Pending => OrderStatus::Processing,
			OrderStatus::Processing => OrderStatus::Delivery,
			OrderStatus::Delivery => OrderStatus::Completed,
			OrderStatus::Completed => OrderStatus::Completed,
		}
	}

	pub fn is_terminal(self) -> bool {
		self == OrderStatus::Completed
	}

	/// Whether tracker step `step` should be drawn as done for this status.
	pub fn is_step_completed(self, step: usize) -> bool {
		usize::from(self.progress()) > step * usize::from(PROGRESS_PER_STEP)
	}

	/// Badge label used on order cards.
	pub fn label(self) -> &'static str {
		match self {
			OrderStatus::Pending => "Pending Pickup",
			OrderStatus::Processing => "Processing",
			OrderStatus::Delivery => "Out for Delivery",
			OrderStatus::Completed => "Completed",
		}
	}

	/// Longer sentence used by the active order tracker.
	pub fn tracker_text(self) -> &'static str {
		match self {
			OrderStatus::Pending => "Waiting for pickup",
			OrderStatus::Processing => "Processing your laundry",
			OrderStatus::Delivery => "Out for delivery",
			OrderStatus::Completed => "Completed",
		}
	}

	pub fn icon(self) -> StatusIcon {
		match self {
			OrderStatus::Pending => StatusIcon::Clock,
			OrderStatus::Processing => StatusIcon::Package,
			OrderStatus::Delivery => StatusIcon::Truck,
			OrderStatus::Completed => StatusIcon::Check,
		}
	}

	/// Short label for this status when drawn as a tracker step.
	pub fn step_label(self) -> &'static str {
		match self {
			OrderStatus::Pending => "Pickup",
			OrderStatus::Processing => "Processing",
			OrderStatus::Delivery => "Delivery",
			OrderStatus::Completed => "Complete",
		}
	}

	/// Bundles the display metadata for this status.
	pub fn display(self) -> StatusDisplay {
		StatusDisplay {
			status: self,
			progress: self.progress(),
			label: self.label(),
			tracker_text: self.tracker_text(),
			icon: self.icon(),
		}
	}

	/// Per-step view of the tracker for an order currently in this status.
	pub fn tracker_steps(self) -> Vec<TrackerStep> {
		OrderStatus::ALL
			.iter()
			.enumerate()
			.map(|(index, step)| TrackerStep {
				status: *step,
				label: step.step_label(),
				icon: step.icon(),
				completed: self.is_step_completed(index),
				current: *step == self,
			})
			.collect()
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OrderStatus::Pending => write!(f, "pending"),
			OrderStatus::Processing => write!(f, "processing"),
			OrderStatus::Delivery => write!(f, "delivery"),
			OrderStatus::Completed => write!(f, "completed"),
		}
	}
}

/// Icon key a renderer maps to its own icon set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusIcon {
	Clock,
	Package,
	Truck,
	Check,
}

impl StatusIcon {
	pub fn as_str(self) -> &'static str {
		match self {
			StatusIcon::Clock => "clock",
			StatusIcon::Package => "package",
			StatusIcon::Truck => "truck",
			StatusIcon::Check => "check",
		}
	}
}

/// Display metadata derived from a status.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatusDisplay {
	pub status: OrderStatus,
	pub progress: u8,
	pub label: &'static str,
	pub tracker_text: &'static str,
	pub icon: StatusIcon,
}

/// One step of the progress tracker.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TrackerStep {
	pub status: OrderStatus,
	pub label: &'static str,
	pub icon: StatusIcon,
	/// Drawn as done.
	pub completed: bool,
	/// The order is currently in this step.
	pub current: bool,
}

/// A placed laundry order.
///
/// Created once from a validated [`OrderDraft`] and owned by the lifecycle
/// store afterwards. Orders are never deleted, only advanced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
	/// Unique identifier for this order.
	pub id: String,
	/// Name of the selected service offering.
	pub service: String,
	/// Fulfilling provider, when the order was placed from a provider page.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub provider_name: Option<String>,
	/// Current lifecycle status.
	pub status: OrderStatus,
	/// Pickup address.
	pub address: String,
	pub pickup_date: NaiveDate,
	pub pickup_time: NaiveTime,
	pub delivery_date: NaiveDate,
	pub delivery_time: NaiveTime,
	/// Number of items or pounds, depending on `unit`.
	pub item_count: u32,
	/// Pricing unit of the selected offering.
	pub unit: PricingUnit,
	/// Computed price, `None` when the offering's price could not be parsed.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub total: Option<Decimal>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
	/// Customer rating (1-5), only set once the order is completed.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub rating: Option<u8>,
	/// Timestamp when this order was created.
	pub created_at: u64,
	/// Timestamp when this order was last updated.
	pub updated_at: u64,
}

impl Order {
	/// Generates a fresh order identifier.
	pub fn generate_id() -> String {
		format!("ORD{}", uuid::Uuid::new_v4().simple()).to_uppercase()
	}

	/// Last four characters of the id, as shown on order badges.
	pub fn short_id(&self) -> &str {
		short_id(&self.id)
	}

	pub fn is_active(&self) -> bool {
		!self.status.is_terminal()
	}

	/// Quantity with its unit label, e.g. `4 lbs`.
	pub fn quantity_label(&self) -> String {
		format!("{} {}", self.item_count, self.unit.label())
	}

	/// Total for display; an unavailable total is shown as zero.
	pub fn display_total(&self) -> Decimal {
		self.total.unwrap_or(Decimal::ZERO)
	}
}

/// A single forward status change applied to an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusChange {
	pub order_id: String,
	pub from: OrderStatus,
	pub to: OrderStatus,
}

/// Errors reported when an order draft fails validation.
///
/// Only the first unmet precondition is reported.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
	#[error("Please select a service")]
	MissingService,
	#[error("Unknown provider: {0}")]
	UnknownProvider(String),
	#[error("Service '{service}' is not offered{}", offered_by(.provider))]
	UnknownService {
		service: String,
		provider: Option<String>,
	},
	#[error("Please enter a pickup address")]
	MissingAddress,
	#[error("Quantity must be at least 1, got {0}")]
	NonPositiveQuantity(i64),
	#[error("Quantity {0} is too large")]
	QuantityOutOfRange(i64),
	#[error("Pickup date {pickup} is before today ({today})")]
	PickupInPast { pickup: NaiveDate, today: NaiveDate },
	#[error("Delivery date {delivery} must be at least one day after pickup date {pickup}")]
	DeliveryTooEarly {
		pickup: NaiveDate,
		delivery: NaiveDate,
	},
}

fn offered_by(provider: &Option<String>) -> String {
	provider
		.as_ref()
		.map(|p| format!(" by {}", p))
		.unwrap_or_default()
}

/// Unvalidated order input from the order form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderDraft {
	pub service: String,
	#[serde(default)]
	pub provider_name: Option<String>,
	pub address: String,
	/// Raw quantity as entered; may be zero or negative.
	pub item_count: i64,
	pub pickup_date: NaiveDate,
	pub pickup_time: NaiveTime,
	pub delivery_date: NaiveDate,
	pub delivery_time: NaiveTime,
	#[serde(default)]
	pub notes: Option<String>,
}

/// Result of a successful draft validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDraft<'a> {
	/// The catalog offering the draft refers to.
	pub offering: &'a ServiceOffering,
	pub item_count: u32,
}

impl OrderDraft {
	/// Validates the draft against the catalog and the current date.
	///
	/// Checks run in a fixed order: service, provider/offering, address,
	/// quantity, pickup date, delivery date.
	pub fn validate<'a>(
		&self,
		catalog: &'a ProviderCatalog,
		today: NaiveDate,
	) -> Result<ResolvedDraft<'a>, ValidationError> {
		let service = self.service.trim();
		if service.is_empty() {
			return Err(ValidationError::MissingService);
		}

		let provider = self
			.provider_name
			.as_deref()
			.map(str::trim)
			.filter(|p| !p.is_empty());
		let offering = catalog.resolve(provider, service)?;

		if self.address.trim().is_empty() {
			return Err(ValidationError::MissingAddress);
		}

		if self.item_count <= 0 {
			return Err(ValidationError::NonPositiveQuantity(self.item_count));
		}
		let item_count = u32::try_from(self.item_count)
			.map_err(|_| ValidationError::QuantityOutOfRange(self.item_count))?;

		if self.pickup_date < today {
			return Err(ValidationError::PickupInPast {
				pickup: self.pickup_date,
				today,
			});
		}

		// No representable day after pickup means no valid delivery date.
		let delivery_ok = self
			.pickup_date
			.checked_add_days(Days::new(1))
			.is_some_and(|earliest| self.delivery_date >= earliest);
		if !delivery_ok {
			return Err(ValidationError::DeliveryTooEarly {
				pickup: self.pickup_date,
				delivery: self.delivery_date,
			});
		}

		Ok(ResolvedDraft {
			offering,
			item_count,
		})
	}
}
