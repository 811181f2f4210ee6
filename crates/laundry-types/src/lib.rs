//! Common types module for the laundry ordering system.
//!
//! This module defines the core data types shared by the pricing engine,
//! the order lifecycle store and the session engine. Keeping them in one
//! crate lets every component agree on what an order and its status are.

/// Provider and service offering catalog.
pub mod catalog;
/// Event types emitted to rendering collaborators.
pub mod events;
/// Order types, order drafts and the canonical status sequence.
pub mod order;
/// Pricing unit and parsed price expression types.
pub mod price;
/// Registry trait for named, config-built implementations.
pub mod registry;
/// Fixtures shared by the workspace's tests.
#[cfg(any(test, feature = "testing"))]
pub mod testing;
/// Utility functions for timestamps and display formatting.
pub mod utils;
/// Configuration validation types for implementation-specific TOML tables.
pub mod validation;

// Re-export all types for convenient access
pub use catalog::*;
pub use events::*;
pub use order::*;
pub use price::*;
pub use registry::*;
pub use utils::{current_timestamp, format_money, local_today, short_id};
pub use validation::*;
