//! Utility functions for timestamps and display formatting.

pub mod formatting;
pub mod time;

pub use formatting::{format_money, short_id};
pub use time::{current_timestamp, local_today};
