//! State management for orders.
//!
//! This module provides the state machine that validates lifecycle
//! transitions before they are applied to an order.

pub mod order;

pub use order::{OrderStateError, OrderStateMachine};
