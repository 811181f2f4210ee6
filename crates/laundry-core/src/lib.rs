//! Core session engine for the laundry ordering system.
//!
//! This crate ties the pieces together: the lifecycle store that owns a
//! session's orders, the state machine that validates every status change,
//! the session engine that publishes events and runs the status simulation,
//! and the builder that assembles an engine from configuration.

pub mod builder;
pub mod engine;
pub mod state;
pub mod store;

pub use builder::{BuilderError, SessionBuilder};
pub use engine::event_bus::EventBus;
pub use engine::ticker::SessionHandle;
pub use engine::{EngineError, SessionEngine};
pub use state::{OrderStateError, OrderStateMachine};
pub use store::{OrderLifecycleStore, RatingError};
