//! Periodic status simulation.
//!
//! While a session is started, a background task runs one engine tick per
//! configured interval. The first tick happens one full interval after start.

use super::SessionEngine;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Handle to a running tick timer.
///
/// The timer stops when the handle is shut down or dropped, so a session that
/// goes away cannot keep mutating its orders.
pub struct SessionHandle {
	task: JoinHandle<()>,
}

impl SessionHandle {
	pub fn shutdown(&self) {
		self.task.abort();
	}

	pub fn is_running(&self) -> bool {
		!self.task.is_finished()
	}
}

impl Drop for SessionHandle {
	fn drop(&mut self) {
		self.task.abort();
	}
}

impl SessionEngine {
	/// Starts the tick timer for this session.
	pub fn start(&self) -> SessionHandle {
		let engine = self.clone();
		let period = Duration::from_secs(self.config.simulation.tick_interval_seconds);

		let task = tokio::spawn(async move {
			let mut interval = interval_at(Instant::now() + period, period);
			interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
			loop {
				interval.tick().await;
				engine.tick().await;
			}
		});

		tracing::info!(
			session = %self.config.session.id,
			interval_seconds = period.as_secs(),
			"Status simulation started"
		);
		SessionHandle { task }
	}
}
