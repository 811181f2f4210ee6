//! Event bus for session events.
//!
//! A thin wrapper over a tokio broadcast channel. Every subscriber sees every
//! event published after it subscribed; slow subscribers lag rather than
//! blocking the session.

use laundry_types::SessionEvent;
use tokio::sync::broadcast;

/// Broadcast channel shared by the session engine and its observers.
#[derive(Clone)]
pub struct EventBus {
	sender: broadcast::Sender<SessionEvent>,
}

impl EventBus {
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
		self.sender.subscribe()
	}

	/// Publishes an event to all current subscribers.
	///
	/// Fails only when nobody is subscribed.
	pub fn publish(
		&self,
		event: SessionEvent,
	) -> Result<(), broadcast::error::SendError<SessionEvent>> {
		self.sender.send(event)?;
		Ok(())
	}

	pub fn subscriber_count(&self) -> usize {
		self.sender.receiver_count()
	}
}
