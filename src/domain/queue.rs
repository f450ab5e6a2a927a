use async_trait::async_trait;
use derive_more::derive::{Display, Error};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Message<B> {
	pub id:       Uuid,
	pub body:     B,
	#[serde(default)]
	pub attempts: u32,
}

impl<B> Message<B> {
	pub fn with(id: Uuid, body: B) -> Message<B> {
		Message {
			id,
			body,
			attempts: 0,
		}
	}

	/// The same message, counted as having failed one more delivery.
	pub fn retried(self) -> Message<B> {
		Message {
			attempts: self.attempts + 1,
			..self
		}
	}
}

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum QueueError {
	#[display("queue is full (capacity {capacity})")]
	Full { capacity: usize },
	#[display("queue is closed")]
	Closed,
}

/// Bounded FIFO hand-off between producers and workers.
///
/// `push` never waits: a full queue rejects immediately. `pop` suspends until
/// an item is available and returns `None` only once the queue is closed.
#[async_trait]
pub trait Queue<B>: Send + Sync + 'static {
	async fn pop(&self) -> Option<Message<B>>;
	async fn push(&self, message: Message<B>) -> Result<(), QueueError>;
}
