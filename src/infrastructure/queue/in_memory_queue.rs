use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use crate::domain::payment::Payment;
use crate::domain::queue::{Message, Queue, QueueError};

pub type PaymentQueue = InMemoryQueue<Payment>;

/// Bounded multi-consumer queue on top of a tokio channel.
///
/// Consumers take turns on the receiver, so each message is handed to exactly
/// one `pop` caller, in the order it was pushed.
pub struct InMemoryQueue<B> {
	sender:   mpsc::Sender<Message<B>>,
	receiver: Arc<Mutex<mpsc::Receiver<Message<B>>>>,
	capacity: usize,
}

impl<B> Clone for InMemoryQueue<B> {
	fn clone(&self) -> Self {
		Self {
			sender:   self.sender.clone(),
			receiver: Arc::clone(&self.receiver),
			capacity: self.capacity,
		}
	}
}

impl<B: Send + 'static> InMemoryQueue<B> {
	pub fn new(capacity: usize) -> Self {
		let capacity = capacity.max(1);
		let (sender, receiver) = mpsc::channel(capacity);
		Self {
			sender,
			receiver: Arc::new(Mutex::new(receiver)),
			capacity,
		}
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	/// Messages waiting to be popped.
	pub fn len(&self) -> usize {
		self.capacity - self.sender.capacity()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

#[async_trait]
impl<B: Send + 'static> Queue<B> for InMemoryQueue<B> {
	async fn pop(&self) -> Option<Message<B>> {
		let mut receiver = self.receiver.lock().await;
		receiver.recv().await
	}

	async fn push(&self, message: Message<B>) -> Result<(), QueueError> {
		self.sender.try_send(message).map_err(|e| match e {
			mpsc::error::TrySendError::Full(_) => QueueError::Full {
				capacity: self.capacity,
			},
			mpsc::error::TrySendError::Closed(_) => QueueError::Closed,
		})
	}
}
