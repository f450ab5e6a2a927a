use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::dead_letter::{DeadLetter, DeadLetterSink};

#[derive(Clone, Default)]
pub struct InMemoryDeadLetterSink {
	entries: Arc<RwLock<Vec<DeadLetter>>>,
}

impl InMemoryDeadLetterSink {
	pub fn new() -> Self {
		Self::default()
	}

	pub async fn entries(&self) -> Vec<DeadLetter> {
		self.entries.read().await.clone()
	}
}

#[async_trait]
impl DeadLetterSink for InMemoryDeadLetterSink {
	async fn record(&self, dead_letter: DeadLetter) {
		self.entries.write().await.push(dead_letter);
	}
}
