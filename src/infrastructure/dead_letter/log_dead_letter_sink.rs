use async_trait::async_trait;
use log::error;

use crate::domain::dead_letter::{DeadLetter, DeadLetterSink};

/// Reports abandoned payments in the service log. Nothing is persisted.
#[derive(Clone, Copy, Default)]
pub struct LogDeadLetterSink;

#[async_trait]
impl DeadLetterSink for LogDeadLetterSink {
	async fn record(&self, dead_letter: DeadLetter) {
		error!(
			"Dropping payment {} ({}) after {} attempts: {}",
			dead_letter.correlation_id,
			dead_letter.amount,
			dead_letter.attempts,
			dead_letter.reason
		);
	}
}
