use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::payment::Payment;
use crate::domain::queue::Message;

/// A payment abandoned after its last delivery attempt failed.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DeadLetter {
	#[serde(rename = "correlationId")]
	pub correlation_id: Uuid,
	pub amount:         f64,
	/// Deliveries made, including the last failed one.
	pub attempts:       u32,
	pub reason:         String,
	#[serde(rename = "droppedAt", with = "time::serde::rfc3339")]
	pub dropped_at:     OffsetDateTime,
}

impl DeadLetter {
	pub fn of(message: &Message<Payment>, reason: impl Into<String>) -> Self {
		Self {
			correlation_id: message.body.correlation_id,
			amount:         message.body.amount,
			attempts:       message.attempts + 1,
			reason:         reason.into(),
			dropped_at:     OffsetDateTime::now_utc(),
		}
	}
}

#[async_trait]
pub trait DeadLetterSink: Send + Sync + 'static {
	async fn record(&self, dead_letter: DeadLetter);
}
