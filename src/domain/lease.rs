use std::time::Duration;

use async_trait::async_trait;
use derive_more::derive::{Display, Error};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaseRecord {
	pub holder_id:  Uuid,
	pub expires_at: OffsetDateTime,
}

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum CoordinationError {
	#[display("coordination store unavailable: {message}")]
	Unavailable { message: String },
	#[display("malformed value under '{key}': {message}")]
	Malformed { key: String, message: String },
}

impl From<redis::RedisError> for CoordinationError {
	fn from(err: redis::RedisError) -> Self {
		CoordinationError::Unavailable {
			message: err.to_string(),
		}
	}
}

/// Time-bounded exclusive claims stored in the shared coordination store.
///
/// Every operation is a single atomic step on one key.
#[async_trait]
pub trait LeaseStore: Send + Sync + 'static {
	/// Claims `key` for `holder_id` only if nobody holds it.
	async fn try_acquire(
		&self,
		key: &str,
		holder_id: Uuid,
		ttl: Duration,
	) -> Result<bool, CoordinationError>;

	/// Extends the lease only if it is still held by `holder_id`.
	async fn renew(
		&self,
		key: &str,
		holder_id: Uuid,
		ttl: Duration,
	) -> Result<bool, CoordinationError>;

	async fn read(&self, key: &str)
	-> Result<Option<LeaseRecord>, CoordinationError>;
}
