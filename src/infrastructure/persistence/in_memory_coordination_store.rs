use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::warn;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

use crate::domain::gateway::GatewaySelection;
use crate::domain::lease::{CoordinationError, LeaseRecord, LeaseStore};
use crate::domain::repository::GatewaySelectionRepository;

/// Process-local stand-in for the shared coordination store.
///
/// Leases expire on the tokio clock, so paused-time tests can step through
/// TTLs deterministically. The selection is kept serialized, exactly as it
/// would be in Redis.
#[derive(Clone, Default)]
pub struct InMemoryCoordinationStore {
	leases:    Arc<Mutex<HashMap<String, (Uuid, Instant)>>>,
	selection: Arc<Mutex<Option<String>>>,
}

impl InMemoryCoordinationStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Drops the lease under `key` as if its TTL had run out.
	pub async fn expire(&self, key: &str) {
		self.leases.lock().await.remove(key);
	}

	pub async fn put_raw_selection(&self, payload: impl Into<String>) {
		*self.selection.lock().await = Some(payload.into());
	}
}

#[async_trait]
impl LeaseStore for InMemoryCoordinationStore {
	async fn try_acquire(
		&self,
		key: &str,
		holder_id: Uuid,
		ttl: Duration,
	) -> Result<bool, CoordinationError> {
		let mut leases = self.leases.lock().await;
		let now = Instant::now();

		if let Some((_, deadline)) = leases.get(key) &&
			*deadline > now
		{
			return Ok(false);
		}

		leases.insert(key.to_string(), (holder_id, now + ttl));
		Ok(true)
	}

	async fn renew(
		&self,
		key: &str,
		holder_id: Uuid,
		ttl: Duration,
	) -> Result<bool, CoordinationError> {
		let mut leases = self.leases.lock().await;
		let now = Instant::now();

		match leases.get_mut(key) {
			Some((holder, deadline)) if *holder == holder_id && *deadline > now => {
				*deadline = now + ttl;
				Ok(true)
			}
			_ => Ok(false),
		}
	}

	async fn read(
		&self,
		key: &str,
	) -> Result<Option<LeaseRecord>, CoordinationError> {
		let leases = self.leases.lock().await;
		let now = Instant::now();

		Ok(leases
			.get(key)
			.filter(|(_, deadline)| *deadline > now)
			.map(|(holder_id, deadline)| LeaseRecord {
				holder_id:  *holder_id,
				expires_at: OffsetDateTime::now_utc() +
					deadline.saturating_duration_since(now),
			}))
	}
}

#[async_trait]
impl GatewaySelectionRepository for InMemoryCoordinationStore {
	async fn save(
		&self,
		selection: &GatewaySelection,
	) -> Result<(), CoordinationError> {
		let payload = serde_json::to_string(selection).map_err(|e| {
			CoordinationError::Malformed {
				key:     "selection".to_string(),
				message: e.to_string(),
			}
		})?;
		*self.selection.lock().await = Some(payload);
		Ok(())
	}

	async fn load(&self) -> Result<Option<GatewaySelection>, CoordinationError> {
		let payload = self.selection.lock().await.clone();

		Ok(payload.and_then(|payload| {
			serde_json::from_str(&payload)
				.inspect_err(|e| warn!("Ignoring malformed gateway selection: {e}"))
				.ok()
		}))
	}
}
