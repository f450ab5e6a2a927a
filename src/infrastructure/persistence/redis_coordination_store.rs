use std::time::Duration;

use async_trait::async_trait;
use log::warn;
use redis::{AsyncCommands, Client, Script};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::gateway::GatewaySelection;
use crate::domain::lease::{CoordinationError, LeaseRecord, LeaseStore};
use crate::domain::repository::GatewaySelectionRepository;
use crate::infrastructure::config::redis::GATEWAY_SELECTION_KEY;

const RENEW_IF_HOLDER_LUA: &str = r#"
    if redis.call("GET", KEYS[1]) == ARGV[1] then
        return redis.call("PEXPIRE", KEYS[1], ARGV[2])
    end
    return 0
"#;

#[derive(Clone)]
pub struct RedisCoordinationStore {
	client: Client,
}

impl RedisCoordinationStore {
	pub fn new(client: Client) -> Self {
		Self { client }
	}

	async fn connection(
		&self,
	) -> Result<redis::aio::MultiplexedConnection, CoordinationError> {
		Ok(self.client.get_multiplexed_async_connection().await?)
	}
}

fn millis(duration: Duration) -> u64 {
	duration.as_millis().try_into().unwrap_or(u64::MAX)
}

#[async_trait]
impl LeaseStore for RedisCoordinationStore {
	async fn try_acquire(
		&self,
		key: &str,
		holder_id: Uuid,
		ttl: Duration,
	) -> Result<bool, CoordinationError> {
		let mut con = self.connection().await?;

		let reply: Option<String> = redis::cmd("SET")
			.arg(key)
			.arg(holder_id.to_string())
			.arg("NX")
			.arg("PX")
			.arg(millis(ttl))
			.query_async(&mut con)
			.await?;

		Ok(reply.is_some())
	}

	async fn renew(
		&self,
		key: &str,
		holder_id: Uuid,
		ttl: Duration,
	) -> Result<bool, CoordinationError> {
		let mut con = self.connection().await?;

		let renewed: i64 = Script::new(RENEW_IF_HOLDER_LUA)
			.key(key)
			.arg(holder_id.to_string())
			.arg(millis(ttl))
			.invoke_async(&mut con)
			.await?;

		Ok(renewed == 1)
	}

	async fn read(
		&self,
		key: &str,
	) -> Result<Option<LeaseRecord>, CoordinationError> {
		let mut con = self.connection().await?;

		let (holder, remaining_ms): (Option<String>, i64) = redis::pipe()
			.cmd("GET")
			.arg(key)
			.cmd("PTTL")
			.arg(key)
			.query_async(&mut con)
			.await?;

		let Some(holder) = holder else {
			return Ok(None);
		};

		let holder_id = match Uuid::parse_str(&holder) {
			Ok(id) => id,
			Err(e) => {
				warn!("Lease '{key}' holds a non-UUID value '{holder}': {e}");
				return Ok(None);
			}
		};

		// PTTL is negative when the key has no expiry or vanished in between.
		let remaining = u64::try_from(remaining_ms).unwrap_or(0);
		Ok(Some(LeaseRecord {
			holder_id,
			expires_at: OffsetDateTime::now_utc() +
				Duration::from_millis(remaining),
		}))
	}
}

#[async_trait]
impl GatewaySelectionRepository for RedisCoordinationStore {
	async fn save(
		&self,
		selection: &GatewaySelection,
	) -> Result<(), CoordinationError> {
		let payload = serde_json::to_string(selection).map_err(|e| {
			CoordinationError::Malformed {
				key:     GATEWAY_SELECTION_KEY.to_string(),
				message: e.to_string(),
			}
		})?;

		let mut con = self.connection().await?;
		let _: () = con.set(GATEWAY_SELECTION_KEY, payload).await?;
		Ok(())
	}

	async fn load(&self) -> Result<Option<GatewaySelection>, CoordinationError> {
		let mut con = self.connection().await?;
		let payload: Option<String> = con.get(GATEWAY_SELECTION_KEY).await?;

		Ok(payload.and_then(|payload| {
			serde_json::from_str(&payload)
				.inspect_err(|e| {
					warn!("Ignoring malformed gateway selection '{payload}': {e}")
				})
				.ok()
		}))
	}
}
