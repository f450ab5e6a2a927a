use async_trait::async_trait;
use log::warn;
use redis::{AsyncCommands, Client};
use time::OffsetDateTime;

use crate::domain::payment::PaymentRecord;
use crate::domain::repository::PaymentRepository;
use crate::infrastructure::config::redis::PAYMENTS_BY_DATE_KEY;

/// Ledger kept in a single sorted set scored by `requested_at` in epoch
/// milliseconds, one JSON member per accepted payment.
#[derive(Clone)]
pub struct RedisPaymentRepository {
	client: Client,
}

impl RedisPaymentRepository {
	pub fn new(client: Client) -> Self {
		Self { client }
	}

	async fn connection(
		&self,
	) -> Result<redis::aio::MultiplexedConnection, Box<dyn std::error::Error + Send>>
	{
		self.client
			.get_multiplexed_async_connection()
			.await
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)
	}
}

fn score_of(instant: OffsetDateTime) -> i64 {
	(instant.unix_timestamp_nanos() / 1_000_000) as i64
}

fn bound(instant: Option<OffsetDateTime>, open: &str) -> String {
	instant
		.map(|i| score_of(i).to_string())
		.unwrap_or_else(|| open.to_string())
}

#[async_trait]
impl PaymentRepository for RedisPaymentRepository {
	async fn save(
		&self,
		payment: PaymentRecord,
	) -> Result<(), Box<dyn std::error::Error + Send>> {
		let member = serde_json::to_string(&payment)
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;

		let mut con = self.connection().await?;
		let _: () = con
			.zadd(PAYMENTS_BY_DATE_KEY, member, score_of(payment.requested_at))
			.await
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;

		Ok(())
	}

	async fn find_between(
		&self,
		from: Option<OffsetDateTime>,
		to: Option<OffsetDateTime>,
	) -> Result<Vec<PaymentRecord>, Box<dyn std::error::Error + Send>> {
		let mut con = self.connection().await?;

		let members: Vec<String> = con
			.zrangebyscore(
				PAYMENTS_BY_DATE_KEY,
				bound(from, "-inf"),
				bound(to, "+inf"),
			)
			.await
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;

		Ok(members
			.iter()
			.filter_map(|member| {
				serde_json::from_str::<PaymentRecord>(member)
					.inspect_err(|e| {
						warn!("Skipping unreadable ledger entry '{member}': {e}")
					})
					.ok()
			})
			.collect())
	}

	async fn clear(&self) -> Result<(), Box<dyn std::error::Error + Send>> {
		let mut con = self.connection().await?;
		let _: () = con
			.del(PAYMENTS_BY_DATE_KEY)
			.await
			.map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send>)?;
		Ok(())
	}
}
