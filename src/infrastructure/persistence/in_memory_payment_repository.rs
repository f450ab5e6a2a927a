use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::domain::payment::PaymentRecord;
use crate::domain::repository::PaymentRepository;

#[derive(Clone, Default)]
pub struct InMemoryPaymentRepository {
	records: Arc<RwLock<Vec<PaymentRecord>>>,
}

impl InMemoryPaymentRepository {
	pub fn new() -> Self {
		Self::default()
	}

	pub async fn all(&self) -> Vec<PaymentRecord> {
		self.records.read().await.clone()
	}
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
	async fn save(
		&self,
		payment: PaymentRecord,
	) -> Result<(), Box<dyn std::error::Error + Send>> {
		self.records.write().await.push(payment);
		Ok(())
	}

	async fn find_between(
		&self,
		from: Option<OffsetDateTime>,
		to: Option<OffsetDateTime>,
	) -> Result<Vec<PaymentRecord>, Box<dyn std::error::Error + Send>> {
		let records = self.records.read().await;
		Ok(records
			.iter()
			.filter(|r| from.is_none_or(|from| r.requested_at >= from))
			.filter(|r| to.is_none_or(|to| r.requested_at <= to))
			.cloned()
			.collect())
	}

	async fn clear(&self) -> Result<(), Box<dyn std::error::Error + Send>> {
		self.records.write().await.clear();
		Ok(())
	}
}
