use async_trait::async_trait;
use time::OffsetDateTime;

use crate::domain::gateway::GatewaySelection;
use crate::domain::lease::CoordinationError;
use crate::domain::payment::PaymentRecord;

#[async_trait]
pub trait PaymentRepository: Send + Sync + 'static {
	async fn save(
		&self,
		payment: PaymentRecord,
	) -> Result<(), Box<dyn std::error::Error + Send>>;
	/// Records requested within `[from, to]`; a missing bound is open.
	async fn find_between(
		&self,
		from: Option<OffsetDateTime>,
		to: Option<OffsetDateTime>,
	) -> Result<Vec<PaymentRecord>, Box<dyn std::error::Error + Send>>;
	async fn clear(&self) -> Result<(), Box<dyn std::error::Error + Send>>;
}

#[async_trait]
pub trait GatewaySelectionRepository: Send + Sync + 'static {
	async fn save(
		&self,
		selection: &GatewaySelection,
	) -> Result<(), CoordinationError>;
	/// `Ok(None)` when nothing usable is stored, including malformed payloads.
	async fn load(&self) -> Result<Option<GatewaySelection>, CoordinationError>;
}
