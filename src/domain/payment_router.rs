use async_trait::async_trait;

use crate::domain::gateway::GatewaySelection;

#[async_trait]
pub trait PaymentRouter: Send + Sync + 'static {
	async fn get_processor_for_payment(&self) -> GatewaySelection;
}
