use log::{error, info};
use time::OffsetDateTime;

use crate::domain::gateway::{
	GatewayError, GatewayPaymentRequest, GatewaySelection, PaymentGateway,
};
use crate::domain::payment::{Payment, PaymentRecord};
use crate::domain::repository::PaymentRepository;

pub struct ProcessPaymentUseCase<R: PaymentRepository, G: PaymentGateway> {
	payment_repo: R,
	gateway:      G,
}

impl<R, G> Clone for ProcessPaymentUseCase<R, G>
where
	R: PaymentRepository + Clone,
	G: PaymentGateway + Clone,
{
	fn clone(&self) -> Self {
		Self {
			payment_repo: self.payment_repo.clone(),
			gateway:      self.gateway.clone(),
		}
	}
}

impl<R: PaymentRepository, G: PaymentGateway> ProcessPaymentUseCase<R, G> {
	pub fn new(payment_repo: R, gateway: G) -> Self {
		Self {
			payment_repo,
			gateway,
		}
	}

	/// Submits one delivery attempt to the selected gateway and, once it is
	/// accepted, appends it to the ledger.
	///
	/// A ledger failure is logged and does not fail the attempt: the gateway
	/// already took the payment, so submitting it again would double charge.
	pub async fn execute(
		&self,
		payment: &Payment,
		selection: &GatewaySelection,
	) -> Result<PaymentRecord, GatewayError> {
		let request = GatewayPaymentRequest {
			correlation_id: payment.correlation_id,
			amount:         payment.amount,
			requested_at:   OffsetDateTime::now_utc(),
		};

		self.gateway.submit(&selection.endpoint, &request).await?;

		let record =
			PaymentRecord::of(payment, selection.label, request.requested_at);
		info!(
			"Payment {} accepted by {} gateway",
			payment.correlation_id, selection.label
		);

		if let Err(e) = self.payment_repo.save(record.clone()).await {
			error!(
				"Could not record accepted payment {}: {e}",
				payment.correlation_id
			);
		}

		Ok(record)
	}
}
