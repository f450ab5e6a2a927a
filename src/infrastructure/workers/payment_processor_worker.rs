use std::sync::Arc;

use log::{debug, info};
use tokio::task::JoinHandle;

use crate::domain::gateway::PaymentGateway;
use crate::domain::payment::Payment;
use crate::domain::payment_router::PaymentRouter;
use crate::domain::queue::Queue;
use crate::domain::repository::PaymentRepository;
use crate::infrastructure::workers::retry_supervisor::RetryHandle;
use crate::use_cases::process_payment::ProcessPaymentUseCase;

/// Consumes the queue until it is closed, one delivery attempt per message.
pub async fn payment_processing_worker<Q, P, R, G>(
	worker_id: usize,
	queue: Q,
	router: Arc<P>,
	process_payment_use_case: Arc<ProcessPaymentUseCase<R, G>>,
	retries: RetryHandle,
) where
	Q: Queue<Payment>,
	P: PaymentRouter,
	R: PaymentRepository,
	G: PaymentGateway,
{
	while let Some(message) = queue.pop().await {
		debug!(
			"Worker {worker_id} picked payment {} (attempt {})",
			message.body.correlation_id,
			message.attempts + 1
		);

		let selection = router.get_processor_for_payment().await;

		if let Err(e) = process_payment_use_case
			.execute(&message.body, &selection)
			.await
		{
			retries.report(message, format!("{} gateway: {e}", selection.label));
		}
	}

	info!("Worker {worker_id} stopped, payment queue closed");
}

pub fn spawn_payment_workers<Q, P, R, G>(
	concurrency: usize,
	queue: Q,
	router: Arc<P>,
	process_payment_use_case: Arc<ProcessPaymentUseCase<R, G>>,
	retries: RetryHandle,
) -> Vec<JoinHandle<()>>
where
	Q: Queue<Payment> + Clone,
	P: PaymentRouter,
	R: PaymentRepository,
	G: PaymentGateway,
{
	(0..concurrency)
		.map(|worker_id| {
			tokio::spawn(payment_processing_worker(
				worker_id,
				queue.clone(),
				Arc::clone(&router),
				Arc::clone(&process_payment_use_case),
				retries.clone(),
			))
		})
		.collect()
}
