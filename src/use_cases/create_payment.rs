use log::debug;

use crate::domain::payment::Payment;
use crate::domain::queue::{Message, Queue, QueueError};
use crate::use_cases::dto::CreatePaymentCommand;

#[derive(Clone)]
pub struct CreatePaymentUseCase<Q: Queue<Payment>> {
	payment_queue: Q,
}

impl<Q: Queue<Payment>> CreatePaymentUseCase<Q> {
	pub fn new(payment_queue: Q) -> Self {
		Self { payment_queue }
	}

	/// Admits the payment for asynchronous dispatch. Never waits for room in
	/// the queue.
	pub async fn execute(
		&self,
		command: CreatePaymentCommand,
	) -> Result<(), QueueError> {
		let payment = Payment {
			correlation_id: command.correlation_id,
			amount:         command.amount,
		};

		self.payment_queue
			.push(Message::with(command.correlation_id, payment))
			.await
			.inspect(|_| debug!("Queued payment {}", command.correlation_id))
	}
}

#[cfg(test)]
mod tests {
	use uuid::Uuid;

	use super::*;
	use crate::infrastructure::queue::in_memory_queue::PaymentQueue;

	#[tokio::test]
	async fn test_admitted_payment_starts_with_zero_attempts() {
		let queue = PaymentQueue::new(4);
		let use_case = CreatePaymentUseCase::new(queue.clone());
		let correlation_id = Uuid::new_v4();

		use_case
			.execute(CreatePaymentCommand {
				correlation_id,
				amount: 19.9,
			})
			.await
			.unwrap();

		let message = queue.pop().await.unwrap();
		assert_eq!(message.body.correlation_id, correlation_id);
		assert_eq!(message.body.amount, 19.9);
		assert_eq!(message.attempts, 0);
	}

	#[tokio::test]
	async fn test_full_queue_is_reported_as_backpressure() {
		let use_case = CreatePaymentUseCase::new(PaymentQueue::new(1));
		let command = || CreatePaymentCommand {
			correlation_id: Uuid::new_v4(),
			amount:         1.0,
		};

		use_case.execute(command()).await.unwrap();

		assert_eq!(
			use_case.execute(command()).await,
			Err(QueueError::Full { capacity: 1 })
		);
	}
}
