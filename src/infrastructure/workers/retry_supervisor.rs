use log::{error, info, warn};
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::sleep;

use crate::domain::dead_letter::{DeadLetter, DeadLetterSink};
use crate::domain::payment::Payment;
use crate::domain::queue::{Message, Queue};
use crate::domain::retry_policy::{RetryDecision, RetryPolicy};

#[derive(Debug)]
pub struct FailedDelivery {
	pub message: Message<Payment>,
	pub reason:  String,
}

/// Lets workers hand off a failed delivery without waiting on its backoff.
#[derive(Clone)]
pub struct RetryHandle {
	sender: mpsc::UnboundedSender<FailedDelivery>,
}

impl RetryHandle {
	pub fn report(&self, message: Message<Payment>, reason: impl Into<String>) {
		let failed = FailedDelivery {
			message,
			reason: reason.into(),
		};
		if let Err(e) = self.sender.send(failed) {
			error!(
				"Retry supervisor is gone, payment {} is lost",
				e.0.message.body.correlation_id
			);
		}
	}
}

/// Starts the task that owns every pending re-enqueue.
///
/// Each failed delivery either becomes a delayed re-enqueue, tracked in a
/// `JoinSet`, or goes to the dead-letter sink once the retry ceiling is hit.
/// The supervisor stops when every `RetryHandle` is dropped and no re-enqueue
/// is pending.
pub fn spawn_retry_supervisor<Q, D>(
	queue: Q,
	policy: RetryPolicy,
	dead_letters: D,
) -> (RetryHandle, JoinHandle<()>)
where
	Q: Queue<Payment> + Clone,
	D: DeadLetterSink + Clone,
{
	let (sender, mut receiver) = mpsc::unbounded_channel::<FailedDelivery>();

	let supervisor = tokio::spawn(async move {
		let mut pending = JoinSet::new();

		loop {
			tokio::select! {
				Some(failed) = receiver.recv() => {
					schedule(&mut pending, failed, &queue, &policy, &dead_letters).await;
				}
				Some(joined) = pending.join_next(), if !pending.is_empty() => {
					if let Err(e) = joined {
						error!("Re-enqueue task failed: {e}");
					}
				}
				else => break,
			}
		}

		info!("Retry supervisor stopped");
	});

	(RetryHandle { sender }, supervisor)
}

async fn schedule<Q, D>(
	pending: &mut JoinSet<()>,
	failed: FailedDelivery,
	queue: &Q,
	policy: &RetryPolicy,
	dead_letters: &D,
) where
	Q: Queue<Payment> + Clone,
	D: DeadLetterSink + Clone,
{
	let FailedDelivery { message, reason } = failed;

	match policy.decide(message.attempts) {
		RetryDecision::GiveUp => {
			dead_letters.record(DeadLetter::of(&message, reason)).await;
		}
		RetryDecision::RetryAfter(delay) => {
			warn!(
				"Payment {} failed ({reason}), retrying in {delay:?}",
				message.body.correlation_id
			);

			let queue = queue.clone();
			let dead_letters = dead_letters.clone();
			pending.spawn(async move {
				sleep(delay).await;
				if let Err(e) = queue.push(message.clone().retried()).await {
					dead_letters
						.record(DeadLetter::of(
							&message,
							format!("{reason}; re-enqueue rejected: {e}"),
						))
						.await;
				}
			});
		}
	}
}
