use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
	pub max_attempts: u32,
	pub base_delay:   Duration,
	pub max_delay:    Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
	RetryAfter(Duration),
	GiveUp,
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			max_attempts: 5,
			base_delay:   Duration::from_secs(1),
			max_delay:    Duration::from_secs(15),
		}
	}
}

impl RetryPolicy {
	/// `attempts` is the number of failed deliveries before the one that just
	/// failed.
	pub fn decide(&self, attempts: u32) -> RetryDecision {
		if attempts.saturating_add(1) < self.max_attempts {
			RetryDecision::RetryAfter(self.backoff_for(attempts))
		} else {
			RetryDecision::GiveUp
		}
	}

	pub fn backoff_for(&self, attempts: u32) -> Duration {
		2u32.checked_pow(attempts)
			.and_then(|factor| self.base_delay.checked_mul(factor))
			.map_or(self.max_delay, |delay| delay.min(self.max_delay))
	}
}
