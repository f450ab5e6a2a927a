use std::time::Duration;

use serde::Deserialize;

use crate::domain::gateway::{Gateway, GatewayLabel};
use crate::domain::retry_policy::RetryPolicy;
use crate::domain::routing_policy::RoutingPolicy;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
	pub redis_url: String,
	pub default_payment_processor_url: String,
	pub fallback_payment_processor_url: String,
	pub server_port: u16,
	pub server_keepalive: u64,
	pub queue_capacity: usize,
	pub worker_concurrency: usize,
	pub max_attempts: u32,
	pub backoff_base_ms: u64,
	pub backoff_cap_ms: u64,
	pub probe_timeout_ms: u64,
	pub submit_timeout_ms: u64,
	pub fast_response_threshold_ms: u64,
	pub response_time_multiplier: u64,
	pub lease_ttl_ms: u64,
	pub lease_renew_interval_ms: u64,
	pub health_check_interval_ms: u64,
	pub selection_freshness_ms: u64,
}

impl Config {
	pub fn load() -> Result<Self, config::ConfigError> {
		let config_builder = config::Config::builder()
			.set_default("redis_url", "redis://127.0.0.1/")?
			.set_default("server_port", 9999)?
			.set_default("server_keepalive", 60)?
			.set_default("queue_capacity", 50_000)?
			.set_default("worker_concurrency", 2)?
			.set_default("max_attempts", 5)?
			.set_default("backoff_base_ms", 1_000)?
			.set_default("backoff_cap_ms", 15_000)?
			.set_default("probe_timeout_ms", 1_000)?
			.set_default("submit_timeout_ms", 10_000)?
			.set_default("fast_response_threshold_ms", 120)?
			.set_default("response_time_multiplier", 3)?
			.set_default("lease_ttl_ms", 5_000)?
			.set_default("lease_renew_interval_ms", 3_000)?
			.set_default("health_check_interval_ms", 5_000)?
			.set_default("selection_freshness_ms", 5_000)?
			.add_source(config::Environment::with_prefix("APP"))
			.build()?;

		let config: Config = config_builder.try_deserialize()?;
		config.validate()?;
		Ok(config)
	}

	fn validate(&self) -> Result<(), config::ConfigError> {
		if self.queue_capacity == 0 {
			return Err(invalid("queue_capacity must be greater than zero"));
		}
		if self.worker_concurrency == 0 {
			return Err(invalid("worker_concurrency must be greater than zero"));
		}
		if self.max_attempts == 0 {
			return Err(invalid("max_attempts must be greater than zero"));
		}
		if self.lease_renew_interval_ms >= self.lease_ttl_ms {
			return Err(invalid(
				"lease_renew_interval_ms must be shorter than lease_ttl_ms",
			));
		}
		Ok(())
	}

	pub fn default_gateway(&self) -> Gateway {
		Gateway::new(
			GatewayLabel::Default,
			self.default_payment_processor_url.trim_end_matches('/'),
		)
	}

	pub fn fallback_gateway(&self) -> Gateway {
		Gateway::new(
			GatewayLabel::Fallback,
			self.fallback_payment_processor_url.trim_end_matches('/'),
		)
	}

	pub fn retry_policy(&self) -> RetryPolicy {
		RetryPolicy {
			max_attempts: self.max_attempts,
			base_delay:   Duration::from_millis(self.backoff_base_ms),
			max_delay:    Duration::from_millis(self.backoff_cap_ms),
		}
	}

	pub fn routing_policy(&self) -> RoutingPolicy {
		RoutingPolicy {
			fast_response_threshold_ms: self.fast_response_threshold_ms,
			response_time_multiplier:   self.response_time_multiplier,
		}
	}

	pub fn probe_timeout(&self) -> Duration {
		Duration::from_millis(self.probe_timeout_ms)
	}

	pub fn submit_timeout(&self) -> Duration {
		Duration::from_millis(self.submit_timeout_ms)
	}

	pub fn lease_ttl(&self) -> Duration {
		Duration::from_millis(self.lease_ttl_ms)
	}

	pub fn lease_renew_interval(&self) -> Duration {
		Duration::from_millis(self.lease_renew_interval_ms)
	}

	pub fn health_check_interval(&self) -> Duration {
		Duration::from_millis(self.health_check_interval_ms)
	}

	pub fn selection_freshness(&self) -> Duration {
		Duration::from_millis(self.selection_freshness_ms)
	}
}

fn invalid(message: &str) -> config::ConfigError {
	config::ConfigError::Message(message.to_string())
}

#[cfg(test)]
mod tests {
	use std::env;

	use super::*;

	// Both scenarios share one test: they mutate the same process environment.
	#[test]
	fn test_config_load() {
		unsafe {
			env::set_var("APP_REDIS_URL", "redis://test_redis/");
			env::set_var(
				"APP_DEFAULT_PAYMENT_PROCESSOR_URL",
				"http://test_default/",
			);
			env::set_var(
				"APP_FALLBACK_PAYMENT_PROCESSOR_URL",
				"http://test_fallback/",
			);
			env::set_var("APP_SERVER_KEEPALIVE", "120");
			env::set_var("APP_WORKER_CONCURRENCY", "8");
			env::set_var("APP_BACKOFF_CAP_MS", "2000");
		};

		let config = Config::load().expect("Failed to load config in test");

		assert_eq!(config.redis_url, "redis://test_redis/");
		assert_eq!(config.default_payment_processor_url, "http://test_default/");
		assert_eq!(
			config.fallback_payment_processor_url,
			"http://test_fallback/"
		);
		assert_eq!(config.server_keepalive, 120);
		assert_eq!(config.worker_concurrency, 8);
		assert_eq!(config.retry_policy().max_delay, Duration::from_secs(2));

		assert_eq!(config.server_port, 9999);
		assert_eq!(config.queue_capacity, 50_000);
		assert_eq!(config.retry_policy(), RetryPolicy {
			max_delay: Duration::from_secs(2),
			..RetryPolicy::default()
		});
		assert_eq!(config.routing_policy(), RoutingPolicy::default());
		assert_eq!(config.probe_timeout(), Duration::from_secs(1));
		assert_eq!(config.submit_timeout(), Duration::from_secs(10));
		assert_eq!(config.lease_ttl(), Duration::from_secs(5));
		assert_eq!(config.lease_renew_interval(), Duration::from_secs(3));
		assert_eq!(config.default_gateway().url, "http://test_default");
		assert_eq!(config.fallback_gateway().label, GatewayLabel::Fallback);

		unsafe {
			env::set_var("APP_LEASE_RENEW_INTERVAL_MS", "5000");
		}

		let rejected = Config::load();
		assert!(rejected.is_err());

		unsafe {
			env::remove_var("APP_REDIS_URL");
			env::remove_var("APP_DEFAULT_PAYMENT_PROCESSOR_URL");
			env::remove_var("APP_FALLBACK_PAYMENT_PROCESSOR_URL");
			env::remove_var("APP_SERVER_KEEPALIVE");
			env::remove_var("APP_WORKER_CONCURRENCY");
			env::remove_var("APP_BACKOFF_CAP_MS");
			env::remove_var("APP_LEASE_RENEW_INTERVAL_MS");
		}
	}
}
