use crate::domain::gateway::{GatewayHealth, GatewayLabel};

/// Decides which gateway should receive traffic given fresh probes of both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingPolicy {
	pub fast_response_threshold_ms: u64,
	pub response_time_multiplier:   u64,
}

impl Default for RoutingPolicy {
	fn default() -> Self {
		Self {
			fast_response_threshold_ms: 120,
			response_time_multiplier:   3,
		}
	}
}

impl RoutingPolicy {
	pub fn choose(
		&self,
		default: &GatewayHealth,
		fallback: &GatewayHealth,
	) -> GatewayLabel {
		if default.failing {
			return GatewayLabel::Fallback;
		}

		if default.min_response_time < self.fast_response_threshold_ms {
			return GatewayLabel::Default;
		}

		let fallback_ceiling = default
			.min_response_time
			.saturating_mul(self.response_time_multiplier);
		if !fallback.failing && fallback.min_response_time < fallback_ceiling {
			return GatewayLabel::Fallback;
		}

		GatewayLabel::Default
	}
}
