use log::{info, warn};
use time::OffsetDateTime;

use crate::domain::gateway::{
	Gateway, GatewayHealth, GatewayLabel, GatewaySelection, PaymentGateway,
};
use crate::domain::repository::GatewaySelectionRepository;
use crate::domain::routing_policy::RoutingPolicy;

/// One health evaluation cycle: probe both gateways, pick one, publish it.
pub struct HealthCheckUseCase<S: GatewaySelectionRepository, G: PaymentGateway> {
	selection_repo:   S,
	gateway:          G,
	default_gateway:  Gateway,
	fallback_gateway: Gateway,
	policy:           RoutingPolicy,
}

impl<S, G> HealthCheckUseCase<S, G>
where
	S: GatewaySelectionRepository,
	G: PaymentGateway,
{
	pub fn new(
		selection_repo: S,
		gateway: G,
		default_gateway: Gateway,
		fallback_gateway: Gateway,
		policy: RoutingPolicy,
	) -> Self {
		Self {
			selection_repo,
			gateway,
			default_gateway,
			fallback_gateway,
			policy,
		}
	}

	pub async fn execute(&self) -> GatewaySelection {
		let (default, fallback) = tokio::join!(
			self.probe(&self.default_gateway),
			self.probe(&self.fallback_gateway)
		);

		let chosen = match self.policy.choose(&default, &fallback) {
			GatewayLabel::Default => &self.default_gateway,
			GatewayLabel::Fallback => &self.fallback_gateway,
		};
		let selection = chosen.selected_at(OffsetDateTime::now_utc());

		info!(
			"Selected {} gateway (default: {default:?}, fallback: {fallback:?})",
			selection.label
		);

		if let Err(e) = self.selection_repo.save(&selection).await {
			warn!("Could not publish gateway selection: {e}");
		}

		selection
	}

	async fn probe(&self, gateway: &Gateway) -> GatewayHealth {
		match self.gateway.health(&gateway.url).await {
			Ok(health) => health,
			Err(e) => {
				warn!("Health probe of {} gateway failed: {e}", gateway.label);
				GatewayHealth::unreachable()
			}
		}
	}
}
