use std::sync::Arc;
use std::time::Duration;

use log::info;
use tokio::time::sleep;

use crate::domain::gateway::PaymentGateway;
use crate::domain::lease::LeaseStore;
use crate::domain::repository::GatewaySelectionRepository;
use crate::infrastructure::coordination::leader_election::Leadership;
use crate::use_cases::health_check::HealthCheckUseCase;

/// Leader-only loop. Cycles never overlap and the loop exits as soon as the
/// lease no longer names this instance.
pub async fn health_monitor_worker<S, G, L>(
	health_check_use_case: Arc<HealthCheckUseCase<S, G>>,
	leadership: Leadership<L>,
	check_interval: Duration,
) where
	S: GatewaySelectionRepository,
	G: PaymentGateway,
	L: LeaseStore + Clone,
{
	info!("Health monitor started");

	loop {
		health_check_use_case.execute().await;

		sleep(check_interval).await;

		if !leadership.is_still_leader().await {
			info!("Leadership lost, health monitor exiting");
			break;
		}
	}
}
