use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::domain::gateway::{Gateway, GatewaySelection};
use crate::domain::payment_router::PaymentRouter;
use crate::domain::repository::GatewaySelectionRepository;

struct CachedSelection {
	selection:  GatewaySelection,
	fetched_at: Instant,
}

/// Resolves the active gateway from a short-lived process cache, then the
/// shared store, then the configured default.
pub struct TwoTierPaymentRouter<S: GatewaySelectionRepository> {
	store:           S,
	default_gateway: Gateway,
	freshness:       Duration,
	local:           Arc<RwLock<Option<CachedSelection>>>,
}

impl<S: GatewaySelectionRepository + Clone> Clone for TwoTierPaymentRouter<S> {
	fn clone(&self) -> Self {
		Self {
			store:           self.store.clone(),
			default_gateway: self.default_gateway.clone(),
			freshness:       self.freshness,
			local:           Arc::clone(&self.local),
		}
	}
}

impl<S: GatewaySelectionRepository> TwoTierPaymentRouter<S> {
	pub fn new(store: S, default_gateway: Gateway, freshness: Duration) -> Self {
		Self {
			store,
			default_gateway,
			freshness,
			local: Arc::new(RwLock::new(None)),
		}
	}

	async fn fresh_local(&self) -> Option<GatewaySelection> {
		self.local
			.read()
			.await
			.as_ref()
			.filter(|cached| cached.fetched_at.elapsed() < self.freshness)
			.map(|cached| cached.selection.clone())
	}
}

#[async_trait]
impl<S: GatewaySelectionRepository> PaymentRouter for TwoTierPaymentRouter<S> {
	async fn get_processor_for_payment(&self) -> GatewaySelection {
		if let Some(selection) = self.fresh_local().await {
			return selection;
		}

		match self.store.load().await {
			Ok(Some(selection)) => {
				*self.local.write().await = Some(CachedSelection {
					selection:  selection.clone(),
					fetched_at: Instant::now(),
				});
				selection
			}
			Ok(None) => {
				debug!("No shared gateway selection yet, using default gateway");
				self.default_gateway.selected_at(OffsetDateTime::now_utc())
			}
			Err(e) => {
				warn!("Could not read shared gateway selection: {e}");
				self.default_gateway.selected_at(OffsetDateTime::now_utc())
			}
		}
	}
}
