use async_trait::async_trait;
use derive_more::derive::{Display, Error};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Response time reported for a gateway whose probe failed.
pub const UNREACHABLE_RESPONSE_TIME_MS: u64 = 10_000;

#[derive(
	Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GatewayLabel {
	#[display("default")]
	Default,
	#[display("fallback")]
	Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gateway {
	pub label: GatewayLabel,
	pub url:   String,
}

impl Gateway {
	pub fn new(label: GatewayLabel, url: impl Into<String>) -> Self {
		Self {
			label,
			url: url.into(),
		}
	}

	pub fn selected_at(&self, observed_at: OffsetDateTime) -> GatewaySelection {
		GatewaySelection {
			endpoint: self.url.clone(),
			label: self.label,
			observed_at,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct GatewayHealth {
	pub failing:           bool,
	#[serde(rename = "minResponseTime")]
	pub min_response_time: u64,
}

impl GatewayHealth {
	pub fn healthy(min_response_time: u64) -> Self {
		Self {
			failing: false,
			min_response_time,
		}
	}

	pub fn unreachable() -> Self {
		Self {
			failing:           true,
			min_response_time: UNREACHABLE_RESPONSE_TIME_MS,
		}
	}
}

/// The gateway every worker should currently dispatch to, as published by the
/// elected health monitor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GatewaySelection {
	pub endpoint:    String,
	pub label:       GatewayLabel,
	#[serde(rename = "observedAt", with = "time::serde::rfc3339")]
	pub observed_at: OffsetDateTime,
}

/// Body of `POST {gateway}/payments`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayPaymentRequest {
	#[serde(rename = "correlationId")]
	pub correlation_id: Uuid,
	pub amount:         f64,
	#[serde(rename = "requestedAt", with = "time::serde::rfc3339")]
	pub requested_at:   OffsetDateTime,
}

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
	#[display("gateway did not answer in time")]
	Timeout,
	#[display("gateway responded with status {status}")]
	UnexpectedStatus { status: u16 },
	#[display("could not reach gateway: {message}")]
	Transport { message: String },
	#[display("unreadable gateway response: {message}")]
	Decode { message: String },
}

#[async_trait]
pub trait PaymentGateway: Send + Sync + 'static {
	async fn health(&self, gateway_url: &str)
	-> Result<GatewayHealth, GatewayError>;
	async fn submit(
		&self,
		gateway_url: &str,
		request: &GatewayPaymentRequest,
	) -> Result<(), GatewayError>;
}
