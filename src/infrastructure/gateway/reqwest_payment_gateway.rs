use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use crate::domain::gateway::{
	GatewayError, GatewayHealth, GatewayPaymentRequest, PaymentGateway,
};

#[derive(Clone)]
pub struct ReqwestPaymentGateway {
	http_client:    Client,
	probe_timeout:  Duration,
	submit_timeout: Duration,
}

impl ReqwestPaymentGateway {
	pub fn new(
		http_client: Client,
		probe_timeout: Duration,
		submit_timeout: Duration,
	) -> Self {
		Self {
			http_client,
			probe_timeout,
			submit_timeout,
		}
	}
}

fn transport_error(e: reqwest::Error) -> GatewayError {
	if e.is_timeout() {
		GatewayError::Timeout
	} else {
		GatewayError::Transport {
			message: e.to_string(),
		}
	}
}

#[async_trait]
impl PaymentGateway for ReqwestPaymentGateway {
	async fn health(
		&self,
		gateway_url: &str,
	) -> Result<GatewayHealth, GatewayError> {
		let resp = self
			.http_client
			.get(format!("{gateway_url}/payments/service-health"))
			.timeout(self.probe_timeout)
			.send()
			.await
			.map_err(transport_error)?;

		if !resp.status().is_success() {
			return Err(GatewayError::UnexpectedStatus {
				status: resp.status().as_u16(),
			});
		}

		resp.json::<GatewayHealth>().await.map_err(|e| {
			if e.is_timeout() {
				GatewayError::Timeout
			} else {
				GatewayError::Decode {
					message: e.to_string(),
				}
			}
		})
	}

	async fn submit(
		&self,
		gateway_url: &str,
		request: &GatewayPaymentRequest,
	) -> Result<(), GatewayError> {
		let resp = self
			.http_client
			.post(format!("{gateway_url}/payments"))
			.json(request)
			.timeout(self.submit_timeout)
			.send()
			.await
			.map_err(transport_error)?;

		let status = resp.status();
		debug!(
			"Gateway {gateway_url} answered {status} for {}",
			request.correlation_id
		);

		if status.is_success() {
			Ok(())
		} else {
			Err(GatewayError::UnexpectedStatus {
				status: status.as_u16(),
			})
		}
	}
}
