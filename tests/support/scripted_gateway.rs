use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rinha_dispatcher::domain::gateway::{
	GatewayError, GatewayHealth, GatewayPaymentRequest, PaymentGateway,
};
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct Submission {
	pub gateway_url: String,
	pub request:     GatewayPaymentRequest,
	pub at:          Instant,
}

#[derive(Default)]
struct Script {
	submit_outcomes: VecDeque<Result<(), GatewayError>>,
	submit_fallback: Option<GatewayError>,
	health:          HashMap<String, Result<GatewayHealth, GatewayError>>,
	submissions:     Vec<Submission>,
	probes:          Vec<String>,
}

/// In-process gateway whose answers are set up front by the test.
#[derive(Clone, Default)]
pub struct ScriptedGateway {
	script: Arc<Mutex<Script>>,
}

impl ScriptedGateway {
	pub fn new() -> Self {
		Self::default()
	}

	/// Queues answers for the next submissions; once used up, submissions
	/// succeed unless `always_fail_with` was set.
	pub fn answer_submissions(
		&self,
		outcomes: impl IntoIterator<Item = Result<(), GatewayError>>,
	) {
		self.script.lock().unwrap().submit_outcomes.extend(outcomes);
	}

	pub fn always_fail_with(&self, error: GatewayError) {
		self.script.lock().unwrap().submit_fallback = Some(error);
	}

	pub fn report_health(
		&self,
		gateway_url: &str,
		health: Result<GatewayHealth, GatewayError>,
	) {
		self.script
			.lock()
			.unwrap()
			.health
			.insert(gateway_url.to_string(), health);
	}

	pub fn submissions(&self) -> Vec<Submission> {
		self.script.lock().unwrap().submissions.clone()
	}

	pub fn probes(&self) -> Vec<String> {
		self.script.lock().unwrap().probes.clone()
	}
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
	async fn health(
		&self,
		gateway_url: &str,
	) -> Result<GatewayHealth, GatewayError> {
		let mut script = self.script.lock().unwrap();
		script.probes.push(gateway_url.to_string());
		script
			.health
			.get(gateway_url)
			.cloned()
			.unwrap_or(Ok(GatewayHealth::healthy(10)))
	}

	async fn submit(
		&self,
		gateway_url: &str,
		request: &GatewayPaymentRequest,
	) -> Result<(), GatewayError> {
		let mut script = self.script.lock().unwrap();
		script.submissions.push(Submission {
			gateway_url: gateway_url.to_string(),
			request:     request.clone(),
			at:          Instant::now(),
		});

		match script.submit_outcomes.pop_front() {
			Some(outcome) => outcome,
			None => match &script.submit_fallback {
				Some(error) => Err(error.clone()),
				None => Ok(()),
			},
		}
	}
}
