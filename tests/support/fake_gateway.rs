use std::net::TcpListener;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU64, Ordering};
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, HttpServer, web};
use serde_json::{Value, json};

#[derive(Default)]
pub struct FakeGatewayState {
	failing:           AtomicBool,
	min_response_time: AtomicU64,
	health_status:     AtomicU16,
	payment_status:    AtomicU16,
	delay_ms:          AtomicU64,
	received:          Mutex<Vec<Value>>,
}

/// A payment gateway served over real HTTP on an ephemeral local port.
pub struct FakeGateway {
	pub url: String,
	state:   web::Data<FakeGatewayState>,
	handle:  ServerHandle,
}

impl FakeGateway {
	pub async fn start() -> Self {
		let state = web::Data::new(FakeGatewayState {
			health_status: AtomicU16::new(200),
			payment_status: AtomicU16::new(200),
			..FakeGatewayState::default()
		});

		let listener = TcpListener::bind("127.0.0.1:0").unwrap();
		let port = listener.local_addr().unwrap().port();

		let app_state = state.clone();
		let server = HttpServer::new(move || {
			App::new()
				.app_data(app_state.clone())
				.route("/payments/service-health", web::get().to(service_health))
				.route("/payments", web::post().to(accept_payment))
		})
		.workers(1)
		.listen(listener)
		.unwrap()
		.run();

		let handle = server.handle();
		actix_web::rt::spawn(server);

		Self {
			url: format!("http://127.0.0.1:{port}"),
			state,
			handle,
		}
	}

	pub fn report(&self, failing: bool, min_response_time: u64) {
		self.state.failing.store(failing, Ordering::SeqCst);
		self.state
			.min_response_time
			.store(min_response_time, Ordering::SeqCst);
	}

	pub fn respond_to_health_with(&self, status: u16) {
		self.state.health_status.store(status, Ordering::SeqCst);
	}

	pub fn respond_to_payments_with(&self, status: u16) {
		self.state.payment_status.store(status, Ordering::SeqCst);
	}

	pub fn delay_responses_by(&self, delay: Duration) {
		self.state
			.delay_ms
			.store(delay.as_millis() as u64, Ordering::SeqCst);
	}

	pub fn received_payments(&self) -> Vec<Value> {
		self.state.received.lock().unwrap().clone()
	}

	pub async fn stop(self) {
		self.handle.stop(false).await;
	}
}

async fn delay(state: &FakeGatewayState) {
	let delay_ms = state.delay_ms.load(Ordering::SeqCst);
	if delay_ms > 0 {
		tokio::time::sleep(Duration::from_millis(delay_ms)).await;
	}
}

fn status(code: &AtomicU16) -> StatusCode {
	StatusCode::from_u16(code.load(Ordering::SeqCst)).unwrap()
}

async fn service_health(state: web::Data<FakeGatewayState>) -> HttpResponse {
	delay(&state).await;

	let status = status(&state.health_status);
	if !status.is_success() {
		return HttpResponse::build(status).finish();
	}

	HttpResponse::Ok().json(json!({
		"failing": state.failing.load(Ordering::SeqCst),
		"minResponseTime": state.min_response_time.load(Ordering::SeqCst),
	}))
}

async fn accept_payment(
	state: web::Data<FakeGatewayState>,
	body: web::Json<Value>,
) -> HttpResponse {
	delay(&state).await;
	state.received.lock().unwrap().push(body.into_inner());

	HttpResponse::build(status(&state.payment_status)).json(json!({
		"message": "payment processed successfully",
	}))
}
