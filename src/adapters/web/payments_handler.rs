use actix_web::{HttpResponse, Responder, ResponseError, post, web};
use log::{debug, warn};

use crate::adapters::web::errors::ApiError;
use crate::adapters::web::schema::{PaymentRequest, PaymentResponse};
use crate::infrastructure::queue::in_memory_queue::PaymentQueue;
use crate::use_cases::create_payment::CreatePaymentUseCase;
use crate::use_cases::dto::CreatePaymentCommand;

#[post("/payments")]
pub async fn payments(
	payload: web::Json<PaymentRequest>,
	create_payment_use_case: web::Data<CreatePaymentUseCase<PaymentQueue>>,
) -> impl Responder {
	if !payload.has_valid_amount() {
		warn!(
			"Rejected payment {} with amount {}",
			payload.correlation_id, payload.amount
		);
		return ApiError::BadClientDataError.error_response();
	}

	let command = CreatePaymentCommand {
		correlation_id: payload.correlation_id,
		amount:         payload.amount,
	};

	match create_payment_use_case.execute(command).await {
		Ok(()) => {
			debug!("Payment received and queued: {}", payload.correlation_id);
			HttpResponse::Accepted().json(PaymentResponse {
				payment: payload.into_inner(),
				status:  "queued".to_string(),
			})
		}
		Err(e) => {
			warn!("Could not queue payment {}: {e}", payload.correlation_id);
			ApiError::from(e).error_response()
		}
	}
}
