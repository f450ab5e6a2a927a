use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, error};
use derive_more::derive::{Display, Error};
use log::warn;
use serde::Serialize;

use crate::domain::queue::QueueError;

#[derive(Serialize)]
struct ErrorResponse {
	#[serde(rename = "statusCode")]
	status_code: u16,
	error:       String,
	message:     String,
}

#[derive(Debug, Display, Error)]
pub enum ApiError {
	#[display("Request data is invalid.")]
	BadClientDataError,
	#[display("Payment queue is full, try again later.")]
	QueueFullError,
	#[display("Could not reach the payment ledger.")]
	LedgerUnavailableError,
	#[display("Internal server error.")]
	InternalServerError,
}

impl ApiError {
	pub fn name(&self) -> String {
		match self {
			ApiError::BadClientDataError => "Bad request".to_string(),
			ApiError::QueueFullError => "Service Unavailable".to_string(),
			ApiError::LedgerUnavailableError => "Service Unavailable".to_string(),
			ApiError::InternalServerError => "Internal Server Error".to_string(),
		}
	}
}

impl error::ResponseError for ApiError {
	fn error_response(&self) -> HttpResponse {
		HttpResponse::build(self.status_code())
			.content_type(ContentType::json())
			.json(ErrorResponse {
				status_code: self.status_code().as_u16(),
				error:       self.to_string(),
				message:     self.name(),
			})
	}

	fn status_code(&self) -> StatusCode {
		match self {
			ApiError::BadClientDataError => StatusCode::BAD_REQUEST,
			ApiError::QueueFullError => StatusCode::SERVICE_UNAVAILABLE,
			ApiError::LedgerUnavailableError => StatusCode::SERVICE_UNAVAILABLE,
			ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl From<QueueError> for ApiError {
	fn from(err: QueueError) -> Self {
		match err {
			QueueError::Full { .. } => ApiError::QueueFullError,
			QueueError::Closed => ApiError::InternalServerError,
		}
	}
}

impl From<Box<dyn std::error::Error + Send>> for ApiError {
	fn from(_: Box<dyn std::error::Error + Send>) -> Self {
		ApiError::LedgerUnavailableError
	}
}

pub fn json_error_handler(
	err: JsonPayloadError,
	_req: &HttpRequest,
) -> actix_web::Error {
	warn!("Rejected request body: {err}");
	ApiError::BadClientDataError.into()
}

pub fn query_error_handler(
	err: QueryPayloadError,
	_req: &HttpRequest,
) -> actix_web::Error {
	warn!("Rejected query string: {err}");
	ApiError::BadClientDataError.into()
}
