use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::gateway::GatewayLabel;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Payment {
	#[serde(rename = "correlationId")]
	pub correlation_id: Uuid,
	pub amount:         f64,
}

/// A payment accepted by a gateway. Written once to the ledger, never updated.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PaymentRecord {
	#[serde(rename = "correlationId")]
	pub correlation_id: Uuid,
	pub amount:         f64,
	pub processor:      GatewayLabel,
	#[serde(rename = "requestedAt", with = "time::serde::rfc3339")]
	pub requested_at:   OffsetDateTime,
}

impl PaymentRecord {
	pub fn of(
		payment: &Payment,
		processor: GatewayLabel,
		requested_at: OffsetDateTime,
	) -> Self {
		Self {
			correlation_id: payment.correlation_id,
			amount: payment.amount,
			processor,
			requested_at,
		}
	}
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct PaymentSummary {
	#[serde(rename = "totalRequests")]
	pub total_requests: usize,
	#[serde(rename = "totalAmount")]
	pub total_amount:   f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct PaymentsSummary {
	pub default:  PaymentSummary,
	pub fallback: PaymentSummary,
}

impl PaymentsSummary {
	/// Groups records by the gateway that accepted them. Amount totals are
	/// rounded to one decimal place.
	pub fn from_records<'a, I>(records: I) -> Self
	where
		I: IntoIterator<Item = &'a PaymentRecord>,
	{
		let mut summary = PaymentsSummary::default();

		for record in records {
			let group = match record.processor {
				GatewayLabel::Default => &mut summary.default,
				GatewayLabel::Fallback => &mut summary.fallback,
			};
			group.total_requests += 1;
			group.total_amount += record.amount;
		}

		summary.default.total_amount = round_to_tenth(summary.default.total_amount);
		summary.fallback.total_amount = round_to_tenth(summary.fallback.total_amount);
		summary
	}
}

fn round_to_tenth(amount: f64) -> f64 {
	(amount * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record(amount: f64, processor: GatewayLabel) -> PaymentRecord {
		PaymentRecord {
			correlation_id: Uuid::new_v4(),
			amount,
			processor,
			requested_at: OffsetDateTime::now_utc(),
		}
	}

	#[test]
	fn test_summary_groups_by_gateway_and_rounds_amounts() {
		let records = vec![
			record(10.0, GatewayLabel::Default),
			record(5.05, GatewayLabel::Default),
			record(7.0, GatewayLabel::Fallback),
		];

		let summary = PaymentsSummary::from_records(&records);

		assert_eq!(summary.default.total_requests, 2);
		assert_eq!(summary.default.total_amount, 15.1);
		assert_eq!(summary.fallback.total_requests, 1);
		assert_eq!(summary.fallback.total_amount, 7.0);
	}

	#[test]
	fn test_summary_of_no_records_is_zeroed() {
		let summary = PaymentsSummary::from_records(&[]);

		assert_eq!(summary, PaymentsSummary::default());
	}

	#[test]
	fn test_summary_serializes_with_camel_case_fields() {
		let summary = PaymentsSummary::from_records(&[record(
			19.9,
			GatewayLabel::Fallback,
		)]);

		let json = serde_json::to_value(&summary).unwrap();

		assert_eq!(json["default"]["totalRequests"], 0);
		assert_eq!(json["fallback"]["totalRequests"], 1);
		assert_eq!(json["fallback"]["totalAmount"], 19.9);
	}

	#[test]
	fn test_record_round_trips_through_ledger_json() {
		let original = record(12.34, GatewayLabel::Default);

		let json = serde_json::to_string(&original).unwrap();
		let parsed: PaymentRecord = serde_json::from_str(&json).unwrap();

		assert!(json.contains("\"processor\":\"default\""));
		assert_eq!(parsed.correlation_id, original.correlation_id);
		assert_eq!(parsed.processor, GatewayLabel::Default);
	}
}
