use crate::domain::payment::PaymentsSummary;
use crate::domain::repository::PaymentRepository;
use crate::use_cases::dto::GetPaymentSummaryQuery;

#[derive(Clone)]
pub struct GetPaymentSummaryUseCase<R: PaymentRepository> {
	payment_repo: R,
}

impl<R: PaymentRepository> GetPaymentSummaryUseCase<R> {
	pub fn new(payment_repo: R) -> Self {
		Self { payment_repo }
	}

	pub async fn execute(
		&self,
		query: GetPaymentSummaryQuery,
	) -> Result<PaymentsSummary, Box<dyn std::error::Error + Send>> {
		let records = self
			.payment_repo
			.find_between(query.from, query.to)
			.await?;

		Ok(PaymentsSummary::from_records(&records))
	}
}
