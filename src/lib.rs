use std::io;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer, web};
use log::info;

pub mod domain {
	pub mod dead_letter;
	pub mod gateway;
	pub mod lease;
	pub mod payment;
	pub mod payment_router;
	pub mod queue;
	pub mod repository;
	pub mod retry_policy;
	pub mod routing_policy;
}

pub mod use_cases {
	pub mod create_payment;
	pub mod dto;
	pub mod get_payment_summary;
	pub mod health_check;
	pub mod process_payment;
	pub mod purge_payments;
}

pub mod infrastructure {
	pub mod config {
		pub mod redis;
		pub mod settings;
	}
	pub mod coordination {
		pub mod leader_election;
	}
	pub mod dead_letter {
		pub mod in_memory_dead_letter_sink;
		pub mod log_dead_letter_sink;
	}
	pub mod gateway {
		pub mod reqwest_payment_gateway;
	}
	pub mod persistence {
		pub mod in_memory_coordination_store;
		pub mod in_memory_payment_repository;
		pub mod redis_coordination_store;
		pub mod redis_payment_repository;
	}
	pub mod queue {
		pub mod in_memory_queue;
	}
	pub mod routing {
		pub mod two_tier_payment_router;
	}
	pub mod workers {
		pub mod health_monitor_worker;
		pub mod payment_processor_worker;
		pub mod retry_supervisor;
	}
}

pub mod adapters {
	pub mod web {
		pub mod errors;
		pub mod payments_handler;
		pub mod payments_purge_handler;
		pub mod payments_summary_handler;
		pub mod schema;

		pub mod handlers {
			pub use super::payments_handler::payments;
			pub use super::payments_purge_handler::payments_purge;
			pub use super::payments_summary_handler::payments_summary;
		}
	}
}

use crate::adapters::web::errors::{json_error_handler, query_error_handler};
use crate::adapters::web::handlers::{payments, payments_purge, payments_summary};
use crate::infrastructure::config::redis::LEADER_LOCK_KEY;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::coordination::leader_election::{
	LeaderElection, LeaderElectionConfig,
};
use crate::infrastructure::dead_letter::log_dead_letter_sink::LogDeadLetterSink;
use crate::infrastructure::gateway::reqwest_payment_gateway::ReqwestPaymentGateway;
use crate::infrastructure::persistence::redis_coordination_store::RedisCoordinationStore;
use crate::infrastructure::persistence::redis_payment_repository::RedisPaymentRepository;
use crate::infrastructure::queue::in_memory_queue::PaymentQueue;
use crate::infrastructure::routing::two_tier_payment_router::TwoTierPaymentRouter;
use crate::infrastructure::workers::health_monitor_worker::health_monitor_worker;
use crate::infrastructure::workers::payment_processor_worker::spawn_payment_workers;
use crate::infrastructure::workers::retry_supervisor::spawn_retry_supervisor;
use crate::use_cases::create_payment::CreatePaymentUseCase;
use crate::use_cases::get_payment_summary::GetPaymentSummaryUseCase;
use crate::use_cases::health_check::HealthCheckUseCase;
use crate::use_cases::process_payment::ProcessPaymentUseCase;
use crate::use_cases::purge_payments::PurgePaymentsUseCase;

async fn verify_redis(client: &redis::Client) -> io::Result<()> {
	let mut con = client
		.get_multiplexed_async_connection()
		.await
		.map_err(io::Error::other)?;
	let _: String = redis::cmd("PING")
		.query_async(&mut con)
		.await
		.map_err(io::Error::other)?;
	Ok(())
}

pub async fn run(config: Arc<Config>) -> io::Result<()> {
	let _ = env_logger::Builder::from_env(
		env_logger::Env::default().default_filter_or("info"),
	)
	.try_init();

	let redis_client =
		redis::Client::open(config.redis_url.as_str()).map_err(io::Error::other)?;
	verify_redis(&redis_client).await?;
	info!("Connected to Redis at {}", config.redis_url);

	let http_client = reqwest::Client::builder()
		.build()
		.map_err(io::Error::other)?;
	let gateway = ReqwestPaymentGateway::new(
		http_client,
		config.probe_timeout(),
		config.submit_timeout(),
	);

	let coordination_store = RedisCoordinationStore::new(redis_client.clone());
	let payment_repo = RedisPaymentRepository::new(redis_client.clone());
	let payment_queue = PaymentQueue::new(config.queue_capacity);

	let (retries, _retry_supervisor) = spawn_retry_supervisor(
		payment_queue.clone(),
		config.retry_policy(),
		LogDeadLetterSink,
	);

	let router = Arc::new(TwoTierPaymentRouter::new(
		coordination_store.clone(),
		config.default_gateway(),
		config.selection_freshness(),
	));
	let process_payment_use_case = Arc::new(ProcessPaymentUseCase::new(
		payment_repo.clone(),
		gateway.clone(),
	));
	spawn_payment_workers(
		config.worker_concurrency,
		payment_queue.clone(),
		router,
		process_payment_use_case,
		retries,
	);
	info!("Started {} payment workers", config.worker_concurrency);

	let health_check_use_case = Arc::new(HealthCheckUseCase::new(
		coordination_store.clone(),
		gateway,
		config.default_gateway(),
		config.fallback_gateway(),
		config.routing_policy(),
	));
	let election = LeaderElection::new(coordination_store, LeaderElectionConfig {
		lock_key:       LEADER_LOCK_KEY.to_string(),
		lease_ttl:      config.lease_ttl(),
		renew_interval: config.lease_renew_interval(),
	});
	info!("Instance {} joining leader election", election.instance_id());

	let check_interval = config.health_check_interval();
	tokio::spawn(election.run(move |leadership| {
		health_monitor_worker(
			Arc::clone(&health_check_use_case),
			leadership,
			check_interval,
		)
	}));

	let create_payment_use_case =
		web::Data::new(CreatePaymentUseCase::new(payment_queue));
	let get_payment_summary_use_case =
		web::Data::new(GetPaymentSummaryUseCase::new(payment_repo.clone()));
	let purge_payments_use_case =
		web::Data::new(PurgePaymentsUseCase::new(payment_repo));

	info!("Listening on 0.0.0.0:{}", config.server_port);

	HttpServer::new(move || {
		App::new()
			.app_data(web::JsonConfig::default().error_handler(json_error_handler))
			.app_data(web::QueryConfig::default().error_handler(query_error_handler))
			.app_data(create_payment_use_case.clone())
			.app_data(get_payment_summary_use_case.clone())
			.app_data(purge_payments_use_case.clone())
			.service(payments)
			.service(payments_summary)
			.service(payments_purge)
	})
	.keep_alive(Duration::from_secs(config.server_keepalive))
	.bind(("0.0.0.0", config.server_port))?
	.run()
	.await
}
