use std::sync::Arc;

use rinha_dispatcher::infrastructure::config::settings::Config;
use rinha_dispatcher::run;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
	let config = Arc::new(Config::load().map_err(std::io::Error::other)?);
	run(config).await
}
