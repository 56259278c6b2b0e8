//! Service entry-point: loads settings, builds the pool, and serves HTTP.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use booksyde::inbound::http::health::HealthState;
use booksyde::outbound::persistence::DbPool;
use booksyde::settings::ServiceSettings;
use server::{ServerConfig, create_server, drain_on, shutdown_signal};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServiceSettings::load_from_args(std::env::args_os())?;
    let pool_config = settings.pool_config()?;
    let bind_addr = settings.bind_addr()?;
    let store_timeout = settings.store_timeout()?;
    info!(?settings, "settings loaded");

    // Connections open on first use; an unreachable database fails requests,
    // not startup.
    let db_pool = DbPool::lazy(&pool_config);

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(bind_addr, db_pool).with_store_timeout(store_timeout);
    let server = create_server(health_state.clone(), config)
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    actix_web::rt::spawn(drain_on(shutdown_signal(), health_state, server.handle()));

    server.await.wrap_err("http server terminated abnormally")
}
