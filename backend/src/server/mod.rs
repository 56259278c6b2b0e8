//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServerHandle, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use tracing::{info, warn};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use booksyde::Trace;
#[cfg(debug_assertions)]
use booksyde::doc::ApiDoc;
use booksyde::domain::UserRegistrationService;
use booksyde::domain::ports::UserRepository;
use booksyde::inbound::http::error::json_error_handler;
use booksyde::inbound::http::health::{HealthState, live, ready};
use booksyde::inbound::http::ping::ping;
use booksyde::inbound::http::state::HttpState;
use booksyde::inbound::http::users::{create_user, list_users};
use booksyde::outbound::persistence::DieselUserRepository;

/// Wire the registration service onto a repository.
fn build_http_state<R>(repository: Arc<R>, config: &ServerConfig) -> web::Data<HttpState>
where
    R: UserRepository + 'static,
{
    let service = Arc::new(UserRegistrationService::with_timeout(
        repository,
        config.store_timeout,
    ));
    web::Data::new(HttpState::new(service.clone(), service))
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(Trace)
        .service(ping)
        .service(list_users)
        .service(create_user)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

#[cfg(feature = "metrics")]
fn make_metrics() -> std::io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new("booksyde")
        .endpoint("/metrics")
        .build()
        .map_err(|err| std::io::Error::other(format!("metrics registration failed: {err}")))
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let repository = Arc::new(DieselUserRepository::new(config.db_pool.clone()));
    let http_state = build_http_state(repository, &config);
    let server_health_state = health_state.clone();

    #[cfg(feature = "metrics")]
    let prometheus = make_metrics()?;

    let server = HttpServer::new(move || {
        let app = build_app(server_health_state.clone(), http_state.clone());

        #[cfg(feature = "metrics")]
        let app = app.wrap(prometheus.clone());

        app
    })
    .disable_signals()
    .bind(config.bind_addr)?
    .run();

    info!(addr = %config.bind_addr, "http server bound");
    health_state.mark_ready();
    Ok(server)
}

async fn wait_or_park(name: &'static str, result: std::io::Result<()>) {
    if let Err(error) = result {
        warn!(signal = name, %error, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

/// Resolve on SIGINT, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let interrupt = async { wait_or_park("SIGINT", tokio::signal::ctrl_c().await).await };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => wait_or_park("SIGTERM", Err(error)).await,
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => {}
        () = terminate => {}
    }
}

/// Once `signal` resolves, fail both probes and then stop the server,
/// letting in-flight requests finish.
pub async fn drain_on<F>(signal: F, health_state: web::Data<HealthState>, handle: ServerHandle)
where
    F: Future<Output = ()>,
{
    signal.await;
    health_state.begin_draining();
    info!("shutdown requested, draining in-flight requests");
    handle.stop(true).await;
}
