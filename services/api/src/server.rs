use crate::cli::ServeArgs;
use crate::infra::{AppState, Stores};
use crate::routes::with_service_routes;
use crate::seed::seed_demo_data;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use nom035::config::AppConfig;
use nom035::error::AppError;
use nom035::identity::{spawn_sweeper, Authenticator, InMemoryTokenDenylist, TokenCodec};
use nom035::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let stores = Stores::default();
    if config.seed_demo_data {
        seed_demo_data(&stores)?;
    }

    let denylist = Arc::new(InMemoryTokenDenylist::default());
    let _sweeper = spawn_sweeper(denylist.clone(), config.auth.denylist_sweep_interval);
    let authenticator = Arc::new(Authenticator::new(
        TokenCodec::new(&config.auth.jwt_secret, config.auth.token_ttl),
        denylist,
    ));

    let app = with_service_routes(&stores, authenticator, config.scoring)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        medium_from = config.scoring.medium_from(),
        high_from = config.scoring.high_from(),
        "NOM-035 questionnaire service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
