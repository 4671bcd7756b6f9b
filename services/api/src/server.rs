use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryDecisionNotifier, InMemoryMerchantRepository};
use crate::routes::with_onboarding_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use merchant_underwriting::config::AppConfig;
use merchant_underwriting::error::AppError;
use merchant_underwriting::onboarding::MerchantOnboardingService;
use merchant_underwriting::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let high_risk_industries = config.scoring.high_risk_industries.len();
    let service = Arc::new(MerchantOnboardingService::new(
        Arc::new(InMemoryMerchantRepository::default()),
        Arc::new(InMemoryDecisionNotifier::default()),
        config.scoring.clone(),
    ));

    let app = with_onboarding_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        high_risk_industries,
        "merchant underwriting service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
