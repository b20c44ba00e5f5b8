use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryAssignmentRepository, InMemoryRosterStore};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use garment_coop::config::AppConfig;
use garment_coop::error::AppError;
use garment_coop::telemetry;
use garment_coop::workflows::allocation::{AllocationService, ScoringPolicy};
use garment_coop::workflows::assignments::AssignmentService;
use garment_coop::workflows::catalog::CsvCatalogSource;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

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
        catalog_path: config.allocation.catalog_path.clone(),
    };

    if !config.allocation.catalog_path.is_file() {
        warn!(
            path = %config.allocation.catalog_path.display(),
            "skill catalog not found; recommendations will report data_unavailable"
        );
    }

    let roster = Arc::new(InMemoryRosterStore::load(
        config.allocation.status_path.as_deref(),
    )?);
    let catalog = Arc::new(CsvCatalogSource::new(config.allocation.catalog_path.clone()));
    let allocation_service = Arc::new(
        AllocationService::new(catalog, roster.clone(), ScoringPolicy::default())
            .with_per_person_cap(config.allocation.per_person_cap),
    );
    let assignment_service = Arc::new(AssignmentService::new(
        Arc::new(InMemoryAssignmentRepository::default()),
        roster,
    ));

    let app = with_service_routes(allocation_service, assignment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        per_person_cap = config.allocation.per_person_cap.get(),
        "garment cooperative allocator ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
