use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryAuditStore};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use backyard_bud::assessment::AssessmentService;
use backyard_bud::audit::{AuditStore, FileAuditStore};
use backyard_bud::config::AppConfig;
use backyard_bud::error::AppError;
use backyard_bud::property::PropertyDirectory;
use backyard_bud::rules::RuleCatalog;
use backyard_bud::telemetry;
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
    if let Some(rules) = args.rules.take() {
        config.data.rules_path = rules;
    }

    telemetry::init(&config.telemetry)?;

    // Load failures are logged by the catalog; the service still starts without citations.
    let (catalog, _load_error) = RuleCatalog::open(&config.data.rules_path);
    let catalog = Arc::new(catalog);

    let directory = match PropertyDirectory::from_path(&config.data.properties_path) {
        Ok(directory) => directory,
        Err(err) => {
            warn!(
                path = %config.data.properties_path.display(),
                error = %err,
                "property table unavailable; property search will return no results"
            );
            PropertyDirectory::default()
        }
    };
    let directory = Arc::new(directory);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        catalog: catalog.clone(),
    };

    let app = if args.ephemeral_checkpoints {
        info!("checkpoints kept in memory only");
        build_router(catalog, Arc::new(InMemoryAuditStore::default()), directory)
    } else {
        let store = FileAuditStore::new(config.data.checkpoint_dir.clone());
        info!(directory = %store.directory().display(), "checkpoints written to disk");
        build_router(catalog, Arc::new(store), directory)
    };
    let app = app.layer(Extension(app_state)).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "exempt development assessor ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router<S>(
    catalog: Arc<RuleCatalog>,
    audit: Arc<S>,
    directory: Arc<PropertyDirectory>,
) -> axum::Router
where
    S: AuditStore + 'static,
{
    let service = Arc::new(AssessmentService::new(catalog, audit.clone()));
    with_service_routes(service, audit, directory)
}
