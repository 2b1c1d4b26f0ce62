use {
    cardio_sentinel::{
        AppState,
        adapters::{
            rate_limit::run_sweeper,
            router::{ApiRoutes, Pipeline, build_app},
        },
        config::Config,
        domain::store::RecordStore,
        infra::{memory::MemoryRecordStore, postgres::PgRecordStore},
        services::supervisor::Supervisor,
    },
    std::{net::SocketAddr, process::ExitCode, sync::Arc},
};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let store: Arc<dyn RecordStore> = match &config.database_url {
        Some(url) => {
            let pg = match PgRecordStore::connect(url, config.max_connections).await {
                Ok(pg) => pg,
                Err(e) => {
                    tracing::error!(error = %e, "failed to connect to database");
                    return ExitCode::FAILURE;
                }
            };
            if let Err(e) = pg.migrate().await {
                tracing::error!(error = %e, "failed to run migrations");
                return ExitCode::FAILURE;
            }
            Arc::new(pg)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, records are kept in memory only");
            Arc::new(MemoryRecordStore::new())
        }
    };

    let supervisor = Supervisor::new();
    let pipeline = Pipeline::new(&config);
    supervisor.spawn(
        "rate-limit-sweeper",
        run_sweeper(pipeline.limiter.clone(), supervisor.subscribe()),
    );

    let app = build_app(AppState::new(store), ApiRoutes::default(), pipeline);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        environment = %config.environment,
        port = config.port,
        "server running in {} mode on port {}",
        config.environment,
        config.port
    );

    let shutdown = supervisor.clone();
    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move { shutdown.wait_for_shutdown().await })
    .await;

    if let Err(e) = served {
        supervisor.fault("http-server", e);
    }

    let exit = supervisor.finish().await;
    tracing::info!(?exit, "server stopped");
    ExitCode::from(exit.code())
}
