pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::{
    routing::{get, post, put},
    Router,
};
use secrecy::ExposeSecret;
use service_core::middleware::tracing::request_id_middleware;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use config::Config;
use services::{
    JwtService, LocalStorage, MongoDb, PaymentRepository, PluckerRepository, RecordRepository,
    ReportRepository, Storage, UserRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub db: MongoDb,
    pub config: Config,
    pub jwt: JwtService,
    pub storage: Arc<dyn Storage>,
    pub users: UserRepository,
    pub pluckers: PluckerRepository,
    pub records: RecordRepository,
    pub payments: PaymentRepository,
    pub reports: ReportRepository,
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
    db: MongoDb,
}

impl Application {
    pub async fn build(config: Config) -> anyhow::Result<Self> {
        let db = MongoDb::connect(
            config.database.url.expose_secret(),
            &config.database.db_name,
        )
        .await?;

        // Index creation needs a live server; run it off the startup path so
        // binding (and the health endpoint) never waits on server selection.
        let index_db = db.clone();
        tokio::spawn(async move {
            if let Err(e) = index_db.initialize_indexes().await {
                tracing::warn!("Failed to initialize database indexes: {}", e);
            }
        });

        let jwt = JwtService::new(&config.jwt);
        let storage: Arc<dyn Storage> =
            Arc::new(LocalStorage::new(&config.storage.upload_dir).await?);

        let state = AppState {
            db: db.clone(),
            config: config.clone(),
            jwt,
            storage,
            users: UserRepository::new(&db),
            pluckers: PluckerRepository::new(&db),
            records: RecordRepository::new(&db),
            payments: PaymentRepository::new(&db),
            reports: ReportRepository::new(&db),
        };

        // Everything past login requires a verified bearer token
        let protected = Router::new()
            .route("/auth/me", get(handlers::auth::me))
            .route("/auth/profile", put(handlers::auth::update_profile))
            .route(
                "/pluckers",
                get(handlers::pluckers::list_pluckers).post(handlers::pluckers::create_plucker),
            )
            .route("/pluckers/top", get(handlers::pluckers::top_pluckers))
            .route(
                "/pluckers/:id",
                get(handlers::pluckers::get_plucker)
                    .put(handlers::pluckers::update_plucker)
                    .delete(handlers::pluckers::delete_plucker),
            )
            .route(
                "/records",
                get(handlers::records::list_records).post(handlers::records::create_record),
            )
            .route(
                "/records/:id",
                get(handlers::records::get_record)
                    .put(handlers::records::update_record)
                    .delete(handlers::records::delete_record),
            )
            .route(
                "/payments",
                get(handlers::payments::list_payments).post(handlers::payments::create_payment),
            )
            .route("/payments/generate", post(handlers::payments::generate_payment))
            .route(
                "/payments/plucker/:id",
                get(handlers::payments::payments_by_plucker),
            )
            .route(
                "/payments/:id",
                get(handlers::payments::get_payment)
                    .put(handlers::payments::update_payment)
                    .delete(handlers::payments::delete_payment),
            )
            .route(
                "/payments/:id/complete",
                put(handlers::payments::complete_payment),
            )
            .route("/reports", get(handlers::reports::list_reports))
            .route(
                "/reports/dashboard-stats",
                get(handlers::reports::dashboard_stats),
            )
            .route(
                "/reports/pluckers",
                get(handlers::reports::generate_plucker_report),
            )
            .route(
                "/reports/:id/file",
                get(handlers::reports::download_report_file),
            )
            .route_layer(from_fn_with_state(
                state.clone(),
                middleware::auth_middleware,
            ));

        let api = Router::new()
            .route("/auth/register", post(handlers::auth::register))
            .route("/auth/login", post(handlers::auth::login))
            .merge(protected);

        let router = Router::new()
            .route("/health", get(handlers::health_check))
            .route("/ready", get(handlers::readiness_check))
            .route("/metrics", get(handlers::metrics))
            .nest("/api/v1", api)
            .nest_service(
                "/uploads",
                ServeDir::new(&config.storage.upload_dir),
            )
            .layer(CorsLayer::permissive())
            .layer(from_fn(request_id_middleware))
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or("-");

                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                        version = ?request.version(),
                    )
                }),
            )
            .with_state(state);

        // Port 0 binds a random free port, which the test harness relies on
        let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
        let listener = TcpListener::bind(addr).await?;
        let port = listener.local_addr()?.port();

        tracing::info!("Plantation service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
            db,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn db(&self) -> &MongoDb {
        &self.db
    }

    pub async fn run_until_stopped(self) -> anyhow::Result<()> {
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }
}
