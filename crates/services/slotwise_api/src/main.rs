// File: services/slotwise_api/src/main.rs
use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use slotwise_common::logging;
use slotwise_common::services::ServiceFactory;
use slotwise_config::load_config;
use slotwise_db::{
    BookingRepository, DbClient, InterviewerRepository, RosterRepository, SlotRepository,
    SqlBookingRepository, SqlInterviewerRepository, SqlRosterRepository, SqlSlotRepository,
};
use slotwise_scheduling::routes as scheduling_routes;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

mod service_factory;
use service_factory::SlotwiseServiceFactory;

#[axum::debug_handler]
async fn health_handler(State(db): State<DbClient>) -> Json<Value> {
    let database = if db.is_healthy().await { "up" } else { "down" };
    Json(json!({ "status": "ok", "database": database }))
}

/// Create the tables for every repository sharing the pool.
async fn init_schemas(db: &DbClient) -> Result<(), slotwise_db::DbError> {
    SqlSlotRepository::new(db.clone()).init_schema().await?;
    SqlBookingRepository::new(db.clone()).init_schema().await?;
    SqlRosterRepository::new(db.clone()).init_schema().await?;
    SqlInterviewerRepository::new(db.clone()).init_schema().await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    logging::init();

    let config = Arc::new(load_config().expect("Failed to load config"));

    let database_url = config
        .database
        .as_ref()
        .map(|db| db.url.clone())
        .unwrap_or_else(|| "sqlite:data/slotwise.db".to_string());
    let db = DbClient::from_url(&database_url)
        .await
        .expect("Failed to open database");
    init_schemas(&db)
        .await
        .expect("Failed to initialize database schema");

    let service_factory = SlotwiseServiceFactory::new(config.clone()).await;
    let notifier = service_factory.calendar_notifier();

    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to Slotwise API!" }))
        .route("/health", get(health_handler))
        .with_state(db.clone());

    let api_router = Router::new().nest(
        "/api",
        api_router.merge(scheduling_routes(config.clone(), db, notifier)),
    );

    #[allow(unused_mut)] // for the openapi feature it needs to be mutable
    let mut app = api_router.layer(TraceLayer::new_for_http());

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use slotwise_scheduling::doc::SchedulingApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Slotwise API",
                version = "0.1.0",
                description = "Slotwise interview scheduling API docs",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            tags( (name = "Slotwise", description = "Core service endpoints")),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(SchedulingApiDoc::openapi());
        info!("📖 Adding Swagger UI at /api/docs");

        let swagger_ui =
            SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc.clone());
        app = app.merge(swagger_ui);
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
