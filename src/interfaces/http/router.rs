//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::UserService;
use crate::interfaces::http::common::ErrorResponse;
use crate::interfaces::http::modules::{
    health::{self, HealthState},
    metrics::{self as http_metrics, http_metrics_middleware, MetricsState},
    request_id::request_id_middleware,
    users::{self, UserHandlerState},
};

/// State shared by every route. Each handler extracts its own slice via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub db: Option<DatabaseConnection>,
    pub metrics: PrometheusHandle,
    pub started_at: Arc<Instant>,
}

impl AppState {
    pub fn new(
        user_service: Arc<UserService>,
        db: Option<DatabaseConnection>,
        metrics: PrometheusHandle,
    ) -> Self {
        Self {
            user_service,
            db,
            metrics,
            started_at: Arc::new(Instant::now()),
        }
    }
}

impl FromRef<AppState> for UserHandlerState {
    fn from_ref(s: &AppState) -> Self {
        UserHandlerState {
            user_service: Arc::clone(&s.user_service),
        }
    }
}

impl FromRef<AppState> for HealthState {
    fn from_ref(s: &AppState) -> Self {
        HealthState {
            db: s.db.clone(),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

impl FromRef<AppState> for MetricsState {
    fn from_ref(s: &AppState) -> Self {
        MetricsState {
            handle: s.metrics.clone(),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        users::list_users,
        users::get_user,
        users::create_user,
        users::upsert_user,
        users::delete_user,
    ),
    components(
        schemas(
            ErrorResponse,
            health::HealthResponse,
            health::ComponentHealth,
            users::UserDto,
            users::UserDetailsDto,
            users::CreateUserRequest,
            users::UpsertUserRequest,
        )
    ),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Users", description = "User records: list, fetch, create, upsert, delete"),
    ),
    info(
        title = "Users Service API",
        version = "1.0.0",
        description = "REST API for managing user records",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        // Users
        .route(users::USERS_PATH, get(users::list_users).post(users::create_user))
        .route(
            "/api/users/",
            get(users::missing_user_id)
                .post(users::create_user)
                .put(users::missing_user_id)
                .delete(users::missing_user_id),
        )
        .route(
            "/api/users/{id}",
            get(users::get_user)
                .put(users::upsert_user)
                .delete(users::delete_user),
        )
        // Health
        .route("/health", get(health::health_check))
        // Prometheus
        .route("/metrics", get(http_metrics::prometheus_metrics))
        // Runs after routing so the matched template is available
        .route_layer(middleware::from_fn(http_metrics_middleware))
        .with_state(state)
        // Swagger UI
        .merge(swagger_routes)
        // Middleware
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
