//! Staff Registry Backend
//!
//! A REST backend for departments, employees and the employee movement report,
//! with SQLite persistence.

mod api;
mod calendar;
mod config;
mod db;
mod errors;
mod hierarchy;
mod models;
mod reports;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, LogFormat};
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!("Starting Staff Registry Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    let state = AppState { repo };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Departments
        .route(
            "/departments",
            get(api::list_departments).post(api::create_department),
        )
        .route("/departments/hierarchy", get(api::department_hierarchy))
        .route(
            "/departments/{id}",
            get(api::get_department)
                .patch(api::update_department)
                .delete(api::delete_department),
        )
        .route(
            "/departments/{id}/liquidate",
            post(api::liquidate_department),
        )
        // Employees
        .route(
            "/employees",
            get(api::list_employees).post(api::create_employee),
        )
        .route(
            "/employees/{id}",
            get(api::get_employee)
                .patch(api::update_employee)
                .delete(api::delete_employee),
        )
        .route("/employees/{id}/hire", post(api::hire_employee))
        .route("/employees/{id}/transfer", post(api::transfer_employee))
        .route("/employees/{id}/dismiss", post(api::dismiss_employee))
        // Reports
        .route(
            "/reports/employee-movements",
            get(api::employee_movements),
        )
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
