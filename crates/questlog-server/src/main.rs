//! Questlog HTTP server.
//!
//! Thin JSON surface over `questlog-core`: task CRUD plus the rewards view.
//! Identity arrives as an opaque bearer token issued elsewhere; the server
//! only correlates it with store accesses.

mod routes;

use std::sync::{Arc, Mutex};

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use questlog_core::{Config, Database, QuestService};

pub type SharedService = Arc<Mutex<QuestService<Database>>>;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = serve().await {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }
}

async fn serve() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = match &config.database_path {
        Some(path) => Database::open_at(path)?,
        None => Database::open()?,
    };
    let service: SharedService = Arc::new(Mutex::new(QuestService::new(db)));

    let api = Router::new()
        .route("/tasks", get(routes::list_tasks).post(routes::create_task))
        .route(
            "/tasks/:id",
            get(routes::list_tasks_by_date)
                .put(routes::update_task)
                .delete(routes::delete_task),
        )
        .route("/rewards", get(routes::rewards));

    let app = Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .with_state(service);

    let addr = &config.server.listen_addr;
    tracing::info!(%addr, "questlog server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
