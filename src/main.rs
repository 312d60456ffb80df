//! Service binary: env config, database bootstrap, seeding, then serve.

use axum::Router;
use student_registry::{
    common_routes, ensure_database_exists, ensure_schema, seed_students, student_routes, AppState,
    StudentService, StudentStore,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("student_registry=info")),
        )
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/school".into());
    ensure_database_exists(&database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    ensure_schema(&pool).await?;
    let store = StudentStore::new(pool.clone());
    seed_students(&store).await?;
    let service = StudentService::new(store);
    let state = AppState { pool, service };

    let app = Router::new()
        .merge(common_routes(state.clone()))
        .merge(student_routes(state))
        .layer(TraceLayer::new_for_http());

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
