//! Shared application state for all routes.

use crate::service::StudentService;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    /// Kept alongside the service for the readiness probe.
    pub pool: PgPool,
    pub service: StudentService,
}
