//! Student registry: a small REST service over a single PostgreSQL table.

pub mod error;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use error::AppError;
pub use model::Student;
pub use routes::{common_routes, student_routes};
pub use service::StudentService;
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_schema, seed_students, StudentStore};
