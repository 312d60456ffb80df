//! Shared harness for integration tests. These tests need a reachable
//! PostgreSQL instance; when DATABASE_URL is unset they skip with a notice.
#![allow(dead_code)]

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::OnceLock;
use student_registry::{
    common_routes, ensure_schema, student_routes, AppState, Student, StudentService, StudentStore,
};
use tokio::net::TcpListener;

static DB_GUARD: OnceLock<tokio::sync::Mutex<()>> = OnceLock::new();

/// Serializes tests that share the students table.
pub async fn db_lock() -> tokio::sync::MutexGuard<'static, ()> {
    DB_GUARD
        .get_or_init(|| tokio::sync::Mutex::new(()))
        .lock()
        .await
}

/// Comparison helper: store reads carry assigned surrogate ids, the fixture
/// does not.
pub fn without_ids(students: Vec<Student>) -> Vec<Student> {
    students
        .into_iter()
        .map(|s| Student { id: None, ..s })
        .collect()
}

/// The records every test starts from.
pub fn fixture() -> Vec<Student> {
    vec![
        Student::new(12345, "John Smith", "Computer Science", 1),
        Student::new(32289, "Jane Doe", "Physics", 3),
        Student::new(98237, "Peter Parker", "Biology", 2),
    ]
}

async fn connect() -> Option<PgPool> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping");
        return None;
    };
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("failed to connect to test database");
    Some(pool)
}

/// Pool + schema + empty table + fixture rows.
pub async fn seeded_store() -> Option<(PgPool, StudentStore)> {
    let pool = connect().await?;
    ensure_schema(&pool).await.expect("schema setup failed");
    sqlx::query("DELETE FROM students")
        .execute(&pool)
        .await
        .expect("table reset failed");
    let store = StudentStore::new(pool.clone());
    for student in fixture() {
        store.save(student).await.expect("seed insert failed");
    }
    Some((pool, store))
}

/// Test server wrapper: the real router bound to an OS-assigned port.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    pub store: StudentStore,
}

impl TestApp {
    /// Spawn the service against DATABASE_URL with a fresh fixture.
    /// Returns None when no database is configured.
    pub async fn spawn() -> Option<TestApp> {
        let (pool, store) = seeded_store().await?;

        let service = StudentService::new(store.clone());
        let state = AppState {
            pool,
            service,
        };
        let app = axum::Router::new()
            .merge(common_routes(state.clone()))
            .merge(student_routes(state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind");
        let addr = listener.local_addr().expect("no local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server error");
        });

        Some(TestApp {
            addr,
            client: reqwest::Client::new(),
            store,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("request failed")
    }

    pub async fn post_json<T: serde::Serialize>(&self, path: &str, body: &T) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("request failed")
    }

    pub async fn put_json<T: serde::Serialize>(&self, path: &str, body: &T) -> reqwest::Response {
        self.client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("request failed")
    }

    pub async fn delete(&self, path: &str) -> reqwest::Response {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("request failed")
    }
}
