//! Student table access, schema setup, and startup seeding.

use crate::error::AppError;
use crate::model::Student;
use sqlx::{ConnectOptions, PgConnection, PgPool, Postgres, Transaction};
use std::str::FromStr;

const SELECT_COLUMNS: &str = r#"id, student_id, name, major, "year""#;

/// Durable CRUD against the students table.
#[derive(Clone)]
pub struct StudentStore {
    pool: PgPool,
}

impl StudentStore {
    pub fn new(pool: PgPool) -> Self {
        StudentStore { pool }
    }

    /// All records in insertion order.
    pub async fn find_all(&self) -> Result<Vec<Student>, AppError> {
        let sql = format!("SELECT {} FROM students ORDER BY id", SELECT_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, Student>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn find_by_student_id(&self, student_id: i32) -> Result<Option<Student>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Self::find_by_student_id_on(&mut conn, student_id).await
    }

    /// Lookup against an explicit connection, for callers holding a transaction.
    pub async fn find_by_student_id_on(
        conn: &mut PgConnection,
        student_id: i32,
    ) -> Result<Option<Student>, AppError> {
        let sql = format!(
            "SELECT {} FROM students WHERE student_id = $1",
            SELECT_COLUMNS
        );
        tracing::debug!(sql = %sql, student_id, "query");
        let row = sqlx::query_as::<_, Student>(&sql)
            .bind(student_id)
            .fetch_optional(conn)
            .await?;
        Ok(row)
    }

    /// Insert when `id` is unset, otherwise overwrite the existing row by `id`.
    /// Returns the persisted record with `id` populated.
    pub async fn save(&self, student: Student) -> Result<Student, AppError> {
        match student.id {
            None => self.insert(student).await,
            Some(id) => self.overwrite(id, student).await,
        }
    }

    async fn insert(&self, student: Student) -> Result<Student, AppError> {
        let sql = format!(
            r#"INSERT INTO students (student_id, name, major, "year") VALUES ($1, $2, $3, $4) RETURNING {}"#,
            SELECT_COLUMNS
        );
        tracing::debug!(sql = %sql, student_id = student.student_id, "query");
        let row = sqlx::query_as::<_, Student>(&sql)
            .bind(student.student_id)
            .bind(&student.name)
            .bind(&student.major)
            .bind(student.year)
            .fetch_one(&self.pool)
            .await;
        match row {
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(AppError::Conflict(
                format!("student with id {} already exists", student.student_id),
            )),
            other => Ok(other?),
        }
    }

    async fn overwrite(&self, id: i64, student: Student) -> Result<Student, AppError> {
        let sql = format!(
            r#"UPDATE students SET student_id = $2, name = $3, major = $4, "year" = $5 WHERE id = $1 RETURNING {}"#,
            SELECT_COLUMNS
        );
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Student>(&sql)
            .bind(id)
            .bind(student.student_id)
            .bind(&student.name)
            .bind(&student.major)
            .bind(student.year)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    /// Removes the matching row; returns rows affected (0 when absent).
    pub async fn delete_by_student_id(&self, student_id: i32) -> Result<u64, AppError> {
        let mut conn = self.pool.acquire().await?;
        Self::delete_by_student_id_on(&mut conn, student_id).await
    }

    /// Delete against an explicit connection, for callers holding a transaction.
    pub async fn delete_by_student_id_on(
        conn: &mut PgConnection,
        student_id: i32,
    ) -> Result<u64, AppError> {
        let sql = "DELETE FROM students WHERE student_id = $1";
        tracing::debug!(sql = %sql, student_id, "query");
        let res = sqlx::query(sql).bind(student_id).execute(conn).await?;
        Ok(res.rows_affected())
    }

    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, AppError> {
        Ok(self.pool.begin().await?)
    }
}

/// Create the students table if missing. Idempotent; run once at startup.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), AppError> {
    let ddl = r#"
        CREATE TABLE IF NOT EXISTS students (
            id BIGSERIAL PRIMARY KEY,
            student_id INTEGER NOT NULL UNIQUE,
            name TEXT NOT NULL,
            major TEXT NOT NULL,
            "year" INTEGER NOT NULL
        )
        "#;
    sqlx::query(ddl).execute(pool).await?;
    Ok(())
}

/// Optional bootstrap fixture: inserts three well-known records, but only when
/// the table is empty so restarts do not trip the unique constraint.
pub async fn seed_students(store: &StudentStore) -> Result<(), AppError> {
    if !store.find_all().await?.is_empty() {
        return Ok(());
    }
    for student in [
        Student::new(12345, "Emily Blunt", "Art", 4),
        Student::new(43632, "Rebecca Ferguson", "Physics", 3),
        Student::new(23095, "Jennifer Lawrence", "Biology", 2),
    ] {
        store.save(student).await?;
    }
    tracing::info!("seeded students table with 3 records");
    Ok(())
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: PgConnection = opts.connect().await.map_err(AppError::Db)?;
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await
            .map_err(AppError::Db)?;
    if !exists.0 {
        let quoted = quote_ident(&db_name);
        sqlx::query(&format!("CREATE DATABASE {}", quoted))
            .execute(&mut conn)
            .await
            .map_err(AppError::Db)?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::BadRequest("DATABASE_URL: no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres", base);
    Ok((admin_url, db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}
