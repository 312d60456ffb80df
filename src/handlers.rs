//! Student CRUD handlers: translate requests into service calls and results
//! into status codes.

use crate::error::AppError;
use crate::model::Student;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

/// Parse a request body into a Student. Missing or ill-typed fields map to
/// 400; a client-supplied surrogate id is dropped during deserialization.
fn parse_body(body: Value) -> Result<Student, AppError> {
    if !body.is_object() {
        return Err(AppError::BadRequest("body must be a JSON object".into()));
    }
    let student: Student =
        serde_json::from_value(body).map_err(|e| AppError::Validation(e.to_string()))?;
    student.validate()?;
    Ok(student)
}

pub async fn list_students(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let students = state.service.get_students().await?;
    Ok((StatusCode::OK, Json(students)))
}

pub async fn get_student(
    State(state): State<AppState>,
    Path(student_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let student = state
        .service
        .get_student_by_student_id(student_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("student with id {} does not exist", student_id))
        })?;
    Ok((StatusCode::OK, Json(student)))
}

pub async fn create_student(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let student = parse_body(body)?;
    let created = state.service.add_student(student).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_student(
    State(state): State<AppState>,
    Path(student_id): Path<i32>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let patch = parse_body(body)?;
    let updated = state.service.update_student(student_id, patch).await?;
    Ok((StatusCode::OK, Json(updated)))
}

pub async fn delete_student(
    State(state): State<AppState>,
    Path(student_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    state.service.delete_student(student_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
