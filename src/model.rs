//! The student record and request-body validation.

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// One row of the students table. The wire format is camelCase; `id` is the
/// surrogate key, assigned by the store on insert and ignored on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(default, skip_deserializing)]
    pub id: Option<i64>,
    pub student_id: i32,
    pub name: String,
    pub major: String,
    pub year: i32,
}

impl Student {
    pub fn new(
        student_id: i32,
        name: impl Into<String>,
        major: impl Into<String>,
        year: i32,
    ) -> Self {
        Student {
            id: None,
            student_id,
            name: name.into(),
            major: major.into(),
            year,
        }
    }

    /// Field-level checks on request bodies; the column constraints are the
    /// backstop for anything that gets past this.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name must not be empty".into()));
        }
        if self.major.trim().is_empty() {
            return Err(AppError::Validation("major must not be empty".into()));
        }
        Ok(())
    }
}
