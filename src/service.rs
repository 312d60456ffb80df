//! Business rules between the HTTP layer and the store.

use crate::error::AppError;
use crate::model::Student;
use crate::store::StudentStore;

/// Stateless orchestration over [`StudentStore`]. Holds the store by value;
/// composed explicitly in `main`.
#[derive(Clone)]
pub struct StudentService {
    store: StudentStore,
}

impl StudentService {
    pub fn new(store: StudentStore) -> Self {
        StudentService { store }
    }

    pub async fn get_students(&self) -> Result<Vec<Student>, AppError> {
        self.store.find_all().await
    }

    pub async fn get_student_by_student_id(
        &self,
        student_id: i32,
    ) -> Result<Option<Student>, AppError> {
        self.store.find_by_student_id(student_id).await
    }

    /// No existence pre-check: a duplicate studentId surfaces as Conflict from
    /// the store's unique constraint.
    pub async fn add_student(&self, student: Student) -> Result<Student, AppError> {
        self.store.save(student).await
    }

    /// Overwrites name, major and year on the existing record. The business
    /// key and surrogate id never change, whatever the patch carries.
    pub async fn update_student(
        &self,
        student_id: i32,
        patch: Student,
    ) -> Result<Student, AppError> {
        let mut existing = self
            .store
            .find_by_student_id(student_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("student with id {} does not exist", student_id))
            })?;

        existing.name = patch.name;
        existing.major = patch.major;
        existing.year = patch.year;

        self.store.save(existing).await
    }

    /// Existence check and delete run in one transaction; an early return
    /// rolls back.
    pub async fn delete_student(&self, student_id: i32) -> Result<(), AppError> {
        let mut tx = self.store.begin().await?;
        let existing = StudentStore::find_by_student_id_on(&mut *tx, student_id).await?;
        if existing.is_none() {
            return Err(AppError::NotFound(format!(
                "student with id {} does not exist",
                student_id
            )));
        }
        StudentStore::delete_by_student_id_on(&mut *tx, student_id).await?;
        tx.commit().await?;
        Ok(())
    }
}
