//! In-memory academic API for unit tests

use super::dto::{BulkAttendanceSave, BulkGradeSave, WorkingDaysUpdate};
use super::error::{ClientError, ClientResult};
use super::resources::Resource;
use super::AcademicApi;
use crate::grading::{GradeKey, Term};
use crate::normalize::{enrollment_student, ref_id};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeApi {
    records: HashMap<Resource, Vec<Value>>,
    grades: HashMap<Term, Vec<Value>>,
    attendance: HashMap<Term, Vec<Value>>,
    working_days: HashMap<Term, u32>,
    failing_terms: Vec<Term>,
    fail_batch: bool,
    offline: bool,
    pub saved_grades: Mutex<Vec<BulkGradeSave>>,
    pub saved_attendance: Mutex<Vec<BulkAttendanceSave>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, resource: Resource, record: Value) -> Self {
        self.records.entry(resource).or_default().push(record);
        self
    }

    pub fn with_grades(mut self, term: Term, records: Vec<Value>) -> Self {
        self.grades.insert(term, records);
        self
    }

    pub fn with_attendance(mut self, term: Term, records: Vec<Value>) -> Self {
        self.attendance.insert(term, records);
        self
    }

    pub fn with_working_days(mut self, term: Term, days: u32) -> Self {
        self.working_days.insert(term, days);
        self
    }

    /// Grade and attendance queries for `term` fail
    pub fn failing_term(mut self, term: Term) -> Self {
        self.failing_terms.push(term);
        self
    }

    pub fn failing_batch(mut self) -> Self {
        self.fail_batch = true;
        self
    }

    /// Every call fails as if the server were down
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    fn check(&self, term: Option<Term>) -> ClientResult<()> {
        if self.offline || term.map(|t| self.failing_terms.contains(&t)).unwrap_or(false) {
            return Err(ClientError::Unavailable);
        }
        Ok(())
    }

    fn not_found() -> ClientError {
        ClientError::Api {
            status: 404,
            message: "not found".to_string(),
        }
    }
}

#[async_trait]
impl AcademicApi for FakeApi {
    async fn list(&self, resource: Resource) -> ClientResult<Vec<Value>> {
        self.check(None)?;
        Ok(self.records.get(&resource).cloned().unwrap_or_default())
    }

    async fn get(&self, resource: Resource, id: &str) -> ClientResult<Value> {
        self.check(None)?;
        self.records
            .get(&resource)
            .and_then(|items| items.iter().find(|r| ref_id(r) == id))
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn create(&self, _resource: Resource, body: &Value) -> ClientResult<Value> {
        self.check(None)?;
        Ok(body.clone())
    }

    async fn update(&self, resource: Resource, id: &str, body: &Value) -> ClientResult<Value> {
        self.get(resource, id).await?;
        Ok(body.clone())
    }

    async fn delete(&self, resource: Resource, id: &str) -> ClientResult<()> {
        self.get(resource, id).await.map(|_| ())
    }

    async fn students_by_ids(&self, ids: &[String]) -> ClientResult<Vec<Value>> {
        self.check(None)?;
        if self.fail_batch {
            return Err(ClientError::Timeout);
        }
        Ok(self
            .records
            .get(&Resource::Students)
            .map(|items| {
                items
                    .iter()
                    .filter(|r| ids.contains(&ref_id(r)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn enrollments_for(&self, course_id: &str, _year_id: Option<&str>) -> ClientResult<Vec<Value>> {
        self.check(None)?;
        Ok(self
            .records
            .get(&Resource::Enrollments)
            .map(|items| {
                items
                    .iter()
                    .filter(|e| e.get("curso").map(ref_id).as_deref() == Some(course_id))
                    .filter(|e| enrollment_student(e).is_some())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn grades(&self, key: &GradeKey) -> ClientResult<Vec<Value>> {
        self.check(Some(key.trimestre))?;
        Ok(self.grades.get(&key.trimestre).cloned().unwrap_or_default())
    }

    async fn save_grades(&self, body: &BulkGradeSave) -> ClientResult<Value> {
        self.check(None)?;
        if let Ok(mut saved) = self.saved_grades.lock() {
            saved.push(body.clone());
        }
        Ok(serde_json::json!({"ok": true, "guardados": body.calificaciones.len()}))
    }

    async fn attendance(&self, key: &GradeKey) -> ClientResult<Vec<Value>> {
        self.check(Some(key.trimestre))?;
        Ok(self
            .attendance
            .get(&key.trimestre)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_attendance(&self, body: &BulkAttendanceSave) -> ClientResult<Value> {
        self.check(None)?;
        if let Ok(mut saved) = self.saved_attendance.lock() {
            saved.push(body.clone());
        }
        Ok(serde_json::json!({"ok": true}))
    }

    async fn working_days(&self, key: &GradeKey) -> ClientResult<Option<u32>> {
        self.check(Some(key.trimestre))?;
        Ok(self.working_days.get(&key.trimestre).copied())
    }

    async fn set_working_days(&self, _body: &WorkingDaysUpdate) -> ClientResult<()> {
        self.check(None)
    }
}
