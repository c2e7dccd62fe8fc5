//! Academic API Client
//!
//! Pass-through wrappers over the school-management REST API.
//!
//! ## Architecture
//!
//! - **AcademicApi**: the seam every screen talks to
//! - **AcademicClient**: reqwest implementation of that seam
//! - **dto**: bulk-save bodies, clamped on construction
//! - **roster**: course roster loading with the follow-up batch fetch
//!
//! Response shapes are owned by the backend; every list goes through
//! [`crate::normalize::extract_list`] and every relation through
//! [`crate::normalize::normalize_ref`].

mod dto;
mod error;
#[cfg(test)]
pub(crate) mod fake;
mod http;
mod resources;
mod roster;

pub use dto::{
    AttendanceEntry, BulkAttendanceSave, BulkGradeSave, GradeEntry, WorkingDaysUpdate,
};
pub use error::{ClientError, ClientResult};
pub use http::{AcademicClient, ClientConfig};
pub use resources::{
    Resource, ATTENDANCE_BULK_PATH, ATTENDANCE_PATH, GRADES_BULK_PATH, GRADES_PATH,
    WORKING_DAYS_PATH,
};
pub use roster::load_roster;

use crate::grading::GradeKey;
use async_trait::async_trait;
use serde_json::Value;

/// Operations the academic backend offers
#[async_trait]
pub trait AcademicApi: Send + Sync {
    /// List every record of a resource
    async fn list(&self, resource: Resource) -> ClientResult<Vec<Value>>;

    /// Fetch one record
    async fn get(&self, resource: Resource, id: &str) -> ClientResult<Value>;

    /// Create a record; returns what the backend stored
    async fn create(&self, resource: Resource, body: &Value) -> ClientResult<Value>;

    /// Replace a record; returns what the backend stored
    async fn update(&self, resource: Resource, id: &str, body: &Value) -> ClientResult<Value>;

    async fn delete(&self, resource: Resource, id: &str) -> ClientResult<()>;

    /// Batch fetch of students by id
    async fn students_by_ids(&self, ids: &[String]) -> ClientResult<Vec<Value>>;

    /// Enrollment records of a course, optionally limited to one academic year
    async fn enrollments_for(&self, course_id: &str, year_id: Option<&str>) -> ClientResult<Vec<Value>>;

    /// Grade records for a course/year/subject/term
    async fn grades(&self, key: &GradeKey) -> ClientResult<Vec<Value>>;

    async fn save_grades(&self, body: &BulkGradeSave) -> ClientResult<Value>;

    /// Absence records for a course/year/subject/term
    async fn attendance(&self, key: &GradeKey) -> ClientResult<Vec<Value>>;

    async fn save_attendance(&self, body: &BulkAttendanceSave) -> ClientResult<Value>;

    /// Configured working days, `None` when not set
    async fn working_days(&self, key: &GradeKey) -> ClientResult<Option<u32>>;

    async fn set_working_days(&self, body: &WorkingDaysUpdate) -> ClientResult<()>;
}
