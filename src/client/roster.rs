//! Course roster loading

use super::error::ClientResult;
use super::resources::Resource;
use super::AcademicApi;
use crate::grading::sort_roster;
use crate::normalize::{split_course_roster, split_enrollments, RosterEntry};

/// Load the roster of a course, sorted by display name.
///
/// The course detail is the primary source. When it carries no roster
/// field, the enrollments of the course are used instead. Bare ids are
/// resolved with one batch fetch; if that fetch fails the roster still loads
/// and those students show their raw id.
pub async fn load_roster(
    api: &dyn AcademicApi,
    course_id: &str,
    year_id: Option<&str>,
) -> ClientResult<Vec<RosterEntry>> {
    let course = api.get(Resource::Courses, course_id).await?;
    let mut split = split_course_roster(&course);

    if split.is_empty() {
        match api.enrollments_for(course_id, year_id).await {
            Ok(enrollments) => split = split_enrollments(&enrollments),
            Err(e) => {
                tracing::warn!(course_id, error = %e, "Failed to load enrollments for roster");
            }
        }
    }

    let fetched = if split.needs_fetch() {
        match api.students_by_ids(&split.pending_ids).await {
            Ok(students) => students,
            Err(e) => {
                tracing::warn!(
                    course_id,
                    pending = split.pending_ids.len(),
                    error = %e,
                    "Batch student fetch failed, showing raw ids"
                );
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    let mut roster = split.complete(&fetched);
    sort_roster(&mut roster);

    tracing::debug!(course_id, students = roster.len(), "Roster loaded");
    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::FakeApi;
    use serde_json::json;

    #[tokio::test]
    async fn test_roster_with_batch_fetch() {
        let api = FakeApi::new()
            .with_record(
                Resource::Courses,
                json!({"_id": "c1", "estudiantes": ["s2", {"_id": "s1", "nombre": "Ana"}, "s3"]}),
            )
            .with_record(Resource::Students, json!({"_id": "s2", "nombre": "Beto"}));

        let roster = load_roster(&api, "c1", None).await.unwrap();
        assert_eq!(
            roster,
            vec![
                RosterEntry::new("s1", "Ana"),
                RosterEntry::new("s2", "Beto"),
                RosterEntry::new("s3", "s3"),
            ]
        );
    }

    #[tokio::test]
    async fn test_roster_falls_back_to_enrollments() {
        let api = FakeApi::new()
            .with_record(Resource::Courses, json!({"_id": "c1"}))
            .with_record(
                Resource::Enrollments,
                json!({"_id": "e1", "curso": "c1", "estudiante": {"_id": "s9", "nombre": "Zoe"}}),
            );

        let roster = load_roster(&api, "c1", Some("a1")).await.unwrap();
        assert_eq!(roster, vec![RosterEntry::new("s9", "Zoe")]);
    }

    #[tokio::test]
    async fn test_roster_batch_failure_degrades() {
        let api = FakeApi::new()
            .with_record(Resource::Courses, json!({"_id": "c1", "alumnos": ["s1"]}))
            .failing_batch();

        let roster = load_roster(&api, "c1", None).await.unwrap();
        assert_eq!(roster, vec![RosterEntry::new("s1", "s1")]);
    }

    #[tokio::test]
    async fn test_roster_missing_course_is_error() {
        let api = FakeApi::new();
        assert!(load_roster(&api, "nope", None).await.is_err());
    }
}
