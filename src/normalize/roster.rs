//! Roster extraction and deduplication
//!
//! "Students in a course" comes back from several unrelated endpoints as an
//! array mixing populated records, bare ids and enrollment wrappers. The
//! split here separates what can be shown right away from the ids that need
//! a follow-up batch fetch.

use super::payload::unwrap_record;
use super::reference::{normalize_ref, EntityRef};
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Course fields that hold a plain roster array
pub const ROSTER_FIELDS: [&str; 3] = ["estudiantes", "alumnos", "inscritos"];

/// Course field holding enrollment records (`[{estudiante: ...}]`)
pub const ENROLLMENT_FIELD: &str = "matriculas";

/// A student row ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub id: String,
    /// Display name, degraded to the raw id when unknown
    pub name: String,
}

impl RosterEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl From<EntityRef> for RosterEntry {
    fn from(r: EntityRef) -> Self {
        let name = r.display_name().to_string();
        Self { id: r.id, name }
    }
}

/// Result of splitting a mixed reference array
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterSplit {
    /// References that arrived populated, in first-seen order
    pub resolved: Vec<EntityRef>,
    /// Bare ids still needing a fetch, in first-seen order
    pub pending_ids: Vec<String>,
}

impl RosterSplit {
    /// Total distinct ids across both lists
    pub fn len(&self) -> usize {
        self.resolved.len() + self.pending_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty() && self.pending_ids.is_empty()
    }

    /// Whether a follow-up batch fetch is needed
    pub fn needs_fetch(&self) -> bool {
        !self.pending_ids.is_empty()
    }

    /// Merge the follow-up fetch into a flat roster.
    ///
    /// Pending ids found in `fetched` take the fetched name; ids the backend
    /// did not return degrade to showing the raw id.
    pub fn complete(self, fetched: &[Value]) -> Vec<RosterEntry> {
        let found: HashMap<String, EntityRef> = fetched
            .iter()
            .map(normalize_ref)
            .filter(EntityRef::is_resolved)
            .map(|r| (r.id.clone(), r))
            .collect();

        let mut roster: Vec<RosterEntry> =
            self.resolved.into_iter().map(RosterEntry::from).collect();

        for id in self.pending_ids {
            match found.get(&id) {
                Some(r) => roster.push(RosterEntry::from(r.clone())),
                None => {
                    tracing::debug!(student_id = %id, "Roster id not returned by batch fetch");
                    roster.push(RosterEntry::new(id.clone(), id));
                }
            }
        }

        roster
    }

    /// Flat roster without any follow-up fetch.
    pub fn into_roster(self) -> Vec<RosterEntry> {
        self.complete(&[])
    }
}

/// Split a mixed array into populated references and pending bare ids.
///
/// Each id appears exactly once across both lists. An id that arrives
/// populated anywhere in the array is never reported as pending. Values
/// without a resolvable id are dropped.
pub fn split_references<'a, I>(items: I) -> RosterSplit
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut resolved: Vec<EntityRef> = Vec::new();
    let mut bare: Vec<String> = Vec::new();
    let mut dropped = 0usize;

    for item in items {
        let r = normalize_ref(item);
        if !r.is_resolved() {
            dropped += 1;
            continue;
        }
        if carries_record(item) {
            resolved.push(r);
        } else {
            bare.push(r.id);
        }
    }

    let mut seen: HashSet<String> = HashSet::new();
    resolved.retain(|r| seen.insert(r.id.clone()));
    bare.retain(|id| seen.insert(id.clone()));

    if dropped > 0 {
        tracing::debug!(dropped, "Dropped references without a resolvable id");
    }

    RosterSplit {
        resolved,
        pending_ids: bare,
    }
}

/// Collect every roster candidate from a course detail payload.
///
/// Looks at `estudiantes`, `alumnos`, `inscritos` and `matriculas[].estudiante`;
/// all present fields are concatenated and left to [`split_references`] to dedup.
pub fn course_roster_values(course: &Value) -> Vec<&Value> {
    let course = unwrap_record(course);
    let mut values: Vec<&Value> = ROSTER_FIELDS
        .iter()
        .filter_map(|field| course.get(*field).and_then(Value::as_array))
        .flatten()
        .collect();

    if let Some(enrollments) = course.get(ENROLLMENT_FIELD).and_then(Value::as_array) {
        values.extend(enrollments.iter().filter_map(enrollment_student));
    }

    values
}

/// Student fields of an enrollment record
pub const ENROLLMENT_STUDENT_FIELDS: [&str; 3] = ["estudiante", "alumno", "estudianteId"];

/// The student reference inside an enrollment record.
///
/// Enrollments carry their own `_id`, so the record itself must not be
/// resolved as the student.
pub fn enrollment_student(enrollment: &Value) -> Option<&Value> {
    ENROLLMENT_STUDENT_FIELDS
        .iter()
        .filter_map(|field| enrollment.get(*field))
        .find(|value| !value.is_null())
}

/// Split a list of enrollment records into student references.
pub fn split_enrollments(enrollments: &[Value]) -> RosterSplit {
    split_references(enrollments.iter().filter_map(enrollment_student))
}

/// Split the roster of a course detail payload.
pub fn split_course_roster(course: &Value) -> RosterSplit {
    split_references(course_roster_values(course))
}

/// Whether the value (or the value it wraps) is a record rather than a bare id
fn carries_record(value: &Value) -> bool {
    match value {
        Value::Object(map) => {
            let r = normalize_ref(value);
            // A wrapper around a bare id still needs the fetch unless it carries a name.
            r.name.is_some()
                || super::reference::ID_FIELDS
                    .iter()
                    .any(|field| map.contains_key(*field))
                || super::reference::NESTED_FIELDS
                    .iter()
                    .any(|field| map.get(*field).map(Value::is_object).unwrap_or(false))
        }
        _ => false,
    }
}
