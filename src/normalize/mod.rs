//! Payload Normalization
//!
//! Defensive adaptation of academic API responses into flat, typed values.
//!
//! - **reference**: resolve a relation (bare id, populated record, or nested
//!   wrapper) into a canonical `{id, name?}` pair
//! - **roster**: split mixed reference arrays into populated entries and ids
//!   needing a follow-up fetch, and pull rosters out of course payloads
//! - **payload**: unwrap list and record envelopes
//! - **year**: pick the academic year in effect on a given date
//!
//! Nothing in here returns an error. Malformed data degrades: an unresolvable
//! reference yields an empty id, a missing name shows the raw id, and records
//! without an id are dropped.

mod payload;
mod reference;
mod roster;
mod year;

pub use payload::{extract_list, unwrap_record, LIST_ENVELOPES, RECORD_ENVELOPES};
pub use reference::{
    normalize_ref, ref_from_fields, ref_id, EntityRef, RefShape, ID_FIELDS, NAME_FIELDS,
    NESTED_FIELDS,
};
pub use roster::{
    course_roster_values, enrollment_student, split_course_roster, split_enrollments,
    split_references, RosterEntry, RosterSplit, ENROLLMENT_FIELD, ENROLLMENT_STUDENT_FIELDS,
    ROSTER_FIELDS,
};
pub use year::{current_year, parse_date};
