//! Grading
//!
//! Pure transforms from fetched records to display rows:
//!
//! - **term**: terms and the `{cursoId, anioLectivoId, materiaId, trimestre}` key
//! - **numeric**: coercion and clamping of grades and counts
//! - **label**: qualitative label for an average
//! - **table**: roster-driven gradebook and attendance tables
//! - **attendance**: working days and the two attendance-rate formulas
//! - **summary**: three-term view with the annual average
//!
//! # Example
//!
//! ```rust
//! use aula::grading::build_grade_table;
//! use aula::normalize::RosterEntry;
//! use serde_json::json;
//!
//! let roster = vec![RosterEntry::new("s1", "Ana"), RosterEntry::new("s2", "Beto")];
//! let records = vec![json!({"estudianteId": "s1", "promedioTrimestral": 8.5})];
//!
//! let rows = build_grade_table(&roster, &records);
//! assert_eq!(rows.len(), 2);
//! assert_eq!(rows[0].promedio, Some(8.5));
//! assert_eq!(rows[1].promedio, None);
//! ```

pub mod attendance;
pub mod collate;
pub mod label;
pub mod numeric;
pub mod summary;
pub mod table;
pub mod term;

pub use attendance::{absence_rate, attended_rate, parse_working_days};
pub use collate::compare_names;
pub use label::{qualitative, QualitativeLabel};
pub use numeric::{clamp_grade, clamp_non_negative_int, coerce_f64, coerce_grade};
pub use summary::{annual_average, build_summary, SummaryRow, TermData};
pub use table::{
    build_attendance_table, build_grade_table, sort_roster, AttendanceRow, AttendanceTable,
    GradeRow,
};
pub use term::{GradeKey, Term};
