//! Gradebook and attendance tables
//!
//! The roster decides which rows exist; records only supply values. Every
//! roster student gets exactly one row, with defaults when no record exists
//! yet, and rows come back sorted by display name.

use super::collate::compare_names;
use super::label::{qualitative, QualitativeLabel};
use super::numeric::{clamp_non_negative_int, coerce_grade, count_field, grade_field};
use crate::normalize::{ref_from_fields, RosterEntry};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Record fields that may carry the student reference
pub const STUDENT_KEY_FIELDS: [&str; 5] =
    ["estudianteId", "estudiante", "alumnoId", "alumno", "usuario"];

/// Record fields that may carry the term average
pub const GRADE_FIELDS: [&str; 4] = ["promedioTrimestral", "promedio", "nota", "calificacion"];

pub const JUSTIFIED_FIELDS: [&str; 1] = ["faltasJustificadas"];
pub const UNJUSTIFIED_FIELDS: [&str; 1] = ["faltasInjustificadas"];

/// One gradebook row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeRow {
    pub student_id: String,
    pub student_name: String,
    /// Term average, `None` when no grade has been recorded
    pub promedio: Option<f64>,
    pub faltas_justificadas: u32,
    pub faltas_injustificadas: u32,
    pub label: QualitativeLabel,
}

impl GradeRow {
    /// Empty row for a roster student without a record
    pub fn blank(student: &RosterEntry) -> Self {
        Self {
            student_id: student.id.clone(),
            student_name: student.name.clone(),
            promedio: None,
            faltas_justificadas: 0,
            faltas_injustificadas: 0,
            label: QualitativeLabel::NoRecord,
        }
    }

    /// Replace the average with an edited value, clamped.
    ///
    /// Non-numeric input clears the grade.
    pub fn set_promedio(&mut self, raw: &Value) {
        self.promedio = coerce_grade(raw);
        self.label = qualitative(self.promedio);
    }

    pub fn set_absences(&mut self, justificadas: &Value, injustificadas: &Value) {
        self.faltas_justificadas = clamp_non_negative_int(justificadas);
        self.faltas_injustificadas = clamp_non_negative_int(injustificadas);
    }
}

/// One attendance row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceRow {
    pub student_id: String,
    pub student_name: String,
    pub faltas_justificadas: u32,
    pub faltas_injustificadas: u32,
}

impl AttendanceRow {
    pub fn blank(student: &RosterEntry) -> Self {
        Self {
            student_id: student.id.clone(),
            student_name: student.name.clone(),
            faltas_justificadas: 0,
            faltas_injustificadas: 0,
        }
    }

    pub fn total_faltas(&self) -> u32 {
        self.faltas_justificadas
            .saturating_add(self.faltas_injustificadas)
    }

    pub fn set_absences(&mut self, justificadas: &Value, injustificadas: &Value) {
        self.faltas_justificadas = clamp_non_negative_int(justificadas);
        self.faltas_injustificadas = clamp_non_negative_int(injustificadas);
    }
}

/// Attendance rows plus the working-days scalar of their context
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceTable {
    /// Configured working days, `None` when not set for this context
    pub working_days: Option<u32>,
    pub rows: Vec<AttendanceRow>,
}

/// Index records by resolved student id; the first record per student wins.
pub fn index_records(records: &[Value]) -> HashMap<String, &Value> {
    let mut by_student: HashMap<String, &Value> = HashMap::new();
    let mut skipped = 0usize;

    for record in records {
        let student = ref_from_fields(record, &STUDENT_KEY_FIELDS);
        if !student.is_resolved() {
            skipped += 1;
            continue;
        }
        by_student.entry(student.id).or_insert(record);
    }

    if skipped > 0 {
        tracing::debug!(skipped, "Records without a student reference ignored");
    }

    by_student
}

/// Build one grade row per roster student.
pub fn build_grade_table(roster: &[RosterEntry], records: &[Value]) -> Vec<GradeRow> {
    let by_student = index_records(records);

    let mut rows: Vec<GradeRow> = roster
        .iter()
        .map(|student| {
            let mut row = GradeRow::blank(student);
            if let Some(record) = by_student.get(&student.id) {
                row.promedio = grade_field(record, &GRADE_FIELDS);
                row.faltas_justificadas = count_field(record, &JUSTIFIED_FIELDS);
                row.faltas_injustificadas = count_field(record, &UNJUSTIFIED_FIELDS);
                row.label = qualitative(row.promedio);
            }
            row
        })
        .collect();

    sort_rows(&mut rows, |r| (&r.student_name, &r.student_id));
    rows
}

/// Build one attendance row per roster student.
pub fn build_attendance_table(
    roster: &[RosterEntry],
    records: &[Value],
    working_days: Option<u32>,
) -> AttendanceTable {
    let by_student = index_records(records);

    let mut rows: Vec<AttendanceRow> = roster
        .iter()
        .map(|student| {
            let mut row = AttendanceRow::blank(student);
            if let Some(record) = by_student.get(&student.id) {
                row.faltas_justificadas = count_field(record, &JUSTIFIED_FIELDS);
                row.faltas_injustificadas = count_field(record, &UNJUSTIFIED_FIELDS);
            }
            row
        })
        .collect();

    sort_rows(&mut rows, |r| (&r.student_name, &r.student_id));
    AttendanceTable { working_days, rows }
}

/// Sort by display name, then id, so equal names keep a stable order.
pub fn sort_rows<T, F>(rows: &mut [T], key: F)
where
    F: Fn(&T) -> (&String, &String),
{
    rows.sort_by(|a, b| {
        let (name_a, id_a) = key(a);
        let (name_b, id_b) = key(b);
        compare_names(name_a, name_b).then_with(|| id_a.cmp(id_b))
    });
}

/// Sort a roster the same way the tables are sorted.
pub fn sort_roster(roster: &mut [RosterEntry]) {
    sort_rows(roster, |r| (&r.name, &r.id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn roster() -> Vec<RosterEntry> {
        vec![
            RosterEntry::new("s2", "Beto"),
            RosterEntry::new("s1", "Ana"),
            RosterEntry::new("s3", "Carla"),
        ]
    }

    #[test]
    fn test_documented_scenario() {
        let roster = vec![RosterEntry::new("s1", "Ana"), RosterEntry::new("s2", "Beto")];
        let records = vec![json!({"estudianteId": "s1", "promedioTrimestral": 8.5})];

        let rows = build_grade_table(&roster, &records);

        assert_eq!(rows.len(), 2);
        assert_eq!(
            (rows[0].student_id.as_str(), rows[0].student_name.as_str(), rows[0].promedio),
            ("s1", "Ana", Some(8.5))
        );
        assert_eq!(
            (rows[1].student_id.as_str(), rows[1].student_name.as_str(), rows[1].promedio),
            ("s2", "Beto", None)
        );
        assert_eq!(rows[0].label, QualitativeLabel::MuyBueno);
        assert_eq!(rows[1].label, QualitativeLabel::NoRecord);
    }

    #[test]
    fn test_row_count_equals_roster() {
        let records = vec![
            json!({"estudiante": {"_id": "s3"}, "promedio": "9", "faltasInjustificadas": 2}),
            json!({"estudianteId": "ghost", "promedio": 10}),
            json!({"promedio": 7}),
        ];

        let rows = build_grade_table(&roster(), &records);
        assert_eq!(rows.len(), 3);

        let names: Vec<_> = rows.iter().map(|r| r.student_name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Beto", "Carla"]);

        assert_eq!(rows[0].promedio, None);
        assert_eq!(rows[0].faltas_justificadas, 0);
        assert_eq!(rows[2].promedio, Some(9.0));
        assert_eq!(rows[2].faltas_injustificadas, 2);
    }

    #[test]
    fn test_values_are_clamped() {
        let records = vec![
            json!({"estudianteId": "s1", "promedioTrimestral": 14, "faltasJustificadas": -4}),
            json!({"estudianteId": "s2", "promedioTrimestral": "abc", "faltasJustificadas": "x"}),
        ];

        let rows = build_grade_table(&roster(), &records);
        assert_eq!(rows[0].promedio, Some(10.0));
        assert_eq!(rows[0].faltas_justificadas, 0);
        assert_eq!(rows[1].promedio, None);
        assert_eq!(rows[1].faltas_justificadas, 0);
    }

    #[test]
    fn test_first_record_wins() {
        let records = vec![
            json!({"estudianteId": "s1", "promedio": 6}),
            json!({"estudianteId": "s1", "promedio": 9}),
        ];
        let rows = build_grade_table(&roster(), &records);
        assert_eq!(rows[0].promedio, Some(6.0));
    }

    #[test]
    fn test_attendance_table_defaults() {
        let records = vec![json!({"alumno": "s2", "faltasJustificadas": 1, "faltasInjustificadas": "3"})];

        let table = build_attendance_table(&roster(), &records, Some(60));
        assert_eq!(table.working_days, Some(60));
        assert_eq!(table.rows.len(), 3);

        let beto = &table.rows[1];
        assert_eq!(beto.student_id, "s2");
        assert_eq!(beto.total_faltas(), 4);
        assert_eq!(table.rows[0].total_faltas(), 0);
    }

    #[test]
    fn test_empty_roster_yields_no_rows() {
        let records = vec![json!({"estudianteId": "s1", "promedio": 9})];
        assert!(build_grade_table(&[], &records).is_empty());
    }

    #[test]
    fn test_row_edits_clamp() {
        let mut row = GradeRow::blank(&RosterEntry::new("s1", "Ana"));
        row.set_promedio(&json!(-1));
        assert_eq!(row.promedio, Some(0.0));
        assert_eq!(row.label, QualitativeLabel::Insuficiente);

        row.set_promedio(&json!(""));
        assert_eq!(row.promedio, None);
        assert_eq!(row.label, QualitativeLabel::NoRecord);

        row.set_absences(&json!(-2), &json!("4"));
        assert_eq!((row.faltas_justificadas, row.faltas_injustificadas), (0, 4));
    }
}
