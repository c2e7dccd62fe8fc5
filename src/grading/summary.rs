//! Three-term summary
//!
//! Combines the per-term gradebook and attendance data of one subject into
//! a single row per student with the annual average.

use super::attendance::absence_rate;
use super::collate::compare_names;
use super::label::{qualitative, QualitativeLabel};
use super::numeric::round2;
use super::table::{build_attendance_table, build_grade_table};
use super::term::Term;
use crate::normalize::RosterEntry;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Raw data for one term, as fetched
#[derive(Debug, Clone, Default)]
pub struct TermData {
    pub grades: Vec<Value>,
    pub attendance: Vec<Value>,
    pub working_days: Option<u32>,
}

/// Per-student summary across the three terms
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub student_id: String,
    pub student_name: String,
    /// Term averages in term order
    pub promedios: [Option<f64>; 3],
    pub promedio_anual: Option<f64>,
    pub label: QualitativeLabel,
    /// Total absences per term
    pub faltas: [u32; 3],
    /// Absence percentage per term, `None` when working days are not configured
    pub ausentismo: [Option<f64>; 3],
}

/// Mean of the available term averages.
pub fn annual_average(averages: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = averages.iter().flatten().copied().collect();
    if present.is_empty() {
        return None;
    }
    Some(round2(present.iter().sum::<f64>() / present.len() as f64))
}

/// Build the summary rows; one per roster student, sorted by name.
pub fn build_summary(roster: &[RosterEntry], terms: &[(Term, TermData)]) -> Vec<SummaryRow> {
    let mut rows: HashMap<&str, SummaryRow> = roster
        .iter()
        .map(|s| {
            (
                s.id.as_str(),
                SummaryRow {
                    student_id: s.id.clone(),
                    student_name: s.name.clone(),
                    promedios: [None; 3],
                    promedio_anual: None,
                    label: QualitativeLabel::NoRecord,
                    faltas: [0; 3],
                    ausentismo: [None; 3],
                },
            )
        })
        .collect();

    for (term, data) in terms {
        let idx = term.index();

        for grade in build_grade_table(roster, &data.grades) {
            if let Some(row) = rows.get_mut(grade.student_id.as_str()) {
                row.promedios[idx] = grade.promedio;
            }
        }

        let attendance = build_attendance_table(roster, &data.attendance, data.working_days);
        for a in attendance.rows {
            if let Some(row) = rows.get_mut(a.student_id.as_str()) {
                row.faltas[idx] = a.total_faltas();
                row.ausentismo[idx] = absence_rate(
                    a.faltas_justificadas,
                    a.faltas_injustificadas,
                    attendance.working_days,
                );
            }
        }
    }

    let mut rows: Vec<SummaryRow> = rows
        .into_values()
        .map(|mut row| {
            row.promedio_anual = annual_average(&row.promedios);
            row.label = qualitative(row.promedio_anual);
            row
        })
        .collect();

    rows.sort_by(|a, b| {
        compare_names(&a.student_name, &b.student_name).then_with(|| a.student_id.cmp(&b.student_id))
    });
    rows
}
