//! Request bodies for bulk saves
//!
//! Every numeric value is clamped while the body is built, so nothing out of
//! range ever reaches the backend.

use crate::grading::numeric::{clamp_non_negative_int, coerce_grade};
use crate::grading::{AttendanceRow, GradeKey, GradeRow};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One student's grade in a bulk save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeEntry {
    pub estudiante_id: String,
    pub promedio_trimestral: Option<f64>,
    #[serde(default)]
    pub faltas_justificadas: u32,
    #[serde(default)]
    pub faltas_injustificadas: u32,
}

impl GradeEntry {
    /// Build from unvalidated input (CSV cells, edited JSON).
    pub fn from_raw(
        estudiante_id: impl Into<String>,
        promedio: &Value,
        justificadas: &Value,
        injustificadas: &Value,
    ) -> Self {
        Self {
            estudiante_id: estudiante_id.into(),
            promedio_trimestral: coerce_grade(promedio),
            faltas_justificadas: clamp_non_negative_int(justificadas),
            faltas_injustificadas: clamp_non_negative_int(injustificadas),
        }
    }
}

impl From<&GradeRow> for GradeEntry {
    fn from(row: &GradeRow) -> Self {
        Self {
            estudiante_id: row.student_id.clone(),
            promedio_trimestral: row.promedio,
            faltas_justificadas: row.faltas_justificadas,
            faltas_injustificadas: row.faltas_injustificadas,
        }
    }
}

/// Body of `POST /calificaciones/bulk`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkGradeSave {
    #[serde(flatten)]
    pub key: GradeKey,
    pub calificaciones: Vec<GradeEntry>,
}

impl BulkGradeSave {
    pub fn from_rows(key: GradeKey, rows: &[GradeRow]) -> Self {
        Self {
            key,
            calificaciones: rows.iter().map(GradeEntry::from).collect(),
        }
    }
}

/// One student's absences in a bulk save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    pub estudiante_id: String,
    pub faltas_justificadas: u32,
    pub faltas_injustificadas: u32,
}

impl AttendanceEntry {
    pub fn from_raw(estudiante_id: impl Into<String>, justificadas: &Value, injustificadas: &Value) -> Self {
        Self {
            estudiante_id: estudiante_id.into(),
            faltas_justificadas: clamp_non_negative_int(justificadas),
            faltas_injustificadas: clamp_non_negative_int(injustificadas),
        }
    }
}

impl From<&AttendanceRow> for AttendanceEntry {
    fn from(row: &AttendanceRow) -> Self {
        Self {
            estudiante_id: row.student_id.clone(),
            faltas_justificadas: row.faltas_justificadas,
            faltas_injustificadas: row.faltas_injustificadas,
        }
    }
}

/// Body of `POST /asistencias/bulk`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkAttendanceSave {
    #[serde(flatten)]
    pub key: GradeKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dias_laborables: Option<u32>,
    pub registros: Vec<AttendanceEntry>,
}

impl BulkAttendanceSave {
    pub fn from_rows(key: GradeKey, working_days: Option<u32>, rows: &[AttendanceRow]) -> Self {
        Self {
            key,
            dias_laborables: working_days,
            registros: rows.iter().map(AttendanceEntry::from).collect(),
        }
    }
}

/// Body of `PUT /asistencias/dias-laborables`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingDaysUpdate {
    #[serde(flatten)]
    pub key: GradeKey,
    pub dias_laborables: u32,
}
