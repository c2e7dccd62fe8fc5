//! Attendance rates
//!
//! Two screens compute attendance differently and the two formulas are kept
//! apart on purpose:
//!
//! - the attendance sheet reports days attended: `(laborables - injustificadas) / laborables`
//! - the term summary reports absence: `(justificadas + injustificadas) / laborables`

use super::numeric::{clamp_non_negative_int, round2};
use super::table::AttendanceRow;
use serde_json::Value;

/// Fields that may carry the working-days scalar
pub const WORKING_DAYS_FIELDS: [&str; 2] = ["diasLaborables", "laborables"];

/// Read a working-days response: a bare number or `{diasLaborables: n}`,
/// either one optionally inside a `data` envelope.
///
/// Zero, missing, or non-numeric values mean "not configured".
pub fn parse_working_days(value: &Value) -> Option<u32> {
    let value = crate::normalize::unwrap_record(value);
    let raw = match value {
        Value::Object(map) => WORKING_DAYS_FIELDS
            .iter()
            .chain(std::iter::once(&"data"))
            .find_map(|f| map.get(*f))?,
        other => other,
    };
    match clamp_non_negative_int(raw) {
        0 => None,
        days => Some(days),
    }
}

/// Days attended, as a percentage of working days.
///
/// Only unjustified absences count against attendance here.
pub fn attended_rate(row: &AttendanceRow, working_days: Option<u32>) -> Option<f64> {
    let days = working_days.filter(|d| *d > 0)? as f64;
    let attended = (days - row.faltas_injustificadas as f64).max(0.0);
    Some(round2(attended / days * 100.0))
}

/// Absences of any kind, as a percentage of working days.
pub fn absence_rate(justificadas: u32, injustificadas: u32, working_days: Option<u32>) -> Option<f64> {
    let days = working_days.filter(|d| *d > 0)? as f64;
    let total = justificadas as f64 + injustificadas as f64;
    Some(round2((total / days * 100.0).min(100.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(j: u32, i: u32) -> AttendanceRow {
        AttendanceRow {
            student_id: "s1".to_string(),
            student_name: "Ana".to_string(),
            faltas_justificadas: j,
            faltas_injustificadas: i,
        }
    }

    #[test]
    fn test_parse_working_days() {
        assert_eq!(parse_working_days(&json!(60)), Some(60));
        assert_eq!(parse_working_days(&json!({"diasLaborables": "45"})), Some(45));
        assert_eq!(parse_working_days(&json!({"data": {"diasLaborables": 50}})), Some(50));
        assert_eq!(parse_working_days(&json!({"data": 50})), Some(50));
        assert_eq!(parse_working_days(&json!({"data": "48"})), Some(48));
        assert_eq!(parse_working_days(&json!({"data": null})), None);
        assert_eq!(parse_working_days(&json!({"diasLaborables": 0})), None);
        assert_eq!(parse_working_days(&json!({})), None);
        assert_eq!(parse_working_days(&json!(null)), None);
    }

    #[test]
    fn test_attended_rate_ignores_justified() {
        assert_eq!(attended_rate(&row(5, 3), Some(60)), Some(95.0));
        assert_eq!(attended_rate(&row(0, 80), Some(60)), Some(0.0));
        assert_eq!(attended_rate(&row(0, 0), None), None);
        assert_eq!(attended_rate(&row(0, 0), Some(0)), None);
    }

    #[test]
    fn test_absence_rate_counts_all() {
        assert_eq!(absence_rate(5, 3, Some(80)), Some(10.0));
        assert_eq!(absence_rate(1, 0, Some(3)), Some(33.33));
        assert_eq!(absence_rate(90, 0, Some(60)), Some(100.0));
        assert_eq!(absence_rate(1, 1, None), None);
    }
}
