//! Numeric coercion and clamping
//!
//! Values arrive as JSON numbers, numeric strings, or junk. Out-of-range
//! input is clamped locally before anything is sent to the backend; it is
//! never rejected.

use serde_json::Value;

/// Lowest grade on the 0-10 scale
pub const GRADE_MIN: f64 = 0.0;
/// Highest grade on the 0-10 scale
pub const GRADE_MAX: f64 = 10.0;

/// Read a finite number from a JSON number or numeric string.
///
/// Strings are trimmed and accept `,` as the decimal separator.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Clamp a grade to `[0, 10]`; NaN is "no grade".
pub fn clamp_grade(value: f64) -> Option<f64> {
    (!value.is_nan()).then(|| value.clamp(GRADE_MIN, GRADE_MAX))
}

/// Coerce and clamp a grade; non-numeric input means "no grade".
pub fn coerce_grade(value: &Value) -> Option<f64> {
    coerce_f64(value).and_then(clamp_grade)
}

/// Coerce a count to a non-negative integer; non-numeric input is `0`.
///
/// Fractions are truncated.
pub fn clamp_non_negative_int(value: &Value) -> u32 {
    coerce_f64(value)
        .map(|n| n.trunc().clamp(0.0, u32::MAX as f64) as u32)
        .unwrap_or(0)
}

/// Read the first field of `record` that holds a numeric grade.
pub fn grade_field(record: &Value, fields: &[&str]) -> Option<f64> {
    fields
        .iter()
        .filter_map(|field| record.get(*field))
        .find_map(coerce_grade)
}

/// Read the first present count field of `record`, defaulting to `0`.
pub fn count_field(record: &Value, fields: &[&str]) -> u32 {
    fields
        .iter()
        .find_map(|field| record.get(*field).filter(|v| !v.is_null()))
        .map(clamp_non_negative_int)
        .unwrap_or(0)
}

/// Round to two decimals for display and storage
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clamp_grade_laws() {
        assert_eq!(clamp_grade(-5.0), Some(0.0));
        assert_eq!(clamp_grade(15.0), Some(10.0));
        assert_eq!(clamp_grade(7.5), Some(7.5));
        assert_eq!(clamp_grade(10.0), Some(10.0));
        assert_eq!(clamp_grade(f64::NAN), None);
    }

    #[test]
    fn test_clamp_non_negative_int_laws() {
        assert_eq!(clamp_non_negative_int(&json!(-3)), 0);
        assert_eq!(clamp_non_negative_int(&json!("abc")), 0);
        assert_eq!(clamp_non_negative_int(&json!(null)), 0);
        assert_eq!(clamp_non_negative_int(&json!(4)), 4);
        assert_eq!(clamp_non_negative_int(&json!("5")), 5);
        assert_eq!(clamp_non_negative_int(&json!(2.7)), 2);
    }

    #[test]
    fn test_coerce_grade() {
        assert_eq!(coerce_grade(&json!("8,25")), Some(8.25));
        assert_eq!(coerce_grade(&json!(" 9.5 ")), Some(9.5));
        assert_eq!(coerce_grade(&json!(12)), Some(10.0));
        assert_eq!(coerce_grade(&json!("")), None);
        assert_eq!(coerce_grade(&json!("NaN")), None);
        assert_eq!(coerce_grade(&json!([8])), None);
    }

    #[test]
    fn test_fields() {
        let record = json!({"promedio": "x", "nota": 7, "faltasJustificadas": null, "faltas": 3});
        assert_eq!(grade_field(&record, &["promedioTrimestral", "promedio", "nota"]), Some(7.0));
        assert_eq!(count_field(&record, &["faltasJustificadas", "faltas"]), 3);
        assert_eq!(count_field(&record, &["faltasInjustificadas"]), 0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(7.3333), 7.33);
        assert_eq!(round2(8.456), 8.46);
    }
}
