//! Current academic year selection

use super::reference::{normalize_ref, EntityRef};
use chrono::NaiveDate;
use serde_json::Value;

pub const YEAR_START_FIELDS: &[&str] = &["fechaInicio", "inicio", "startDate"];
pub const YEAR_END_FIELDS: &[&str] = &["fechaFin", "fin", "endDate"];
pub const YEAR_ACTIVE_FIELDS: &[&str] = &["activo", "actual", "vigente"];

/// Pick the academic year in effect on `today`.
///
/// A year explicitly flagged active wins. Otherwise the first year whose
/// start/end range contains `today` is used. Years without an id are skipped.
pub fn current_year(years: &[Value], today: NaiveDate) -> Option<EntityRef> {
    let candidates = years
        .iter()
        .map(|year| (year, normalize_ref(year)))
        .filter(|(_, r)| r.is_resolved());

    let mut in_range = None;
    for (year, reference) in candidates {
        if is_flagged_active(year) {
            return Some(reference);
        }
        if in_range.is_none() && covers(year, today) {
            in_range = Some(reference);
        }
    }
    in_range
}

/// Whether the year's date range includes `day`; open-ended on a missing side.
pub fn covers(year: &Value, day: NaiveDate) -> bool {
    let start = date_field(year, YEAR_START_FIELDS);
    let end = date_field(year, YEAR_END_FIELDS);
    if start.is_none() && end.is_none() {
        return false;
    }
    start.map_or(true, |s| s <= day) && end.map_or(true, |e| day <= e)
}

/// Parse a calendar date from an RFC 3339 timestamp or a plain `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn date_field(record: &Value, fields: &[&str]) -> Option<NaiveDate> {
    fields
        .iter()
        .find_map(|&f| record.get(f).and_then(Value::as_str))
        .and_then(parse_date)
}

fn is_flagged_active(year: &Value) -> bool {
    YEAR_ACTIVE_FIELDS
        .iter()
        .any(|&f| year.get(f).and_then(Value::as_bool).unwrap_or(false))
}
