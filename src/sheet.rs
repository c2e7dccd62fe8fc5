//! Tabular I/O for the CLI
//!
//! Renders rosters, gradebooks, attendance sheets and summaries as aligned
//! text tables or CSV, and reads bulk-save rows back from CSV files.

use crate::client::{AttendanceEntry, GradeEntry};
use crate::grading::{attended_rate, AttendanceTable, GradeRow, SummaryRow};
use crate::normalize::{normalize_ref, RosterEntry, ID_FIELDS, NAME_FIELDS};
use serde_json::Value;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::str::FromStr;

/// How command output is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(SheetError::InvalidFormat(other.to_string())),
        }
    }
}

/// Errors reading CLI input
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("Unknown output format: {0} (use table, json or csv)")]
    InvalidFormat(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing CSV column: {0}")]
    MissingColumn(&'static str),

    #[error("Failed to read {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Header row plus string cells; empty cells mean "no value"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Generic records: id, display name, then every other scalar field
    /// in first-seen order.
    pub fn records(records: &[Value]) -> Self {
        let mut extra: Vec<String> = Vec::new();
        for record in records {
            if let Value::Object(map) = record {
                for (key, value) in map {
                    let skip = ID_FIELDS.contains(&key.as_str())
                        || NAME_FIELDS.contains(&key.as_str())
                        || key == "__v"
                        || value.is_object()
                        || value.is_array();
                    if !skip && !extra.contains(key) {
                        extra.push(key.clone());
                    }
                }
            }
        }

        let mut sheet = Sheet::new(["id", "nombre"].into_iter().map(String::from).chain(extra.iter().cloned()));
        for record in records {
            let reference = normalize_ref(record);
            let mut row = vec![reference.id.clone(), reference.name.clone().unwrap_or_default()];
            row.extend(extra.iter().map(|key| scalar_cell(record.get(key))));
            sheet.push(row);
        }
        sheet
    }

    pub fn roster(roster: &[RosterEntry]) -> Self {
        let mut sheet = Sheet::new(["estudianteId", "estudiante"]);
        for entry in roster {
            sheet.push(vec![entry.id.clone(), entry.name.clone()]);
        }
        sheet
    }

    pub fn grades(rows: &[GradeRow]) -> Self {
        let mut sheet = Sheet::new([
            "estudianteId",
            "estudiante",
            "promedio",
            "faltasJustificadas",
            "faltasInjustificadas",
            "calificacion",
        ]);
        for row in rows {
            sheet.push(vec![
                row.student_id.clone(),
                row.student_name.clone(),
                number_cell(row.promedio),
                row.faltas_justificadas.to_string(),
                row.faltas_injustificadas.to_string(),
                row.label.to_string(),
            ]);
        }
        sheet
    }

    pub fn attendance(table: &AttendanceTable) -> Self {
        let mut sheet = Sheet::new([
            "estudianteId",
            "estudiante",
            "faltasJustificadas",
            "faltasInjustificadas",
            "total",
            "asistencia%",
        ]);
        for row in &table.rows {
            sheet.push(vec![
                row.student_id.clone(),
                row.student_name.clone(),
                row.faltas_justificadas.to_string(),
                row.faltas_injustificadas.to_string(),
                row.total_faltas().to_string(),
                number_cell(attended_rate(row, table.working_days)),
            ]);
        }
        sheet
    }

    pub fn summary(rows: &[SummaryRow]) -> Self {
        let mut sheet = Sheet::new([
            "estudianteId",
            "estudiante",
            "T1",
            "T2",
            "T3",
            "anual",
            "calificacion",
            "ausentismo% T1",
            "ausentismo% T2",
            "ausentismo% T3",
        ]);
        for row in rows {
            let mut cells = vec![row.student_id.clone(), row.student_name.clone()];
            cells.extend(row.promedios.iter().map(|p| number_cell(*p)));
            cells.push(number_cell(row.promedio_anual));
            cells.push(row.label.to_string());
            cells.extend(row.ausentismo.iter().map(|a| number_cell(*a)));
            sheet.push(cells);
        }
        sheet
    }

    /// Aligned text table; empty cells print as `-`.
    pub fn write_table<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(display_cell(cell).chars().count());
                }
            }
        }

        writeln!(out, "{}", pad_line(self.headers.iter().map(String::as_str), &widths))?;
        let total: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1) * 3;
        writeln!(out, "{}", "-".repeat(total))?;
        for row in &self.rows {
            writeln!(out, "{}", pad_line(row.iter().map(|c| display_cell(c)), &widths))?;
        }
        Ok(())
    }

    pub fn write_csv<W: Write>(&self, out: W) -> Result<(), SheetError> {
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

fn pad_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(c, w)| format!("{:<width$}", c, width = *w))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

fn display_cell(cell: &str) -> &str {
    if cell.is_empty() {
        "-"
    } else {
        cell
    }
}

fn number_cell(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_default()
}

fn scalar_cell(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Column names accepted for each bulk-save field
const STUDENT_COLUMNS: &[&str] = &["estudianteId", "estudiante_id", "id"];
const GRADE_COLUMNS: &[&str] = &["promedio", "promedioTrimestral", "nota"];
const JUSTIFIED_COLUMNS: &[&str] = &["faltasJustificadas", "justificadas"];
const UNJUSTIFIED_COLUMNS: &[&str] = &["faltasInjustificadas", "injustificadas"];

struct Columns {
    headers: csv::StringRecord,
}

impl Columns {
    fn find(&self, names: &[&str]) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
    }

    fn cell(record: &csv::StringRecord, index: Option<usize>) -> Value {
        match index.and_then(|i| record.get(i)).map(str::trim) {
            Some(s) if !s.is_empty() => Value::String(s.to_string()),
            _ => Value::Null,
        }
    }
}

/// Read grade rows from CSV. Values are clamped; a blank grade stays empty.
///
/// Rows without a student id are skipped.
pub fn read_grade_csv<R: Read>(input: R) -> Result<Vec<GradeEntry>, SheetError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let columns = Columns {
        headers: reader.headers()?.clone(),
    };
    let student = columns
        .find(STUDENT_COLUMNS)
        .ok_or(SheetError::MissingColumn("estudianteId"))?;
    let grade = columns.find(GRADE_COLUMNS);
    let justified = columns.find(JUSTIFIED_COLUMNS);
    let unjustified = columns.find(UNJUSTIFIED_COLUMNS);

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        let id = record.get(student).map(str::trim).unwrap_or_default();
        if id.is_empty() {
            continue;
        }
        entries.push(GradeEntry::from_raw(
            id,
            &Columns::cell(&record, grade),
            &Columns::cell(&record, justified),
            &Columns::cell(&record, unjustified),
        ));
    }
    Ok(entries)
}

/// Read absence rows from CSV, clamping counts to zero or more.
pub fn read_attendance_csv<R: Read>(input: R) -> Result<Vec<AttendanceEntry>, SheetError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let columns = Columns {
        headers: reader.headers()?.clone(),
    };
    let student = columns
        .find(STUDENT_COLUMNS)
        .ok_or(SheetError::MissingColumn("estudianteId"))?;
    let justified = columns.find(JUSTIFIED_COLUMNS);
    let unjustified = columns.find(UNJUSTIFIED_COLUMNS);

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        let id = record.get(student).map(str::trim).unwrap_or_default();
        if id.is_empty() {
            continue;
        }
        entries.push(AttendanceEntry::from_raw(
            id,
            &Columns::cell(&record, justified),
            &Columns::cell(&record, unjustified),
        ));
    }
    Ok(entries)
}

/// Parse a `--data` argument: inline JSON, or `@path` to read it from a file.
pub fn parse_data_arg(arg: &str) -> Result<Value, SheetError> {
    let text = match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path).map_err(|e| SheetError::Io {
            path: PathBuf::from(path),
            error: e.to_string(),
        })?,
        None => arg.to_string(),
    };
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::build_grade_table;
    use serde_json::json;

    fn render_table(sheet: &Sheet) -> String {
        let mut out = Vec::new();
        sheet.write_table(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(" csv ".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_grade_sheet_table() {
        let roster = vec![RosterEntry::new("s1", "Ana"), RosterEntry::new("s2", "Beto")];
        let rows = build_grade_table(&roster, &[json!({"estudianteId": "s1", "promedioTrimestral": 9})]);
        let text = render_table(&Sheet::grades(&rows));

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("estudianteId | estudiante | promedio"));
        assert!(lines[2].contains("9.00"));
        assert!(lines[2].contains("Excelente/A"));
        assert!(lines[3].contains("Beto"));
        assert!(lines[3].contains(" - "));
    }

    #[test]
    fn test_grade_sheet_csv_leaves_blanks() {
        let roster = vec![RosterEntry::new("s2", "Beto")];
        let rows = build_grade_table(&roster, &[]);
        let mut out = Vec::new();
        Sheet::grades(&rows).write_csv(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "estudianteId,estudiante,promedio,faltasJustificadas,faltasInjustificadas,calificacion\ns2,Beto,,0,0,\n"
        );
    }

    #[test]
    fn test_records_sheet_columns() {
        let sheet = Sheet::records(&[
            json!({"_id": "m1", "nombre": "Lengua", "horas": 4, "docente": {"_id": "d1"}}),
            json!({"_id": "m2", "nombre": "Historia", "area": "Sociales"}),
        ]);
        assert_eq!(sheet.headers, vec!["id", "nombre", "horas", "area"]);
        assert_eq!(sheet.rows[0], vec!["m1", "Lengua", "4", ""]);
        assert_eq!(sheet.rows[1], vec!["m2", "Historia", "", "Sociales"]);
    }

    #[test]
    fn test_read_grade_csv_clamps() {
        let input = "estudianteId,promedio,faltasJustificadas,faltasInjustificadas\n\
                     s1,11,2,-1\n\
                     s2,,abc,3\n\
                     ,7,0,0\n\
                     s3,\"7,5\",1,1\n";
        let entries = read_grade_csv(input.as_bytes()).unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].promedio_trimestral, Some(10.0));
        assert_eq!(entries[0].faltas_justificadas, 2);
        assert_eq!(entries[0].faltas_injustificadas, 0);
        assert_eq!(entries[1].promedio_trimestral, None);
        assert_eq!(entries[1].faltas_justificadas, 0);
        assert_eq!(entries[2].promedio_trimestral, Some(7.5));
    }

    #[test]
    fn test_read_csv_requires_student_column() {
        let err = read_attendance_csv("nombre,faltasJustificadas\nAna,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SheetError::MissingColumn("estudianteId")));
    }

    #[test]
    fn test_read_attendance_csv() {
        let entries =
            read_attendance_csv("estudianteId,justificadas,injustificadas\ns1,1,2\n".as_bytes()).unwrap();
        assert_eq!(entries, vec![AttendanceEntry::from_raw("s1", &json!(1), &json!(2))]);
    }

    #[test]
    fn test_parse_data_arg() {
        assert_eq!(parse_data_arg(r#"{"nombre": "3A"}"#).unwrap(), json!({"nombre": "3A"}));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"nombre": "Lengua"}}"#).unwrap();
        let arg = format!("@{}", file.path().display());
        assert_eq!(parse_data_arg(&arg).unwrap(), json!({"nombre": "Lengua"}));

        assert!(matches!(parse_data_arg("{oops"), Err(SheetError::Json(_))));
        assert!(matches!(
            parse_data_arg("@/nonexistent/aula.json"),
            Err(SheetError::Io { .. })
        ));
    }
}
