//! Qualitative labels for numeric averages

use serde::{Serialize, Serializer};
use std::fmt;

/// Ordinal label derived from a 0-10 average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QualitativeLabel {
    /// `>= 9`
    Excelente,
    /// `>= 8`
    MuyBueno,
    /// `>= 7`
    Bueno,
    /// `>= 6`
    Regular,
    /// `< 6`
    Insuficiente,
    /// No average recorded
    NoRecord,
}

impl QualitativeLabel {
    /// Map an average to its band. Missing or NaN averages map to
    /// [`QualitativeLabel::NoRecord`], never to the lowest band.
    pub fn from_average(average: Option<f64>) -> Self {
        match average {
            None => QualitativeLabel::NoRecord,
            Some(v) if v.is_nan() => QualitativeLabel::NoRecord,
            Some(v) if v >= 9.0 => QualitativeLabel::Excelente,
            Some(v) if v >= 8.0 => QualitativeLabel::MuyBueno,
            Some(v) if v >= 7.0 => QualitativeLabel::Bueno,
            Some(v) if v >= 6.0 => QualitativeLabel::Regular,
            Some(_) => QualitativeLabel::Insuficiente,
        }
    }

    /// Letter grade; empty for the no-record sentinel
    pub fn letter(&self) -> &'static str {
        match self {
            QualitativeLabel::Excelente => "A",
            QualitativeLabel::MuyBueno => "B",
            QualitativeLabel::Bueno => "C",
            QualitativeLabel::Regular => "D",
            QualitativeLabel::Insuficiente => "E",
            QualitativeLabel::NoRecord => "",
        }
    }

    pub fn word(&self) -> &'static str {
        match self {
            QualitativeLabel::Excelente => "Excelente",
            QualitativeLabel::MuyBueno => "Muy Bueno",
            QualitativeLabel::Bueno => "Bueno",
            QualitativeLabel::Regular => "Regular",
            QualitativeLabel::Insuficiente => "Insuficiente",
            QualitativeLabel::NoRecord => "",
        }
    }

    pub fn is_record(&self) -> bool {
        !matches!(self, QualitativeLabel::NoRecord)
    }
}

/// `"Excelente/A"` style, empty for no record
impl fmt::Display for QualitativeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_record() {
            write!(f, "{}/{}", self.word(), self.letter())
        } else {
            Ok(())
        }
    }
}

impl Serialize for QualitativeLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.letter())
    }
}

/// Shorthand used by the table builders
pub fn qualitative(average: Option<f64>) -> QualitativeLabel {
    QualitativeLabel::from_average(average)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands_at_integer_thresholds() {
        assert_eq!(qualitative(Some(10.0)).letter(), "A");
        assert_eq!(qualitative(Some(9.0)).letter(), "A");
        assert_eq!(qualitative(Some(8.999)).letter(), "B");
        assert_eq!(qualitative(Some(8.0)).letter(), "B");
        assert_eq!(qualitative(Some(7.0)).letter(), "C");
        assert_eq!(qualitative(Some(6.999)).letter(), "D");
        assert_eq!(qualitative(Some(6.0)).letter(), "D");
        assert_eq!(qualitative(Some(5.99)).letter(), "E");
        assert_eq!(qualitative(Some(0.0)).letter(), "E");
    }

    #[test]
    fn test_no_record_is_not_lowest_band() {
        assert_eq!(qualitative(None), QualitativeLabel::NoRecord);
        assert_eq!(qualitative(Some(f64::NAN)), QualitativeLabel::NoRecord);
        assert_eq!(qualitative(None).letter(), "");
        assert_ne!(qualitative(None), QualitativeLabel::Insuficiente);
    }

    #[test]
    fn test_display() {
        assert_eq!(QualitativeLabel::Excelente.to_string(), "Excelente/A");
        assert_eq!(QualitativeLabel::MuyBueno.to_string(), "Muy Bueno/B");
        assert_eq!(QualitativeLabel::NoRecord.to_string(), "");
        assert_eq!(serde_json::to_string(&QualitativeLabel::Bueno).unwrap(), "\"C\"");
    }
}
