//! Terms and grading context keys

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three academic grading periods
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    T1,
    T2,
    T3,
}

impl Term {
    /// All terms in calendar order
    pub fn all() -> [Term; 3] {
        [Term::T1, Term::T2, Term::T3]
    }

    /// Zero-based position in the school year
    pub fn index(&self) -> usize {
        match self {
            Term::T1 => 0,
            Term::T2 => 1,
            Term::T3 => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Term::T1 => "T1",
            Term::T2 => "T2",
            Term::T3 => "T3",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Term {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "1" | "t1" | "primer" | "primero" | "primer trimestre" => Ok(Term::T1),
            "2" | "t2" | "segundo" | "segundo trimestre" => Ok(Term::T2),
            "3" | "t3" | "tercer" | "tercero" | "tercer trimestre" => Ok(Term::T3),
            _ => Err(format!("Invalid term: {}. Use T1, T2 or T3", s)),
        }
    }
}

/// Filter context for grade and attendance screens
///
/// Serialized with the backend's field names so it can be sent as a query
/// string or embedded in a bulk-save body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeKey {
    pub curso_id: String,
    pub anio_lectivo_id: String,
    pub materia_id: String,
    pub trimestre: Term,
}

impl GradeKey {
    pub fn new(
        curso_id: impl Into<String>,
        anio_lectivo_id: impl Into<String>,
        materia_id: impl Into<String>,
        trimestre: Term,
    ) -> Self {
        Self {
            curso_id: curso_id.into(),
            anio_lectivo_id: anio_lectivo_id.into(),
            materia_id: materia_id.into(),
            trimestre,
        }
    }

    /// Same course/year/subject for a different term
    pub fn with_term(&self, trimestre: Term) -> Self {
        Self {
            trimestre,
            ..self.clone()
        }
    }

    /// Whether every id is filled in
    pub fn is_complete(&self) -> bool {
        !self.curso_id.trim().is_empty()
            && !self.anio_lectivo_id.trim().is_empty()
            && !self.materia_id.trim().is_empty()
    }
}
