//! Academic API resources and paths

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const GRADES_PATH: &str = "calificaciones";
pub const GRADES_BULK_PATH: &str = "calificaciones/bulk";
pub const ATTENDANCE_PATH: &str = "asistencias";
pub const ATTENDANCE_BULK_PATH: &str = "asistencias/bulk";
pub const WORKING_DAYS_PATH: &str = "asistencias/dias-laborables";

/// CRUD resources exposed by the backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    AcademicYears,
    Courses,
    Subjects,
    Students,
    Enrollments,
}

impl Resource {
    pub fn all() -> &'static [Resource] {
        &[
            Resource::AcademicYears,
            Resource::Courses,
            Resource::Subjects,
            Resource::Students,
            Resource::Enrollments,
        ]
    }

    /// Path segment under the API base
    pub fn path(&self) -> &'static str {
        match self {
            Resource::AcademicYears => "anios-lectivos",
            Resource::Courses => "cursos",
            Resource::Subjects => "materias",
            Resource::Students => "estudiantes",
            Resource::Enrollments => "matriculas",
        }
    }

    /// Envelope field some endpoints use for the list
    pub fn list_field(&self) -> &'static str {
        match self {
            Resource::AcademicYears => "aniosLectivos",
            Resource::Courses => "cursos",
            Resource::Subjects => "materias",
            Resource::Students => "estudiantes",
            Resource::Enrollments => "matriculas",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "years" | "academic-years" | "anios-lectivos" | "anios" => Ok(Resource::AcademicYears),
            "courses" | "cursos" => Ok(Resource::Courses),
            "subjects" | "materias" => Ok(Resource::Subjects),
            "students" | "estudiantes" | "alumnos" => Ok(Resource::Students),
            "enrollments" | "matriculas" => Ok(Resource::Enrollments),
            other => Err(format!(
                "Unknown resource: {}. Use years, courses, subjects, students or enrollments",
                other
            )),
        }
    }
}
