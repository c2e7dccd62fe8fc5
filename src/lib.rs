//! # Aula
//!
//! Academic records client - reconciles inconsistently shaped responses of a
//! school-management REST API into flat gradebook and attendance tables.
//!
//! ## Features
//!
//! - **Relation normalization**: bare ids, populated records and nested
//!   wrappers all resolve to one `{id, name}` pair, never failing
//! - **Roster-driven tables**: one row per enrolled student with clamped
//!   grades, absence counts and qualitative labels
//! - **Async REST client**: CRUD, bulk saves and working days over reqwest
//! - **Screen reducer**: explicit state with stale-response protection
//!
//! ## Modules
//!
//! - [`normalize`]: reference normalizer, roster split, envelope unwrapping
//! - [`grading`]: coercion, labels, table builders, attendance rates, summary
//! - [`client`]: academic API seam and its HTTP implementation
//! - [`screen`]: screen state, actions, reducer and command driver
//! - [`sheet`]: text/CSV rendering and CSV bulk-save input
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use aula::client::{AcademicClient, ClientConfig};
//! use aula::grading::{GradeKey, Term};
//! use aula::screen::{Action, Gradebook, View};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AcademicClient::new(ClientConfig::new("http://localhost:3000/api"))?;
//!     let mut book = Gradebook::new(Arc::new(client), View::Grades);
//!
//!     book.dispatch(Action::SetFilters(GradeKey::new("curso1", "2024", "lengua", Term::T1)))
//!         .await;
//!
//!     for row in &book.state().grades {
//!         println!("{} {:?} {}", row.student_name, row.promedio, row.label);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod grading;
pub mod normalize;
pub mod screen;
pub mod sheet;

// Re-export top-level types for convenience
pub use client::{AcademicApi, AcademicClient, ClientConfig, ClientError, ClientResult, Resource};

pub use config::{Config, ConfigError};

pub use grading::{
    build_attendance_table, build_grade_table, build_summary, AttendanceTable, GradeKey,
    GradeRow, QualitativeLabel, SummaryRow, Term,
};

pub use normalize::{normalize_ref, split_references, EntityRef, RosterEntry, RosterSplit};

pub use screen::{reduce, Action, Command, Gradebook, ScreenState, View};
