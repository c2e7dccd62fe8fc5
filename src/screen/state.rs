//! Screen state and reducer
//!
//! The state a gradebook screen owns, the actions that change it, and the
//! commands the reducer asks the driver to run. `reduce` performs no I/O:
//! it applies one action to the state and optionally returns a command.

use crate::client::{BulkAttendanceSave, BulkGradeSave};
use crate::grading::{
    build_attendance_table, build_grade_table, build_summary, AttendanceTable, GradeKey,
    GradeRow, SummaryRow, Term, TermData,
};
use crate::grading::numeric::clamp_non_negative_int;
use crate::normalize::RosterEntry;
use serde::Serialize;
use serde_json::Value;

/// Which table the screen shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Grades,
    Attendance,
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Transient, dismissible message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Everything a gradebook screen displays
#[derive(Debug, Clone, Serialize)]
pub struct ScreenState {
    pub view: View,
    /// Current filter context; `None` until the user picks one
    pub filters: Option<GradeKey>,
    /// Bumped on every new load; replies for older generations are dropped
    pub generation: u64,
    pub loading: bool,
    pub saving: bool,
    /// Unsaved edits exist
    pub dirty: bool,
    pub roster: Vec<RosterEntry>,
    pub grades: Vec<GradeRow>,
    pub attendance: AttendanceTable,
    pub summary: Vec<SummaryRow>,
    pub notice: Option<Notice>,
    /// Edits applied since the rows were loaded
    #[serde(skip)]
    edits: u64,
    /// Value of `edits` when the in-flight save took its snapshot
    #[serde(skip)]
    saved_edits: u64,
}

impl ScreenState {
    pub fn new(view: View) -> Self {
        Self {
            view,
            filters: None,
            generation: 0,
            loading: false,
            saving: false,
            dirty: false,
            roster: Vec::new(),
            grades: Vec::new(),
            attendance: AttendanceTable::default(),
            summary: Vec::new(),
            notice: None,
            edits: 0,
            saved_edits: 0,
        }
    }

    fn clear_rows(&mut self) {
        self.roster.clear();
        self.grades.clear();
        self.attendance = AttendanceTable::default();
        self.summary.clear();
        self.dirty = false;
    }

    fn mark_edited(&mut self) {
        self.edits += 1;
        self.dirty = true;
    }

    fn start_load(&mut self) -> Option<Command> {
        let key = self.filters.clone()?;
        self.generation += 1;
        self.loading = true;
        self.clear_rows();
        Some(Command::Load {
            generation: self.generation,
            view: self.view,
            key,
        })
    }
}

/// Data returned by a completed load
#[derive(Debug, Clone)]
pub enum LoadResult {
    Grades {
        roster: Vec<RosterEntry>,
        records: Vec<Value>,
    },
    Attendance {
        roster: Vec<RosterEntry>,
        records: Vec<Value>,
        working_days: Option<u32>,
    },
    Summary {
        roster: Vec<RosterEntry>,
        terms: Vec<(Term, TermData)>,
        /// Terms whose requests failed and were left empty
        failed_terms: Vec<Term>,
    },
}

/// Events the screen reacts to
#[derive(Debug, Clone)]
pub enum Action {
    SelectView(View),
    SetFilters(GradeKey),
    Reload,
    Loaded {
        generation: u64,
        result: LoadResult,
    },
    LoadFailed {
        generation: u64,
        message: String,
    },
    EditGrade {
        student_id: String,
        value: Value,
    },
    EditAbsences {
        student_id: String,
        justificadas: Value,
        injustificadas: Value,
    },
    SetWorkingDays(Value),
    Save,
    Saved {
        generation: u64,
        message: String,
    },
    SaveFailed {
        generation: u64,
        message: String,
    },
    DismissNotice,
}

/// Side effects requested by the reducer
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Load {
        generation: u64,
        view: View,
        key: GradeKey,
    },
    SaveGrades {
        generation: u64,
        body: BulkGradeSave,
    },
    SaveAttendance {
        generation: u64,
        body: BulkAttendanceSave,
    },
}

/// Apply one action to the screen state.
pub fn reduce(state: &mut ScreenState, action: Action) -> Option<Command> {
    match action {
        Action::SelectView(view) => {
            if state.view == view {
                return None;
            }
            state.view = view;
            state.start_load()
        }

        Action::SetFilters(key) => {
            if !key.is_complete() {
                state.notice = Some(Notice::warning("Select a course, academic year and subject"));
                return None;
            }
            state.filters = Some(key);
            state.start_load()
        }

        Action::Reload => state.start_load(),

        Action::Loaded { generation, result } => {
            if generation != state.generation {
                tracing::debug!(generation, current = state.generation, "Dropping stale load");
                return None;
            }
            state.loading = false;
            apply_load(state, result);
            None
        }

        Action::LoadFailed {
            generation,
            message,
        } => {
            if generation != state.generation {
                return None;
            }
            state.loading = false;
            state.clear_rows();
            state.notice = Some(Notice::error(message));
            None
        }

        Action::EditGrade { student_id, value } => {
            if let Some(row) = state.grades.iter_mut().find(|r| r.student_id == student_id) {
                row.set_promedio(&value);
                state.mark_edited();
            }
            None
        }

        Action::EditAbsences {
            student_id,
            justificadas,
            injustificadas,
        } => {
            let mut touched = false;
            if let Some(row) = state.grades.iter_mut().find(|r| r.student_id == student_id) {
                row.set_absences(&justificadas, &injustificadas);
                touched = true;
            }
            if let Some(row) = state
                .attendance
                .rows
                .iter_mut()
                .find(|r| r.student_id == student_id)
            {
                row.set_absences(&justificadas, &injustificadas);
                touched = true;
            }
            if touched {
                state.mark_edited();
            }
            None
        }

        Action::SetWorkingDays(value) => {
            state.attendance.working_days = match clamp_non_negative_int(&value) {
                0 => None,
                days => Some(days),
            };
            state.mark_edited();
            None
        }

        Action::Save => {
            let key = state.filters.clone()?;
            if state.loading || state.saving {
                return None;
            }
            let command = match state.view {
                View::Grades if !state.grades.is_empty() => Command::SaveGrades {
                    generation: state.generation,
                    body: BulkGradeSave::from_rows(key, &state.grades),
                },
                View::Attendance if !state.attendance.rows.is_empty() => Command::SaveAttendance {
                    generation: state.generation,
                    body: BulkAttendanceSave::from_rows(
                        key,
                        state.attendance.working_days,
                        &state.attendance.rows,
                    ),
                },
                View::Summary => {
                    state.notice = Some(Notice::info("The summary is read-only"));
                    return None;
                }
                _ => {
                    state.notice = Some(Notice::info("Nothing to save"));
                    return None;
                }
            };
            state.saving = true;
            state.saved_edits = state.edits;
            Some(command)
        }

        Action::Saved {
            generation,
            message,
        } => {
            state.saving = false;
            // Edits made while the save was in flight were not sent.
            if generation == state.generation && state.edits == state.saved_edits {
                state.dirty = false;
            }
            state.notice = Some(Notice::info(message));
            None
        }

        Action::SaveFailed {
            generation: _,
            message,
        } => {
            // Edits stay in place so the user can save again.
            state.saving = false;
            state.notice = Some(Notice::error(message));
            None
        }

        Action::DismissNotice => {
            state.notice = None;
            None
        }
    }
}

fn apply_load(state: &mut ScreenState, result: LoadResult) {
    match result {
        LoadResult::Grades { roster, records } => {
            state.grades = build_grade_table(&roster, &records);
            state.roster = roster;
        }
        LoadResult::Attendance {
            roster,
            records,
            working_days,
        } => {
            state.attendance = build_attendance_table(&roster, &records, working_days);
            state.roster = roster;
        }
        LoadResult::Summary {
            roster,
            terms,
            failed_terms,
        } => {
            state.summary = build_summary(&roster, &terms);
            state.roster = roster;
            if !failed_terms.is_empty() {
                let names: Vec<&str> = failed_terms.iter().map(Term::as_str).collect();
                state.notice = Some(Notice::warning(format!(
                    "Could not load {}; those columns are empty",
                    names.join(", ")
                )));
            }
        }
    }
}
