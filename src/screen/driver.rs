//! Command execution for gradebook screens

use super::state::{reduce, Action, Command, LoadResult, ScreenState, View};
use crate::client::{load_roster, AcademicApi, ClientResult};
use crate::grading::{GradeKey, Term, TermData};
use futures_util::future::join_all;
use std::sync::Arc;

/// Owns a screen state and runs the reducer's commands against the API
pub struct Gradebook {
    api: Arc<dyn AcademicApi>,
    state: ScreenState,
}

impl Gradebook {
    pub fn new(api: Arc<dyn AcademicApi>, view: View) -> Self {
        Self {
            api,
            state: ScreenState::new(view),
        }
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    /// Apply an action and run any command it produces to completion.
    pub async fn dispatch(&mut self, action: Action) {
        let mut next = Some(action);
        while let Some(action) = next.take() {
            if let Some(command) = reduce(&mut self.state, action) {
                next = Some(execute(self.api.as_ref(), command).await);
            }
        }
    }
}

/// Run one command and turn its outcome into the follow-up action.
pub async fn execute(api: &dyn AcademicApi, command: Command) -> Action {
    match command {
        Command::Load {
            generation,
            view,
            key,
        } => match load_view(api, view, &key).await {
            Ok(result) => Action::Loaded { generation, result },
            Err(e) => {
                tracing::warn!(generation, ?view, error = %e, "Screen load failed");
                Action::LoadFailed {
                    generation,
                    message: e.user_message(),
                }
            }
        },

        Command::SaveGrades { generation, body } => match api.save_grades(&body).await {
            Ok(_) => {
                tracing::info!(rows = body.calificaciones.len(), "Grades saved");
                Action::Saved {
                    generation,
                    message: "Grades saved".to_string(),
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save grades");
                Action::SaveFailed {
                    generation,
                    message: e.user_message(),
                }
            }
        },

        Command::SaveAttendance { generation, body } => match api.save_attendance(&body).await {
            Ok(_) => {
                tracing::info!(rows = body.registros.len(), "Attendance saved");
                Action::Saved {
                    generation,
                    message: "Attendance saved".to_string(),
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save attendance");
                Action::SaveFailed {
                    generation,
                    message: e.user_message(),
                }
            }
        },
    }
}

async fn load_view(api: &dyn AcademicApi, view: View, key: &GradeKey) -> ClientResult<LoadResult> {
    let roster = load_roster(api, &key.curso_id, Some(&key.anio_lectivo_id));

    match view {
        View::Grades => {
            let (roster, records) = tokio::join!(roster, api.grades(key));
            Ok(LoadResult::Grades {
                roster: roster?,
                records: records?,
            })
        }
        View::Attendance => {
            let (roster, records, working_days) =
                tokio::join!(roster, api.attendance(key), api.working_days(key));
            Ok(LoadResult::Attendance {
                roster: roster?,
                records: records?,
                working_days: working_days?,
            })
        }
        View::Summary => {
            let (roster, (terms, failed_terms)) = tokio::join!(roster, load_terms(api, key));
            Ok(LoadResult::Summary {
                roster: roster?,
                terms,
                failed_terms,
            })
        }
    }
}

/// Fetch grades, attendance and working days for all three terms at once.
///
/// A term whose requests fail is returned empty and listed in the second
/// element; the other terms are unaffected.
pub async fn load_terms(api: &dyn AcademicApi, key: &GradeKey) -> (Vec<(Term, TermData)>, Vec<Term>) {
    let fetches = Term::all().into_iter().map(move |term| async move {
        let key = key.with_term(term);
        let (grades, attendance, working_days) =
            tokio::join!(api.grades(&key), api.attendance(&key), api.working_days(&key));

        let data = match (grades, attendance, working_days) {
            (Ok(grades), Ok(attendance), Ok(working_days)) => Ok(TermData {
                grades,
                attendance,
                working_days,
            }),
            (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => Err(e),
        };
        (term, data)
    });

    let mut terms = Vec::with_capacity(3);
    let mut failed = Vec::new();
    for (term, data) in join_all(fetches).await {
        match data {
            Ok(data) => terms.push((term, data)),
            Err(e) => {
                tracing::warn!(term = %term, error = %e, "Term data unavailable");
                terms.push((term, TermData::default()));
                failed.push(term);
            }
        }
    }
    (terms, failed)
}
