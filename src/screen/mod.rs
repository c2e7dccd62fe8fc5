//! Gradebook Screens
//!
//! Screen state is an explicit struct updated by a reducer. Loads and saves
//! are commands the reducer hands back; [`Gradebook`] runs them against an
//! [`AcademicApi`](crate::client::AcademicApi) and feeds the outcome back in.
//!
//! Every load carries a generation number. Changing filters bumps it, so a
//! reply that arrives after the user moved on is dropped instead of
//! overwriting the newer data.

mod driver;
mod state;

pub use driver::{execute, load_terms, Gradebook};
pub use state::{reduce, Action, Command, LoadResult, Notice, NoticeLevel, ScreenState, View};
