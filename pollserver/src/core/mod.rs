//! Core business logic modules
//!
//! Pure business logic with no I/O dependencies

pub mod question;
pub mod response_log;
pub mod roster;
pub mod session;

// Re-export commonly used types
pub use question::{QuestionSpec, QuestionType};
pub use response_log::{ResponseLog, StudentResponse};
pub use roster::{AddStudentStatus, Roster, RosterBuilder, Student};
pub use session::{Session, SessionState};
