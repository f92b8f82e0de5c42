//! Shared types for the classroom polling service
//!
//! Contains the request/response schema clients speak, configuration
//! types, the log-source identity and the tracing bootstrap. Server-internal
//! types (session entities, device notifications) live in `pollserver`.

pub mod errors;
pub mod logging;
pub mod messages;
pub mod types;

pub use errors::*;
pub use types::*;

pub use messages::{
    // Client ↔ PollServer schema
    ConfigureRosterRequest, StudentEntry, StartPollRequest, PollStatus, StatusReply,
    ErrorReply, ResultEntry, ResultsReply, SessionStatusReply, QuestionSummary,

    // Configuration
    PollServerConfig, SimulatorConfig,
};
