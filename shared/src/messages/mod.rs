//! Message types for the classroom polling service
//!
//! - `api`: Client ↔ PollServer request/response bodies
//! - `config`: Server and simulator configuration

pub mod api;
pub mod config;

pub use api::{
    ConfigureRosterRequest, StudentEntry, StartPollRequest, PollStatus, StatusReply,
    ErrorReply, ResultEntry, ResultsReply, SessionStatusReply, QuestionSummary,
};

pub use config::{PollServerConfig, SimulatorConfig};
