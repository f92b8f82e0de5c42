//! Session aggregate: roster, question, response log and state
//!
//! Pure business logic with no I/O dependencies. The session manager keeps
//! one `Session` behind a single lock and performs device commands around
//! these transitions.

use std::fmt;

use shared::{SessionStatusReply, Source, source_debug};

use crate::core::question::QuestionSpec;
use crate::core::response_log::ResponseLog;
use crate::core::roster::Roster;
use crate::error::{PollServerError, PollServerResult};
use crate::types::ResponseNotification;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    RosterConfigured,
    Active,
    Stopped,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::RosterConfigured => "roster_configured",
            SessionState::Active => "active",
            SessionState::Stopped => "stopped",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Active)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct Session {
    state: SessionState,
    roster: Option<Roster>,
    question: Option<QuestionSpec>,
    log: ResponseLog,
    /// Whether the current roster has been bound to the device
    class_bound: bool,
    dropped_responses: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            roster: None,
            question: None,
            log: ResponseLog::new(),
            class_bound: false,
            dropped_responses: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn roster(&self) -> Option<&Roster> {
        self.roster.as_ref()
    }

    pub fn question(&self) -> Option<&QuestionSpec> {
        self.question.as_ref()
    }

    pub fn log(&self) -> &ResponseLog {
        &self.log
    }

    pub fn class_bound(&self) -> bool {
        self.class_bound
    }

    pub fn set_class_bound(&mut self, bound: bool) {
        self.class_bound = bound;
    }

    pub fn dropped_responses(&self) -> u64 {
        self.dropped_responses
    }

    /// Store a new roster and discard the prepared question
    pub fn replace_roster(&mut self, roster: Roster) -> PollServerResult<()> {
        if self.state.is_active() {
            return Err(PollServerError::PollActive);
        }
        self.roster = Some(roster);
        self.question = None;
        self.class_bound = false;
        self.state = SessionState::RosterConfigured;
        Ok(())
    }

    /// Enter `Active` with a fresh question. The log is cleared here and nowhere else.
    pub fn begin_poll(&mut self, question: QuestionSpec) {
        self.question = Some(question);
        self.log.clear();
        self.state = SessionState::Active;
    }

    /// Returns false when no poll was running
    pub fn end_poll(&mut self) -> bool {
        if !self.state.is_active() {
            return false;
        }
        self.state = SessionState::Stopped;
        true
    }

    /// Admit a notification only while a poll is active
    pub fn record(&mut self, notification: ResponseNotification) -> bool {
        if !self.state.is_active() {
            self.dropped_responses += 1;
            return false;
        }

        if let Some(question) = &self.question {
            if notification.question_id != question.id().to_string() {
                source_debug!(
                    Source::Session,
                    "Response from {} names question {}, current is {}",
                    notification.student_id,
                    notification.question_id,
                    question.id()
                );
            }
        }

        self.log
            .append(notification.student_id, notification.question_id, notification.answer);
        true
    }

    pub fn status(&self, device_connected: bool) -> SessionStatusReply {
        SessionStatusReply {
            state: self.state.as_str().to_string(),
            class_name: self.roster.as_ref().map(|r| r.name().to_string()),
            student_count: self.roster.as_ref().map_or(0, Roster::len),
            question: self.question.as_ref().map(QuestionSpec::summary),
            response_count: self.log.len(),
            dropped_responses: self.dropped_responses,
            device_connected,
        }
    }
}
