//! Session manager
//!
//! Owns the single `Session` behind one lock and drives the device adapter
//! around its transitions. Request handlers and the response collector both
//! go through here, so every read or write of the session is serialized.

use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

use crate::core::{QuestionSpec, Roster, Session, SessionState};
use crate::error::{AdapterError, PollServerError, PollServerResult, ValidationError};
use crate::traits::DeviceAdapter;
use crate::types::{ResponseNotification, ResponseReceiver, ResponseSender};
use shared::{
    ConfigureRosterRequest, PollStatus, ResultEntry, SessionStatusReply, Source, StartPollRequest, source_debug,
    source_info, source_warn,
};

pub struct SessionManager<D: DeviceAdapter> {
    session: Arc<Mutex<Session>>,
    adapter: Arc<D>,
    response_tx: ResponseSender,
}

impl<D: DeviceAdapter> Clone for SessionManager<D> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            adapter: self.adapter.clone(),
            response_tx: self.response_tx.clone(),
        }
    }
}

impl<D: DeviceAdapter + 'static> SessionManager<D> {
    /// Create a manager and the receiving end of its notification queue.
    /// The receiver is meant for a `ResponseCollector`.
    pub fn new(adapter: Arc<D>, channel_capacity: usize) -> (Self, ResponseReceiver) {
        let (response_tx, response_rx) = mpsc::channel(channel_capacity.max(1));
        let manager = Self {
            session: Arc::new(Mutex::new(Session::new())),
            adapter,
            response_tx,
        };
        (manager, response_rx)
    }

    pub fn adapter(&self) -> &Arc<D> {
        &self.adapter
    }

    /// Replace the roster. Rejected while a poll is running.
    pub async fn configure_roster(&self, request: &ConfigureRosterRequest) -> PollServerResult<PollStatus> {
        let roster = Roster::from_request(request)?;

        let mut session = self.session.lock().await;
        if session.state().is_active() {
            return Err(PollServerError::PollActive);
        }

        if session.class_bound() {
            if let Err(e) = self.adapter.stop_class().await {
                source_warn!(Source::Session, "⚠️ Failed to release previous class from device: {}", e);
            }
        }

        let (name, count) = (roster.name().to_string(), roster.len());
        session.replace_roster(roster)?;
        source_info!(Source::Session, "📋 Class '{}' configured with {} students", name, count);
        Ok(PollStatus::ClassSetupComplete)
    }

    /// Open a new poll. A second start while one is running is a no-op.
    pub async fn start_poll(&self, request: &StartPollRequest) -> PollServerResult<PollStatus> {
        self.try_start_poll(Ok(request)).await
    }

    /// Open a poll from a request body that may have failed to decode.
    /// The decode error is reported at the question step, after the
    /// running-poll and roster checks.
    pub async fn try_start_poll(
        &self,
        request: Result<&StartPollRequest, ValidationError>,
    ) -> PollServerResult<PollStatus> {
        let mut session = self.session.lock().await;

        if session.state().is_active() {
            source_debug!(Source::Session, "Start requested while a poll is running");
            return Ok(PollStatus::AlreadyRunning);
        }

        let roster = session.roster().cloned().ok_or(PollServerError::NoRosterConfigured)?;
        let question = QuestionSpec::from_request(request?)?;

        let started_class = !session.class_bound();
        if started_class {
            self.adapter.start_class(&roster).await?;
        }

        if let Err(e) = self.open_question(&question).await {
            if started_class {
                if let Err(stop_err) = self.adapter.stop_class().await {
                    source_warn!(Source::Session, "⚠️ Failed to release class after start failure: {}", stop_err);
                }
            }
            return Err(e.into());
        }

        source_info!(
            Source::Session,
            "🗳️ Poll started: {} '{}' ({} choices, id {})",
            question.kind(),
            question.text(),
            question.choices().len(),
            question.id()
        );
        session.set_class_bound(true);
        session.begin_poll(question);
        Ok(PollStatus::PollStarted)
    }

    async fn open_question(&self, question: &QuestionSpec) -> Result<(), AdapterError> {
        self.adapter.subscribe_responses(self.response_tx.clone()).await?;
        self.adapter.start_question(question).await
    }

    /// Close the running poll. Results stay readable until the next start.
    pub async fn stop_poll(&self) -> PollServerResult<PollStatus> {
        let mut session = self.session.lock().await;

        if !session.state().is_active() {
            return Ok(PollStatus::NoPollRunning);
        }

        self.adapter.stop_question().await?;
        session.end_poll();
        source_info!(Source::Session, "🛑 Poll stopped with {} responses", session.log().len());
        Ok(PollStatus::PollStopped)
    }

    /// Snapshot of the current poll's responses in arrival order
    pub async fn read_results(&self) -> Vec<ResultEntry> {
        self.session.lock().await.log().snapshot()
    }

    /// Admission point for device notifications; only accepted while Active
    pub async fn record_response(&self, notification: ResponseNotification) -> bool {
        let student_id = notification.student_id.clone();
        let accepted = self.session.lock().await.record(notification);
        if !accepted {
            source_debug!(Source::Session, "Dropped response from {} outside an active poll", student_id);
        }
        accepted
    }

    pub async fn state(&self) -> SessionState {
        self.session.lock().await.state()
    }

    pub async fn status(&self) -> SessionStatusReply {
        let device_connected = self.adapter.is_connected().await;
        self.session.lock().await.status(device_connected)
    }

    /// Release device resources in reverse order of acquisition. Failures
    /// are logged and teardown continues.
    pub async fn shutdown(&self) {
        let mut session = self.session.lock().await;

        if session.state().is_active() {
            if let Err(e) = self.adapter.stop_question().await {
                source_warn!(Source::Session, "⚠️ stopQuestion during shutdown failed: {}", e);
            }
            session.end_poll();
        }

        if session.class_bound() {
            if let Err(e) = self.adapter.stop_class().await {
                source_warn!(Source::Session, "⚠️ stopClass during shutdown failed: {}", e);
            }
            session.set_class_bound(false);
        }

        if self.adapter.is_connected().await {
            if let Err(e) = self.adapter.disconnect().await {
                source_warn!(Source::Session, "⚠️ Device disconnect failed: {}", e);
            }
        }
        source_info!(Source::Session, "🔌 Session released device resources");
    }
}
