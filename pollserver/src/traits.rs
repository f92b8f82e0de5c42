//! Service trait definitions for dependency injection
//!
//! The response-device infrastructure is abstracted behind this trait so the
//! session manager can run against hardware, the simulator or a mock.

use async_trait::async_trait;

use crate::core::{QuestionSpec, Roster};
use crate::error::AdapterError;
use crate::types::ResponseSender;

/// Response-device infrastructure
///
/// The session manager calls these with the session lock held. Each command
/// returns once it has been issued, never after waiting for the hardware to
/// acknowledge it, and never waits on the response queue.
#[mockall::automock]
#[async_trait]
pub trait DeviceAdapter: Send + Sync {
    /// Establish a live session with the response infrastructure
    async fn connect(&self) -> Result<(), AdapterError>;

    /// Release everything acquired since `connect`
    async fn disconnect(&self) -> Result<(), AdapterError>;

    async fn is_connected(&self) -> bool;

    /// Bind a roster to the live infrastructure
    async fn start_class(&self, roster: &Roster) -> Result<(), AdapterError>;

    async fn stop_class(&self) -> Result<(), AdapterError>;

    /// Open a question for responses
    async fn start_question(&self, question: &QuestionSpec) -> Result<(), AdapterError>;

    async fn stop_question(&self) -> Result<(), AdapterError>;

    /// Register the single destination for response notifications,
    /// replacing any earlier one
    async fn subscribe_responses(&self, sender: ResponseSender) -> Result<(), AdapterError>;
}
