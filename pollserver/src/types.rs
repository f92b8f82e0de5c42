//! Type definitions for the poll server
//!
//! Data types passed between the device adapter, the response collector and
//! the session manager that are not service traits.

use serde::{Deserialize, Serialize};

/// One answer reported by the response devices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseNotification {
    pub student_id: String,
    pub question_id: String,
    pub answer: String,
}

impl ResponseNotification {
    pub fn new(student_id: impl Into<String>, question_id: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            question_id: question_id.into(),
            answer: answer.into(),
        }
    }
}

/// Sending half handed to the device adapter for response delivery
pub type ResponseSender = tokio::sync::mpsc::Sender<ResponseNotification>;

/// Receiving half drained by the response collector
pub type ResponseReceiver = tokio::sync::mpsc::Receiver<ResponseNotification>;
