//! Response collector
//!
//! Drains device notifications off the bounded queue and hands each one to
//! the session manager, which applies the Active guard under the session
//! lock. Runs independently of the request handlers.

use tokio::task::JoinHandle;

use crate::session_manager::SessionManager;
use crate::traits::DeviceAdapter;
use crate::types::ResponseReceiver;
use shared::{Source, source_debug, source_info};

pub struct ResponseCollector<D: DeviceAdapter> {
    manager: SessionManager<D>,
}

impl<D: DeviceAdapter + 'static> ResponseCollector<D> {
    pub fn new(manager: SessionManager<D>) -> Self {
        Self { manager }
    }

    /// Consume notifications until the queue closes
    pub async fn run(self, mut receiver: ResponseReceiver) {
        let mut accepted: u64 = 0;
        let mut dropped: u64 = 0;

        while let Some(notification) = receiver.recv().await {
            source_debug!(
                Source::Device,
                "📨 Response from {} for question {}",
                notification.student_id,
                notification.question_id
            );
            if self.manager.record_response(notification).await {
                accepted += 1;
            } else {
                dropped += 1;
            }
        }

        source_info!(
            Source::Device,
            "Response collector finished: {} accepted, {} dropped",
            accepted,
            dropped
        );
    }

    pub fn spawn(self, receiver: ResponseReceiver) -> JoinHandle<()> {
        tokio::spawn(self.run(receiver))
    }
}
