//! Test helpers for poll server service tests

use std::sync::Arc;

use crate::error::AdapterError;
use crate::session_manager::SessionManager;
use crate::traits::{DeviceAdapter, MockDeviceAdapter};
use crate::types::ResponseReceiver;

/// Mock adapter that accepts every command
pub fn create_permissive_mock() -> MockDeviceAdapter {
    let mut mock = MockDeviceAdapter::new();
    mock.expect_connect().returning(|| Ok(()));
    mock.expect_disconnect().returning(|| Ok(()));
    mock.expect_is_connected().returning(|| true);
    mock.expect_start_class().returning(|_| Ok(()));
    mock.expect_stop_class().returning(|| Ok(()));
    mock.expect_start_question().returning(|_| Ok(()));
    mock.expect_stop_question().returning(|| Ok(()));
    mock.expect_subscribe_responses().returning(|_| Ok(()));
    mock
}

pub fn command_failure(command: &str) -> AdapterError {
    AdapterError::command(command, "device did not acknowledge")
}

/// Manager over `adapter` with a small notification queue
pub fn create_test_manager<D: DeviceAdapter + 'static>(adapter: D) -> (SessionManager<D>, ResponseReceiver) {
    SessionManager::new(Arc::new(adapter), 16)
}

/// Test helper to wait for async operations
pub async fn wait_for_condition<F, Fut>(mut condition: F, timeout_ms: u64) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);

    loop {
        if condition().await {
            return true;
        }

        if start.elapsed() > timeout {
            return false;
        }

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
}
