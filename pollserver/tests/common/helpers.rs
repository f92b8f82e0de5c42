//! Test helper utilities for poll server integration tests

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use pollserver::{DeviceAdapter, PollServer, PollServerResult, SessionManager, SimulatedDeviceAdapter};

/// A poll server running on an ephemeral local port
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    pub manager: SessionManager<SimulatedDeviceAdapter>,
    pub shutdown: mpsc::Sender<()>,
    pub handle: JoinHandle<PollServerResult<()>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn adapter(&self) -> &Arc<SimulatedDeviceAdapter> {
        self.manager.adapter()
    }

    pub async fn post(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("request should reach the server")
    }

    pub async fn post_empty(&self, path: &str) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .send()
            .await
            .expect("request should reach the server")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("request should reach the server")
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> T {
        self.get(path).await.json().await.expect("response should be JSON")
    }

    /// Request shutdown and wait for the server task to finish
    pub async fn stop(self) -> PollServerResult<()> {
        self.shutdown.send(()).await.expect("server should be listening for shutdown");
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server should shut down gracefully")
            .expect("server task should not panic")
    }
}

/// Start a poll server with a connected simulated device
pub async fn spawn_test_server() -> TestServer {
    let adapter = Arc::new(SimulatedDeviceAdapter::default());
    adapter.connect().await.expect("simulated device should connect");

    let (manager, responses) = SessionManager::new(adapter, 64);
    let mut server = PollServer::new(manager.clone(), responses);
    let shutdown = server.get_shutdown_sender();

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("ephemeral port should bind");
    let addr = listener.local_addr().expect("bound listener has an address");
    let handle = tokio::spawn(async move { server.run_with_listener(listener).await });

    TestServer {
        addr,
        client: reqwest::Client::new(),
        manager,
        shutdown,
        handle,
    }
}

/// Wait until the session has processed `count` notifications, accepted or dropped
pub async fn wait_for_processed(manager: &SessionManager<SimulatedDeviceAdapter>, count: u64) -> bool {
    wait_for_condition(
        move || async move {
            let status = manager.status().await;
            status.response_count as u64 + status.dropped_responses >= count
        },
        5000,
    )
    .await
}

/// Helper to wait for async conditions with timeout
pub async fn wait_for_condition<F, Fut>(mut condition: F, timeout_ms: u64) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let start = std::time::Instant::now();
    let timeout = Duration::from_millis(timeout_ms);

    loop {
        if condition().await {
            return true;
        }

        if start.elapsed() > timeout {
            return false;
        }

        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
