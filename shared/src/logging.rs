//! Shared logging utilities: subscriber setup, source-tagged macros and an
//! optional remote trace sink

use crate::types::Source;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber, error, info};
use tracing_subscriber::layer::Context;

/// Remote trace endpoint configuration
#[derive(Debug, Clone)]
pub struct TracingEndpoint {
    pub url: String,
    pub batch_size: usize,
    pub flush_interval: Duration,
}

impl TracingEndpoint {
    pub fn new(url: String) -> Self {
        Self {
            url,
            batch_size: 5,
            flush_interval: Duration::from_millis(500),
        }
    }
}

/// One source-tagged log line as posted to the trace endpoint
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TraceEvent {
    pub source: String,
    pub level: String,
    pub message: String,
    pub logged_at: String,
    pub received_at: DateTime<Utc>,
}

/// Forwards events carrying a `source` field to the trace endpoint.
/// Untagged events (axum, tower-http) stay local.
pub struct HttpTracingLayer {
    sender: mpsc::UnboundedSender<TraceEvent>,
}

impl HttpTracingLayer {
    /// Must be called inside a tokio runtime
    pub fn new(endpoint: TracingEndpoint) -> Self {
        let (sender, events) = mpsc::unbounded_channel();
        tokio::spawn(forward_batches(endpoint, events));
        Self { sender }
    }
}

impl<S> tracing_subscriber::Layer<S> for HttpTracingLayer
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = SourceFields::default();
        event.record(&mut fields);

        let Some(source) = fields.source else {
            return;
        };
        let _ = self.sender.send(TraceEvent {
            source,
            level: event.metadata().level().to_string(),
            message: fields.message,
            logged_at: fields.timestamp.unwrap_or_else(format_timestamp),
            received_at: Utc::now(),
        });
    }
}

/// The three fields the `source_*!` macros attach; anything else is ignored
#[derive(Default)]
struct SourceFields {
    source: Option<String>,
    timestamp: Option<String>,
    message: String,
}

impl SourceFields {
    fn set(&mut self, name: &str, value: String) {
        match name {
            "source" => self.source = Some(value),
            "timestamp" => self.timestamp = Some(value),
            "message" => self.message = value,
            _ => {}
        }
    }
}

impl Visit for SourceFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.set(field.name(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.set(field.name(), format!("{value:?}"));
    }
}

async fn forward_batches(endpoint: TracingEndpoint, mut events: mpsc::UnboundedReceiver<TraceEvent>) {
    let client = reqwest::Client::new();
    let mut pending = Vec::with_capacity(endpoint.batch_size);
    let mut ticker = tokio::time::interval(endpoint.flush_interval);

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                pending.push(event);
                if pending.len() < endpoint.batch_size {
                    continue;
                }
            }
            _ = ticker.tick() => {}
        }
        post_batch(&client, &endpoint.url, &mut pending).await;
    }
    post_batch(&client, &endpoint.url, &mut pending).await;
}

async fn post_batch(client: &reqwest::Client, url: &str, pending: &mut Vec<TraceEvent>) {
    if pending.is_empty() {
        return;
    }
    let batch = std::mem::take(pending);

    // stderr: logging through tracing here would feed back into this layer
    match client.post(url).json(&batch).send().await {
        Ok(response) if !response.status().is_success() => {
            eprintln!("❌ Trace endpoint rejected {} events: HTTP {}", batch.len(), response.status());
        }
        Ok(_) => {}
        Err(e) => eprintln!("❌ Trace endpoint unreachable: {e}"),
    }
}

/// Filter directives for the service crates at the given base level
pub fn filter_directives(log_level: Option<&str>) -> String {
    let base_level = log_level.unwrap_or("info");
    format!("pollserver={base_level},shared={base_level},tower_http=debug,axum={base_level}")
}

/// Initialize tracing with an optional remote endpoint and log level
pub fn init_tracing_with_endpoint_and_level(endpoint: Option<TracingEndpoint>, log_level: Option<&str>) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let directives = filter_directives(log_level);

    match endpoint {
        Some(endpoint) => {
            println!("📡 Tracing endpoint configured: {}", endpoint.url);
            println!("📊 Log level: {directives}");

            let http_layer = HttpTracingLayer::new(endpoint);
            let fmt_layer = fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact();

            tracing_subscriber::registry()
                .with(EnvFilter::new(&directives))
                .with(http_layer)
                .with(fmt_layer)
                .init();
        }
        None => {
            println!("📊 Log level: {directives}");
            fmt()
                .with_env_filter(EnvFilter::new(&directives))
                .with_target(false)
                .with_thread_ids(true)
                .with_file(false)
                .with_line_number(false)
                .init();
        }
    }
}

/// Timestamp format shared by all source-tagged events
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Source-tagged info logging
#[macro_export]
macro_rules! source_info {
    ($source:expr, $($arg:tt)*) => {
        tracing::info!(
            source = %$source,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Source-tagged warning logging
#[macro_export]
macro_rules! source_warn {
    ($source:expr, $($arg:tt)*) => {
        tracing::warn!(
            source = %$source,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Source-tagged error logging
#[macro_export]
macro_rules! source_error {
    ($source:expr, $($arg:tt)*) => {
        tracing::error!(
            source = %$source,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Source-tagged debug logging
#[macro_export]
macro_rules! source_debug {
    ($source:expr, $($arg:tt)*) => {
        tracing::debug!(
            source = %$source,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

pub fn log_startup(source: Source, details: &str) {
    info!(source = %source, timestamp = format_timestamp(), "🚀 Starting {}", details);
}

pub fn log_shutdown(source: Source, reason: &str) {
    info!(source = %source, timestamp = format_timestamp(), "🛑 Shutting down: {}", reason);
}

pub fn log_error(source: Source, context: &str, error: &dyn std::fmt::Display) {
    error!(
        source = %source,
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}

pub fn log_success(source: Source, message: &str) {
    info!(source = %source, timestamp = format_timestamp(), "✅ {}", message);
}
