//! Poll server entry point

use clap::Parser;
use shared::{PollServerConfig, Source, logging, source_error, source_info};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use pollserver::{DeviceAdapter, PollServer, PollServerError, PollServerResult, SessionManager, SimulatedDeviceAdapter};

/// Command line arguments; each overrides the matching environment variable
#[derive(Parser, Debug)]
#[command(name = "pollserver")]
#[command(about = "Classroom response polling server")]
struct Args {
    /// Port for HTTP server
    #[arg(long)]
    port: Option<u16>,

    /// Interface address to listen on
    #[arg(long)]
    bind: Option<IpAddr>,

    /// Tracing endpoint URL (if set, traces will be sent here)
    #[arg(long)]
    trace_ep: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Capacity of the device response queue
    #[arg(long)]
    channel_capacity: Option<usize>,

    /// Let the simulated devices answer on their own at this interval
    #[arg(long)]
    simulate_interval_ms: Option<u64>,
}

impl Args {
    fn apply(&self, config: &mut PollServerConfig) {
        if let Some(ip) = self.bind {
            config.bind_address.set_ip(ip);
        }
        if let Some(port) = self.port {
            config.bind_address.set_port(port);
        }
        if let Some(capacity) = self.channel_capacity {
            config.response_channel_capacity = capacity;
        }
        if let Some(interval) = self.simulate_interval_ms {
            config.simulator.auto_respond_interval_ms = Some(interval);
        }
    }
}

#[tokio::main]
async fn main() -> PollServerResult<()> {
    let args = Args::parse();

    // Initialize tracing with optional endpoint and log level
    let trace_endpoint = args
        .trace_ep
        .as_ref()
        .map(|url| logging::TracingEndpoint::new(url.clone()));
    logging::init_tracing_with_endpoint_and_level(trace_endpoint, Some(&args.log_level));

    let mut config = PollServerConfig::from_env()?;
    args.apply(&mut config);
    config.validate()?;

    let bind_address: SocketAddr = config.bind_address;
    source_info!(
        Source::Server,
        "🌐 Poll server starting on {} (response queue {})",
        bind_address,
        config.response_channel_capacity
    );

    let adapter = Arc::new(SimulatedDeviceAdapter::new(config.simulator.clone()));
    if let Some(interval) = config.simulator.auto_respond_interval() {
        source_info!(Source::Device, "🎲 Simulated answers every {:?}", interval);
    }

    if let Err(e) = adapter.connect().await {
        source_error!(Source::Device, "❌ Could not connect to response devices: {}", e);
        return Err(PollServerError::from(e));
    }

    let (manager, responses) = SessionManager::new(adapter, config.response_channel_capacity);
    let mut server = PollServer::new(manager, responses);

    server.run(bind_address).await?;

    logging::log_success(Source::Server, "Poll server stopped gracefully");
    Ok(())
}
