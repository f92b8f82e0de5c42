//! Service implementations
//!
//! Device adapter implementations and the background response collector

pub mod response_collector;
pub mod simulated_adapter;

#[cfg(test)]
pub mod tests;

// Re-export service implementations
pub use response_collector::ResponseCollector;
pub use simulated_adapter::{DeviceCommand, SimulatedDeviceAdapter};
