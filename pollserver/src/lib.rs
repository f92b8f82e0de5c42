//! Classroom polling server
//!
//! Configures a class roster, opens one question at a time to the students'
//! response devices, collects their answers and serves the results to a
//! browser front-end over HTTP.

pub mod core;
pub mod error;
pub mod pollserver_impl;
pub mod services;
pub mod session_manager;
pub mod traits;
pub mod types;
pub mod web;

// Re-export main types
pub use error::{AdapterError, PollServerError, PollServerResult, ValidationError};
pub use pollserver_impl::PollServer;
pub use session_manager::SessionManager;
pub use types::*;

// Re-export trait definitions
pub use traits::DeviceAdapter;

// Re-export service implementations
pub use services::{DeviceCommand, ResponseCollector, SimulatedDeviceAdapter};
