//! Core shared types and identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::SharedError;

/// Execution path that produced a log event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    /// Process lifecycle: startup, shutdown, teardown
    Server,
    /// Inbound HTTP request handling
    Http,
    /// Session state machine transitions
    Session,
    /// Device adapter commands and response notifications
    Device,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Server => write!(f, "server"),
            Source::Http => write!(f, "http"),
            Source::Session => write!(f, "session"),
            Source::Device => write!(f, "device"),
        }
    }
}

impl std::str::FromStr for Source {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "server" => Ok(Source::Server),
            "http" => Ok(Source::Http),
            "session" => Ok(Source::Session),
            "device" => Ok(Source::Device),
            _ => Err(SharedError::UnknownSource { input: s.to_string() }),
        }
    }
}
