//! Service tests for the poll server
//!
//! Session manager behaviour against a mocked device adapter, plus the
//! simulated adapter and the response collector.

pub mod helpers;
