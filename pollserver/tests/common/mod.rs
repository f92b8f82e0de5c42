//! Shared support for poll server integration tests

#![allow(dead_code)]

pub mod fixtures;
pub mod helpers;
