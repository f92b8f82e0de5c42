//! Request handlers

pub mod api;
