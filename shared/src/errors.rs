//! Shared error types for the polling service

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },

    #[error("Unknown log source: {input}")]
    UnknownSource { input: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
