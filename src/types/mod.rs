// src/types/mod.rs
use thiserror::Error;

mod domain_types;

pub use domain_types::*;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid request rate {rate}: {reason}")]
    InvalidRate { rate: f64, reason: String },

    #[error("Invalid page size {0}: must be greater than zero")]
    InvalidPageSize(u32),

    #[error("Invalid value '{value}' for parameter '{key}'")]
    InvalidParameter { key: String, value: String },

    #[error("Parameter '{0}' is managed by the paginator and must not be set by the caller")]
    ReservedParameter(String),

    #[error("Identifier field '{key}' holds a {found}, which has no decimal string form")]
    UnstringifiableId { key: String, found: &'static str },

    #[error("Invalid access token format: {reason}")]
    InvalidAccessToken { reason: String },

    #[error("Empty required field: {0}")]
    EmptyField(&'static str),

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },
}
