//! Service construction errors

use thiserror::Error;
use wash_config::{ConfigValidationError, ConfigurableValueError};

#[derive(Debug, Error)]
pub enum ServiceError {
	#[error("configuration error: {0}")]
	Config(#[from] ConfigValidationError),
	#[error("credential error: {0}")]
	Credential(#[from] ConfigurableValueError),
	#[error("invalid header value: {0}")]
	InvalidHeader(String),
	#[error("HTTP client error: {0}")]
	HttpClient(#[from] reqwest::Error),
	#[error("no async runtime available: {0}")]
	Runtime(String),
}
