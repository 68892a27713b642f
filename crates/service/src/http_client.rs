//! Backend HTTP client
//!
//! One client is built per context and shared by the reporter and every hook so
//! they reuse the same connection pool.

use reqwest::{
	header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT},
	Client,
};
use std::time::Duration;
use tracing::debug;
use wash_config::Settings;

use crate::error::ServiceError;

/// Default headers for every backend call
fn default_headers(settings: &Settings) -> Result<HeaderMap, ServiceError> {
	let mut headers = HeaderMap::new();
	headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
	headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
	headers.insert(
		USER_AGENT,
		HeaderValue::from_str(&settings.api.user_agent)
			.map_err(|e| ServiceError::InvalidHeader(format!("user agent: {}", e)))?,
	);

	if let Some(token) = settings.auth_token()? {
		let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
			.map_err(|_| ServiceError::InvalidHeader("authorization token".to_string()))?;
		value.set_sensitive(true);
		headers.insert(AUTHORIZATION, value);
	}

	Ok(headers)
}

/// Build the shared backend client from settings
pub fn build_client(settings: &Settings) -> Result<Client, ServiceError> {
	let headers = default_headers(settings)?;

	let client = Client::builder()
		.default_headers(headers)
		.timeout(Duration::from_millis(settings.timeouts.request_ms))
		.connect_timeout(Duration::from_millis(settings.timeouts.connect_ms))
		.build()?;

	debug!(
		"Built backend client for {} (timeout {}ms)",
		settings.api.base_url, settings.timeouts.request_ms
	);

	Ok(client)
}
