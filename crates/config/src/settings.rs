//! Configuration settings structures

use crate::configurable_value::{ConfigurableValue, ConfigurableValueError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Main application settings
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
	pub api: ApiSettings,
	pub endpoints: EndpointSettings,
	pub timeouts: TimeoutSettings,
	pub logging: LoggingSettings,
}

/// Backend connection settings
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ApiSettings {
	/// Origin of the backend serving the wash endpoints
	pub base_url: String,
	/// Connected wallet address, sent as `address` when reading hook state
	pub account_address: Option<String>,
	/// Optional bearer token for the backend
	pub auth_token: Option<ConfigurableValue>,
	pub user_agent: String,
}

/// Backend paths, joined onto `api.base_url`
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct EndpointSettings {
	/// Where route execution reports are POSTed
	pub report: String,
	pub nft: String,
	pub items: String,
	pub quests: String,
	pub collection: String,
	/// Action endpoints, POSTed by mint, reveal and wash
	pub mint: String,
	pub reveal: String,
	pub wash: String,
}

/// Timeout configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TimeoutSettings {
	/// Whole-request timeout for backend calls
	pub request_ms: u64,
	pub connect_ms: u64,
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingSettings {
	pub level: String,
	pub format: LogFormat,
	pub structured: bool,
}

/// Log format options
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	Pretty,
	Compact,
}

#[derive(Debug, Error)]
pub enum ConfigValidationError {
	#[error("Invalid base URL '{url}': {reason}")]
	InvalidBaseUrl { url: String, reason: String },

	#[error("Endpoint '{name}' must be an absolute path, got '{path}'")]
	InvalidEndpoint { name: String, path: String },

	#[error("Timeout '{name}' must be greater than zero")]
	InvalidTimeout { name: String },
}

impl Default for ApiSettings {
	fn default() -> Self {
		Self {
			base_url: "http://localhost:3000".to_string(),
			account_address: None,
			auth_token: None,
			user_agent: format!("wash-reporter/{}", env!("CARGO_PKG_VERSION")),
		}
	}
}

impl Default for EndpointSettings {
	fn default() -> Self {
		Self {
			report: "/api/wash".to_string(),
			nft: "/api/wash/nft".to_string(),
			items: "/api/wash/items".to_string(),
			quests: "/api/quests".to_string(),
			collection: "/api/wash/collection".to_string(),
			mint: "/api/wash/mint".to_string(),
			reveal: "/api/wash/reveal".to_string(),
			wash: "/api/wash/use-item".to_string(),
		}
	}
}

impl Default for TimeoutSettings {
	fn default() -> Self {
		Self {
			request_ms: 10_000,
			connect_ms: 3_000,
		}
	}
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Pretty,
			structured: false,
		}
	}
}

impl EndpointSettings {
	fn named(&self) -> [(&'static str, &str); 8] {
		[
			("report", self.report.as_str()),
			("nft", self.nft.as_str()),
			("items", self.items.as_str()),
			("quests", self.quests.as_str()),
			("collection", self.collection.as_str()),
			("mint", self.mint.as_str()),
			("reveal", self.reveal.as_str()),
			("wash", self.wash.as_str()),
		]
	}
}

impl Settings {
	/// Parsed backend origin
	pub fn base_url(&self) -> Result<Url, ConfigValidationError> {
		let url =
			Url::parse(&self.api.base_url).map_err(|e| ConfigValidationError::InvalidBaseUrl {
				url: self.api.base_url.clone(),
				reason: e.to_string(),
			})?;

		if url.cannot_be_a_base() {
			return Err(ConfigValidationError::InvalidBaseUrl {
				url: self.api.base_url.clone(),
				reason: "URL cannot be used as a base".to_string(),
			});
		}

		Ok(url)
	}

	/// Absolute URL for one of the configured endpoint paths
	pub fn endpoint_url(&self, path: &str) -> Result<Url, ConfigValidationError> {
		let base = self.base_url()?;
		base.join(path)
			.map_err(|e| ConfigValidationError::InvalidBaseUrl {
				url: format!("{}{}", self.api.base_url, path),
				reason: e.to_string(),
			})
	}

	/// Resolve the bearer token, if one is configured
	pub fn auth_token(&self) -> Result<Option<String>, ConfigurableValueError> {
		self.api
			.auth_token
			.as_ref()
			.map(ConfigurableValue::resolve)
			.transpose()
	}

	/// Validate URLs, paths and timeouts
	pub fn validate(&self) -> Result<(), ConfigValidationError> {
		self.base_url()?;

		for (name, path) in self.endpoints.named() {
			if !path.starts_with('/') {
				return Err(ConfigValidationError::InvalidEndpoint {
					name: name.to_string(),
					path: path.to_string(),
				});
			}
		}

		if self.timeouts.request_ms == 0 {
			return Err(ConfigValidationError::InvalidTimeout {
				name: "request_ms".to_string(),
			});
		}
		if self.timeouts.connect_ms == 0 {
			return Err(ConfigValidationError::InvalidTimeout {
				name: "connect_ms".to_string(),
			});
		}

		Ok(())
	}
}
