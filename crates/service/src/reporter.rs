//! HTTP wash reporter
//!
//! Sends one `POST` per report to the backend's wash endpoint. The response
//! body is ignored; only the status matters.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;
use wash_config::Settings;
use wash_types::{ReportError, ReportPayload, ReportResult, WashReporter};

use crate::error::ServiceError;

#[derive(Debug, Clone)]
pub struct HttpWashReporter {
	client: Client,
	endpoint: Url,
}

impl HttpWashReporter {
	pub fn new(client: Client, endpoint: Url) -> Self {
		Self { client, endpoint }
	}

	/// Reporter posting to `endpoints.report` on the configured backend
	pub fn from_settings(client: Client, settings: &Settings) -> Result<Self, ServiceError> {
		let endpoint = settings.endpoint_url(&settings.endpoints.report)?;
		Ok(Self::new(client, endpoint))
	}

	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}
}

#[async_trait]
impl WashReporter for HttpWashReporter {
	async fn report(&self, payload: &ReportPayload) -> ReportResult<()> {
		debug!(
			"Posting wash report for route {} (tx {}) to {}",
			payload.id, payload.tx_hash, self.endpoint
		);

		let response = self
			.client
			.post(self.endpoint.clone())
			.json(payload)
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			return Err(ReportError::HttpStatus {
				status_code: status.as_u16(),
			});
		}

		debug!("Wash report for route {} accepted ({})", payload.id, status);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_endpoint_from_settings() {
		let mut settings = Settings::default();
		settings.api.base_url = "https://jumper.example/".to_string();

		let reporter = HttpWashReporter::from_settings(Client::new(), &settings).unwrap();
		assert_eq!(reporter.endpoint().as_str(), "https://jumper.example/api/wash");
	}

	#[tokio::test]
	async fn test_unreachable_backend_is_an_error() {
		// Port 9 (discard) on localhost is not expected to accept HTTP.
		let endpoint = Url::parse("http://127.0.0.1:9/api/wash").unwrap();
		let reporter = HttpWashReporter::new(Client::new(), endpoint);
		let payload = ReportPayload::from_route(&wash_types::Route::default(), "0xabc");

		let result = reporter.report(&payload).await;
		assert!(matches!(result, Err(ReportError::Http(_))));
	}
}
