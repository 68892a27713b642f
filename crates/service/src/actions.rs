//! Action hooks
//!
//! Mint, reveal and wash each POST to the backend and, once the backend
//! accepts, refresh the read-state hooks the action changes.

use futures::future::join_all;
use reqwest::Client;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;
use wash_config::Settings;
use wash_types::{ActionRequest, ActionResponse, ActionState, HookError, HookResult, Refetch};

use crate::error::ServiceError;
use crate::hooks::PendingGuard;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_DONE: &str = "done";
pub const STATUS_FAILED: &str = "failed";
pub const STATUS_CANCELLED: &str = "cancelled";

/// Backend action that refreshes its dependent hooks on success
pub struct RemoteAction {
	name: String,
	client: Client,
	url: Url,
	account: Option<String>,
	dependents: Vec<Arc<dyn Refetch>>,
	state: RwLock<ActionState>,
	running: AtomicUsize,
}

impl RemoteAction {
	pub fn new(
		name: impl Into<String>,
		client: Client,
		url: Url,
		account: Option<String>,
		dependents: Vec<Arc<dyn Refetch>>,
	) -> Self {
		Self {
			name: name.into(),
			client,
			url,
			account,
			dependents,
			state: RwLock::new(ActionState::default()),
			running: AtomicUsize::new(0),
		}
	}

	/// Action at `path` on the configured backend, on behalf of the configured account
	pub fn from_settings(
		name: impl Into<String>,
		client: Client,
		settings: &Settings,
		path: &str,
		dependents: Vec<Arc<dyn Refetch>>,
	) -> Result<Self, ServiceError> {
		let url = settings.endpoint_url(path)?;
		Ok(Self::new(
			name,
			client,
			url,
			settings.api.account_address.clone(),
			dependents,
		))
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn url(&self) -> &Url {
		&self.url
	}

	/// Names of the hooks refreshed after a successful run
	pub fn dependents(&self) -> Vec<&str> {
		self.dependents.iter().map(|hook| hook.resource()).collect()
	}

	pub fn is_in_progress(&self) -> bool {
		self.running.load(Ordering::SeqCst) > 0
	}

	/// Current progress flag, status and error
	pub async fn state(&self) -> ActionState {
		let mut state = self.state.read().await.clone();
		state.in_progress = self.is_in_progress();
		if !state.in_progress && state.status == STATUS_PENDING {
			state.status = STATUS_CANCELLED.to_string();
		}
		state
	}

	/// Run the action once, returning the status reported by the backend
	///
	/// Dependent hooks are refetched only when the backend accepts the action.
	/// Their failures are recorded by the hooks themselves.
	pub async fn perform(&self, item_id: Option<String>) -> HookResult<String> {
		let _running = PendingGuard::acquire(&self.running);
		{
			let mut state = self.state.write().await;
			state.status = STATUS_PENDING.to_string();
			state.error = None;
		}

		let request = ActionRequest {
			address: self.account.clone(),
			item_id,
		};

		match self.post(&request).await {
			Ok(response) => {
				let status = response
					.status
					.filter(|status| !status.is_empty())
					.unwrap_or_else(|| STATUS_DONE.to_string());
				self.state.write().await.status = status.clone();
				info!("{} accepted with status {}", self.name, status);

				self.refetch_dependents().await;
				Ok(status)
			},
			Err(error) => {
				{
					let mut state = self.state.write().await;
					state.status = STATUS_FAILED.to_string();
					state.error = Some(error.to_string());
				}
				warn!("{} failed: {}", self.name, error);
				Err(error)
			},
		}
	}

	async fn post(&self, request: &ActionRequest) -> HookResult<ActionResponse> {
		let response = self
			.client
			.post(self.url.clone())
			.json(request)
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			return Err(HookError::HttpStatus {
				resource: self.name.clone(),
				status_code: status.as_u16(),
			});
		}

		// The body is optional; only its status string is read
		match response.json::<ActionResponse>().await {
			Ok(body) => Ok(body),
			Err(error) => {
				debug!("{} response has no readable body: {}", self.name, error);
				Ok(ActionResponse::default())
			},
		}
	}

	async fn refetch_dependents(&self) {
		let results = join_all(self.dependents.iter().map(|hook| hook.refetch())).await;
		for (hook, result) in self.dependents.iter().zip(results) {
			if let Err(error) = result {
				debug!("Refetch of {} after {} failed: {}", hook.resource(), self.name, error);
			}
		}
	}
}

impl fmt::Debug for RemoteAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RemoteAction")
			.field("name", &self.name)
			.field("url", &self.url.as_str())
			.field("dependents", &self.dependents())
			.field("running", &self.running.load(Ordering::Relaxed))
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;

	#[derive(Default)]
	struct CountingRefetch {
		name: &'static str,
		calls: AtomicUsize,
	}

	#[async_trait]
	impl Refetch for CountingRefetch {
		fn resource(&self) -> &str {
			self.name
		}

		async fn refetch(&self) -> HookResult<()> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			Ok(())
		}
	}

	fn counting(name: &'static str) -> Arc<CountingRefetch> {
		Arc::new(CountingRefetch {
			name,
			calls: AtomicUsize::new(0),
		})
	}

	#[test]
	fn test_action_url_from_settings() {
		let settings = Settings::default();
		let nft = counting("nft");

		let mint = RemoteAction::from_settings(
			"mint",
			Client::new(),
			&settings,
			&settings.endpoints.mint,
			vec![nft as Arc<dyn Refetch>],
		)
		.unwrap();

		assert_eq!(mint.url().as_str(), "http://localhost:3000/api/wash/mint");
		assert_eq!(mint.dependents(), vec!["nft"]);
	}

	#[tokio::test]
	async fn test_rejected_action_skips_dependents() {
		let nft = counting("nft");
		let items = counting("items");
		let url = Url::parse("http://127.0.0.1:9/api/wash/use-item").unwrap();
		let wash = RemoteAction::new(
			"wash",
			Client::new(),
			url,
			None,
			vec![
				Arc::clone(&items) as Arc<dyn Refetch>,
				Arc::clone(&nft) as Arc<dyn Refetch>,
			],
		);

		assert!(wash.perform(Some("soap".to_string())).await.is_err());

		let state = wash.state().await;
		assert!(!state.in_progress);
		assert_eq!(state.status, STATUS_FAILED);
		assert!(state.error.is_some());
		assert_eq!(nft.calls.load(Ordering::SeqCst), 0);
		assert_eq!(items.calls.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn test_cancelled_action_is_not_left_in_progress() {
		// Accepts connections but never answers
		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		let server = tokio::spawn(async move {
			let mut held = Vec::new();
			while let Ok((socket, _)) = listener.accept().await {
				held.push(socket);
			}
		});

		let url = Url::parse(&format!("http://{}/api/wash/reveal", addr)).unwrap();
		let reveal = RemoteAction::new("reveal", Client::new(), url, None, Vec::new());

		let timed_out =
			tokio::time::timeout(std::time::Duration::from_millis(100), reveal.perform(None)).await;
		assert!(timed_out.is_err());

		let state = reveal.state().await;
		assert!(!state.in_progress);
		assert_eq!(state.status, STATUS_CANCELLED);

		server.abort();
	}

	#[tokio::test]
	async fn test_initial_state_is_idle() {
		let url = Url::parse("http://127.0.0.1:9/api/wash/mint").unwrap();
		let mint = RemoteAction::new("mint", Client::new(), url, None, Vec::new());
		assert_eq!(mint.state().await, ActionState::default());
	}
}
