//! HTTP-backed read-state hooks
//!
//! Each [`RemoteResource`] caches the last value fetched from one backend
//! endpoint together with its loading flag and last error. Refetches may
//! overlap; whichever resolves last wins.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use url::Url;
use wash_config::Settings;
use wash_types::{HookError, HookResult, HookState, Refetch};

use crate::error::ServiceError;

/// Counts one outstanding request; released when dropped, including when the
/// owning future is cancelled mid-request
pub(crate) struct PendingGuard<'a>(&'a AtomicUsize);

impl<'a> PendingGuard<'a> {
	pub(crate) fn acquire(pending: &'a AtomicUsize) -> Self {
		pending.fetch_add(1, Ordering::SeqCst);
		Self(pending)
	}
}

impl Drop for PendingGuard<'_> {
	fn drop(&mut self) {
		self.0.fetch_sub(1, Ordering::SeqCst);
	}
}

/// Cached read-state for one backend resource
pub struct RemoteResource<T> {
	name: String,
	client: Client,
	url: Url,
	state: Arc<RwLock<HookState<T>>>,
	pending: AtomicUsize,
}

impl<T> RemoteResource<T>
where
	T: DeserializeOwned + Clone + Send + Sync + 'static,
{
	pub fn new(name: impl Into<String>, client: Client, url: Url) -> Self {
		Self {
			name: name.into(),
			client,
			url,
			state: Arc::new(RwLock::new(HookState::default())),
			pending: AtomicUsize::new(0),
		}
	}

	/// Resource at `path` on the configured backend, scoped to the configured account
	pub fn from_settings(
		name: impl Into<String>,
		client: Client,
		settings: &Settings,
		path: &str,
	) -> Result<Self, ServiceError> {
		let mut url = settings.endpoint_url(path)?;
		if let Some(address) = &settings.api.account_address {
			url.query_pairs_mut().append_pair("address", address);
		}
		Ok(Self::new(name, client, url))
	}

	pub fn url(&self) -> &Url {
		&self.url
	}

	/// Current loading flag, data and error
	///
	/// The loading flag is true while at least one refetch is outstanding.
	pub async fn snapshot(&self) -> HookState<T> {
		let mut state = self.state.read().await.clone();
		state.is_loading = self.is_loading();
		state
	}

	pub fn is_loading(&self) -> bool {
		self.pending.load(Ordering::SeqCst) > 0
	}

	/// Last fetched data, if any
	pub async fn data(&self) -> Option<T> {
		self.state.read().await.data.clone()
	}

	async fn fetch(&self) -> HookResult<T> {
		let response = self.client.get(self.url.clone()).send().await?;

		let status = response.status();
		if !status.is_success() {
			return Err(HookError::HttpStatus {
				resource: self.name.clone(),
				status_code: status.as_u16(),
			});
		}

		response
			.json::<T>()
			.await
			.map_err(|e| HookError::InvalidResponse {
				resource: self.name.clone(),
				reason: e.to_string(),
			})
	}

	async fn settle(&self, result: &HookResult<T>) {
		let mut state = self.state.write().await;
		match result {
			Ok(data) => {
				state.data = Some(data.clone());
				state.error = None;
			},
			// Keep the previous data so the view does not flash empty
			Err(error) => state.error = Some(error.to_string()),
		}
	}
}

#[async_trait]
impl<T> Refetch for RemoteResource<T>
where
	T: DeserializeOwned + Clone + Send + Sync + 'static,
{
	fn resource(&self) -> &str {
		&self.name
	}

	async fn refetch(&self) -> HookResult<()> {
		let result = {
			let _pending = PendingGuard::acquire(&self.pending);
			let result = self.fetch().await;
			self.settle(&result).await;
			result
		};

		match result {
			Ok(_) => {
				debug!("Refetched {}", self.name);
				Ok(())
			},
			Err(error) => {
				warn!("Failed to refetch {}: {}", self.name, error);
				Err(error)
			},
		}
	}
}

impl<T> fmt::Debug for RemoteResource<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RemoteResource")
			.field("name", &self.name)
			.field("url", &self.url.as_str())
			.field("pending", &self.pending.load(Ordering::Relaxed))
			.finish()
	}
}
