//! Read-state hook contract
//!
//! Dependent state (NFT status, inventory, quests, collection) is owned by
//! independent services. The reporting coordinator only needs to ask them to
//! refresh, which is what [`Refetch`] captures.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Snapshot of a hook's read-state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookState<T> {
	pub is_loading: bool,
	pub data: Option<T>,
	pub error: Option<String>,
}

impl<T> Default for HookState<T> {
	fn default() -> Self {
		Self {
			is_loading: false,
			data: None,
			error: None,
		}
	}
}

/// Snapshot of an action hook (mint, reveal, wash)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionState {
	pub in_progress: bool,
	/// Last status reported for the action; empty until it first runs
	pub status: String,
	pub error: Option<String>,
}

/// Errors raised while refreshing a hook or running an action
#[derive(Debug, Error)]
pub enum HookError {
	#[error("HTTP request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("HTTP {status_code} from {resource}")]
	HttpStatus { resource: String, status_code: u16 },

	#[error("Invalid response for {resource}: {reason}")]
	InvalidResponse { resource: String, reason: String },
}

pub type HookResult<T> = Result<T, HookError>;

/// Anything whose cached read-state can be refreshed on demand
///
/// `refetch` is idempotent and resolves once fresh data is available.
/// Concurrent calls are allowed; the last one to resolve wins.
#[async_trait]
pub trait Refetch: Send + Sync {
	/// Short name used in logs
	fn resource(&self) -> &str;

	async fn refetch(&self) -> HookResult<()>;
}
