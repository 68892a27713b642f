//! Wash report payload and reporter contract

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

use crate::events::RouteExecutionEvent;
use crate::routes::{Route, Token};

/// Normalized record persisted by the backend for each qualifying route execution
///
/// Route fields the widget left out are omitted from the body, never zeroed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPayload {
	pub id: String,
	#[serde(rename = "txHash")]
	pub tx_hash: String,
	#[serde(rename = "fromAddress", default, skip_serializing_if = "Option::is_none")]
	pub from_address: Option<String>,
	#[serde(rename = "fromToken", default, skip_serializing_if = "Option::is_none")]
	pub from_token: Option<Token>,
	#[serde(rename = "fromAmount", default, skip_serializing_if = "Option::is_none")]
	pub from_amount: Option<String>,
	#[serde(rename = "fromAmountUSD", default, skip_serializing_if = "Option::is_none")]
	pub from_amount_usd: Option<String>,
	#[serde(rename = "fromChainID", default, skip_serializing_if = "Option::is_none")]
	pub from_chain_id: Option<u64>,
	#[serde(rename = "toAddress", default, skip_serializing_if = "Option::is_none")]
	pub to_address: Option<String>,
	#[serde(rename = "toToken", default, skip_serializing_if = "Option::is_none")]
	pub to_token: Option<Token>,
	#[serde(rename = "toAmount", default, skip_serializing_if = "Option::is_none")]
	pub to_amount: Option<String>,
	#[serde(rename = "toAmountUSD", default, skip_serializing_if = "Option::is_none")]
	pub to_amount_usd: Option<String>,
	#[serde(rename = "toChainID", default, skip_serializing_if = "Option::is_none")]
	pub to_chain_id: Option<u64>,
}

impl ReportPayload {
	/// Build a payload from a route and the transaction hash that qualified it
	pub fn from_route(route: &Route, tx_hash: impl Into<String>) -> Self {
		Self {
			id: route.id.clone(),
			tx_hash: tx_hash.into(),
			from_address: route.from_address.clone(),
			from_token: route.from_token.clone(),
			from_amount: route.from_amount.clone(),
			from_amount_usd: route.from_amount_usd.clone(),
			from_chain_id: route.from_chain_id,
			to_address: route.to_address.clone(),
			to_token: route.to_token.clone(),
			to_amount: route.to_amount.clone(),
			to_amount_usd: route.to_amount_usd.clone(),
			to_chain_id: route.to_chain_id,
		}
	}

	/// Payload for an event, or `None` when no transaction hash is resolvable
	pub fn from_event(event: &RouteExecutionEvent) -> Option<Self> {
		let tx_hash = event.transaction_hash()?;
		Some(Self::from_route(event.route(), tx_hash))
	}
}

/// Errors raised while sending a report
#[derive(Debug, Error)]
pub enum ReportError {
	#[error("HTTP request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("HTTP {status_code}: report rejected by backend")]
	HttpStatus { status_code: u16 },
}

impl ReportError {
	/// HTTP status code of the failure, if the backend answered
	pub fn status_code(&self) -> Option<u16> {
		match self {
			ReportError::HttpStatus { status_code } => Some(*status_code),
			ReportError::Http(error) => error.status().map(|status| status.as_u16()),
		}
	}
}

pub type ReportResult<T> = Result<T, ReportError>;

/// Sink for wash reports
///
/// Implementations send one report per call and never retry; callers decide
/// what to do with failures.
#[async_trait]
pub trait WashReporter: Send + Sync + Debug {
	async fn report(&self, payload: &ReportPayload) -> ReportResult<()>;
}
