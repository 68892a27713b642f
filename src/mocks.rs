//! Mock reporters and fixtures for demos and testing
//!
//! Lets the reporter be exercised without a wash backend.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use wash_types::{
	Process, ReportError, ReportPayload, ReportResult, Route, RouteExecutionEvent,
	RouteExecutionUpdate, Step, Token, WashReporter,
};

/// Reporter that keeps every payload it receives
#[derive(Debug, Default)]
pub struct RecordingReporter {
	reports: Mutex<Vec<ReportPayload>>,
	calls: AtomicUsize,
	fail_with_status: Option<u16>,
}

impl RecordingReporter {
	pub fn new() -> Self {
		Self::default()
	}

	/// Reporter that records payloads but answers every call with `status`
	pub fn failing(status: u16) -> Self {
		Self {
			fail_with_status: Some(status),
			..Default::default()
		}
	}

	pub async fn reports(&self) -> Vec<ReportPayload> {
		self.reports.lock().await.clone()
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl WashReporter for RecordingReporter {
	async fn report(&self, payload: &ReportPayload) -> ReportResult<()> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		self.reports.lock().await.push(payload.clone());

		match self.fail_with_status {
			Some(status_code) => Err(ReportError::HttpStatus { status_code }),
			None => Ok(()),
		}
	}
}

/// Ethereum to Optimism route whose first step was broadcast as `tx_hash`
pub fn mock_route(id: &str, tx_hash: Option<&str>) -> Route {
	let process = match tx_hash {
		Some(hash) => Process::broadcast(hash),
		None => Process::default(),
	};

	Route {
		id: id.to_string(),
		from_address: Some("0xA".to_string()),
		from_token: Some(Token::new("0x0000000000000000000000000000000000000000", 1, "ETH", 18)),
		from_amount: Some("100".to_string()),
		from_amount_usd: Some("100.00".to_string()),
		from_chain_id: Some(1),
		to_address: Some("0xB".to_string()),
		to_token: Some(Token::new("0x0000000000000000000000000000000000000000", 10, "ETH", 18)),
		to_amount: Some("95".to_string()),
		to_amount_usd: Some("95.00".to_string()),
		to_chain_id: Some(10),
		steps: vec![Step::with_processes(vec![process])],
	}
}

pub fn mock_completed_event(id: &str, tx_hash: Option<&str>) -> RouteExecutionEvent {
	RouteExecutionEvent::Completed(mock_route(id, tx_hash))
}

pub fn mock_failed_event(id: &str, tx_hash: Option<&str>) -> RouteExecutionEvent {
	let process = match tx_hash {
		Some(hash) => Process::broadcast(hash),
		None => Process::default(),
	};
	RouteExecutionEvent::Failed(RouteExecutionUpdate::new(mock_route(id, None), process))
}
