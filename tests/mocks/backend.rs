//! In-process wash backend for integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
	extract::State,
	http::StatusCode,
	routing::{get, post},
	Json, Router,
};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use wash_reporter::serde_json::{json, Value};
use wash_reporter::Settings;

#[derive(Default)]
struct BackendState {
	reports: Mutex<Vec<Value>>,
	report_status: AtomicU16,
	nft_hits: AtomicUsize,
	items_hits: AtomicUsize,
	quests_hits: AtomicUsize,
	collection_hits: AtomicUsize,
	actions: Mutex<Vec<(&'static str, Value)>>,
}

/// Wash backend recording every report and counting hook reads
pub struct MockBackend {
	pub base_url: String,
	state: Arc<BackendState>,
	handle: JoinHandle<()>,
}

async fn record_report(
	State(state): State<Arc<BackendState>>,
	Json(body): Json<Value>,
) -> StatusCode {
	state.reports.lock().await.push(body);
	StatusCode::from_u16(state.report_status.load(Ordering::SeqCst)).unwrap_or(StatusCode::OK)
}

async fn nft(State(state): State<Arc<BackendState>>) -> Json<Value> {
	let hits = state.nft_hits.fetch_add(1, Ordering::SeqCst) + 1;
	Json(json!({
		"hasNft": true,
		"nft": { "id": "1", "progress": (hits * 10).min(100), "color": "pink" }
	}))
}

async fn items(State(state): State<Arc<BackendState>>) -> Json<Value> {
	state.items_hits.fetch_add(1, Ordering::SeqCst);
	Json(json!([{ "id": "soap", "name": "Soap", "amount": 2 }]))
}

async fn quests(State(state): State<Arc<BackendState>>) -> Json<Value> {
	state.quests_hits.fetch_add(1, Ordering::SeqCst);
	Json(json!([{ "id": "q1", "title": "Wash 3 times", "progress": 1, "target": 3 }]))
}

async fn collection(State(state): State<Arc<BackendState>>) -> Json<Value> {
	state.collection_hits.fetch_add(1, Ordering::SeqCst);
	Json(json!({ "name": "Wash Pepes", "minted": 420, "revealed": 69 }))
}

async fn mint(State(state): State<Arc<BackendState>>, Json(body): Json<Value>) -> Json<Value> {
	state.actions.lock().await.push(("mint", body));
	Json(json!({ "status": "minted" }))
}

async fn reveal(State(state): State<Arc<BackendState>>, Json(body): Json<Value>) -> Json<Value> {
	state.actions.lock().await.push(("reveal", body));
	Json(json!({ "status": "revealed" }))
}

// Answers with an empty body
async fn use_item(State(state): State<Arc<BackendState>>, Json(body): Json<Value>) -> StatusCode {
	state.actions.lock().await.push(("wash", body));
	StatusCode::OK
}

impl MockBackend {
	/// Spawn a backend answering reports with 200
	pub async fn spawn() -> Self {
		let state = Arc::new(BackendState {
			report_status: AtomicU16::new(200),
			..Default::default()
		});

		let app = Router::new()
			.route("/api/wash", post(record_report))
			.route("/api/wash/nft", get(nft))
			.route("/api/wash/items", get(items))
			.route("/api/quests", get(quests))
			.route("/api/wash/collection", get(collection))
			.route("/api/wash/mint", post(mint))
			.route("/api/wash/reveal", post(reveal))
			.route("/api/wash/use-item", post(use_item))
			.with_state(Arc::clone(&state));

		let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
			.await
			.expect("bind test port");
		let addr = listener.local_addr().unwrap();
		let base_url = format!("http://{}:{}", addr.ip(), addr.port());

		let handle = tokio::spawn(async move {
			let _ = axum::serve(listener, app).await;
		});

		Self {
			base_url,
			state,
			handle,
		}
	}

	/// Settings pointing every endpoint at this backend
	pub fn settings(&self) -> Settings {
		let mut settings = Settings::default();
		settings.api.base_url = self.base_url.clone();
		settings.api.account_address = Some("0xA".to_string());
		settings
	}

	/// Make subsequent reports fail with `status`
	pub fn reject_reports_with(&self, status: u16) {
		self.state.report_status.store(status, Ordering::SeqCst);
	}

	pub async fn reports(&self) -> Vec<Value> {
		self.state.reports.lock().await.clone()
	}

	pub fn nft_hits(&self) -> usize {
		self.state.nft_hits.load(Ordering::SeqCst)
	}

	pub fn items_hits(&self) -> usize {
		self.state.items_hits.load(Ordering::SeqCst)
	}

	pub fn quests_hits(&self) -> usize {
		self.state.quests_hits.load(Ordering::SeqCst)
	}

	pub fn collection_hits(&self) -> usize {
		self.state.collection_hits.load(Ordering::SeqCst)
	}

	/// Action name and body of every mint, reveal and wash call
	pub async fn actions(&self) -> Vec<(&'static str, Value)> {
		self.state.actions.lock().await.clone()
	}

	pub fn abort(self) {
		self.handle.abort();
	}
}
