//! Startup and shutdown logging for the wash reporter

use std::env;
use tracing::info;

use crate::Settings;

/// Logs service information at startup
pub fn log_service_info() {
	// Use the root package name, not this crate's
	let service_name = "wash-reporter";
	let service_version = env!("CARGO_PKG_VERSION");

	info!("=== Wash Reporter Starting ===");
	info!("🚀 Service: {} v{}", service_name, service_version);
	info!("💻 Platform: {} ({})", env::consts::OS, env::consts::ARCH);

	if let Ok(cwd) = env::current_dir() {
		info!("📁 Working Directory: {}", cwd.display());
	}

	if let Ok(rust_log) = env::var("RUST_LOG") {
		info!("🔧 Log Level: {}", rust_log);
	}

	if let Ok(config_path) = env::var("CONFIG_PATH") {
		info!("📋 Config Path: {}", config_path);
	}

	info!(
		"🕒 Started at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs the backend the reporter will talk to
pub fn log_backend_info(settings: &Settings) {
	info!("🌐 Backend: {}", settings.api.base_url);
	info!("  POST {}", settings.endpoints.report);
	info!("  GET  {}", settings.endpoints.nft);
	info!("  GET  {}", settings.endpoints.items);
	info!("  GET  {}", settings.endpoints.quests);
	info!("  GET  {}", settings.endpoints.collection);
	info!("  POST {}", settings.endpoints.mint);
	info!("  POST {}", settings.endpoints.reveal);
	info!("  POST {}", settings.endpoints.wash);
	match &settings.api.auth_token {
		Some(token) => info!("🔑 Auth token from {}", token.description()),
		None => info!("🔑 No auth token configured"),
	}
}

/// Logs readiness once the coordinator is subscribed
pub fn log_startup_complete() {
	info!("✅ Wash Reporter Started Successfully");
	info!("📡 Listening for RouteExecutionCompleted and RouteExecutionFailed");
}

/// Logs service shutdown information
pub fn log_service_shutdown() {
	info!("🛑 Wash Reporter Shutting Down");
	info!(
		"🕒 Shutdown at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}
