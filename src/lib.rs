//! Wash Reporter Library
//!
//! Reports completed and failed bridge route executions to the wash trading
//! backend, keeps the promotion's read-state (NFT, inventory, quests,
//! collection) fresh and runs the mint, reveal and wash actions.

use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

// Core domain types
pub use wash_types::{
	serde_json, ActionRequest, ActionResponse, ActionState, Collection, EventError, HookError,
	HookResult, HookState, Item, Nft, NftStatus, Process, Quest, Refetch, ReportError,
	ReportPayload, ReportResult, Route, RouteExecutionEvent, RouteExecutionUpdate, Step,
	StepExecution, Token, WashReporter, WidgetEvent,
};

// Service layer
pub use wash_service::{
	DispatchOutcome, Dispatched, HttpWashReporter, ListenerId, RemoteAction, RemoteResource,
	ReportingCoordinator, ServiceError, Subscription, WashTradingContext, WidgetEventBus,
};

// Config
pub use wash_config::{
	load_config, log_backend_info, log_service_info, log_service_shutdown, log_startup_complete,
	Settings,
};

pub mod models {
	pub use wash_types::*;
}

pub mod config {
	pub use wash_config::*;
}

pub mod service {
	pub use wash_service::*;
}

pub mod mocks;

// Re-export external dependencies for embedders
pub use async_trait;
pub use reqwest;

/// Counters from replaying an event stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayStats {
	/// Events decoded and emitted on the bus
	pub emitted: usize,
	/// Lines that could not be decoded
	pub invalid: usize,
}

/// Builder pattern for configuring the reporter
#[derive(Default)]
pub struct WashReporterBuilder {
	settings: Option<Settings>,
	reporter: Option<Arc<dyn WashReporter>>,
	bus: Option<WidgetEventBus>,
}

impl WashReporterBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Set custom settings
	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	/// Replace the HTTP reporter, e.g. with a recording one in tests
	pub fn with_reporter(mut self, reporter: Arc<dyn WashReporter>) -> Self {
		self.reporter = Some(reporter);
		self
	}

	/// Mount on an existing bus instead of a private one
	pub fn with_bus(mut self, bus: WidgetEventBus) -> Self {
		self.bus = Some(bus);
		self
	}

	/// Get the current settings
	pub fn settings(&self) -> Option<&Settings> {
		self.settings.as_ref()
	}

	/// Initialize tracing with configuration-based settings
	fn init_tracing_from_settings(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
		use wash_config::LogFormat;

		// RUST_LOG wins over the configured level
		let log_level = &settings.logging.level;
		let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
			.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
		let structured = settings.logging.structured;

		let result = match settings.logging.format {
			LogFormat::Json => tracing_subscriber::fmt()
				.json()
				.with_env_filter(env_filter)
				.with_target(structured)
				.with_thread_ids(structured)
				.try_init(),
			LogFormat::Pretty => tracing_subscriber::fmt()
				.pretty()
				.with_env_filter(env_filter)
				.with_target(structured)
				.with_thread_ids(structured)
				.try_init(),
			LogFormat::Compact => tracing_subscriber::fmt()
				.compact()
				.with_env_filter(env_filter)
				.with_target(structured)
				.with_thread_ids(structured)
				.try_init(),
		};
		result.map_err(|e| format!("Failed to initialize tracing: {}", e))?;

		info!(
			"Logging configuration applied: level={}, format={:?}, structured={}",
			settings.logging.level, settings.logging.format, settings.logging.structured
		);

		Ok(())
	}

	/// Build the context, mount it on the bus and load the initial read-state
	pub async fn start(self) -> Result<WashReporterApp, Box<dyn std::error::Error>> {
		let settings = self.settings.unwrap_or_default();
		settings.validate()?;

		let mut context = match self.reporter {
			Some(reporter) => WashTradingContext::with_reporter(&settings, reporter)?,
			None => WashTradingContext::from_settings(&settings)?,
		};

		let bus = self.bus.unwrap_or_default();
		context.mount(&bus);

		for error in context.load_all().await {
			warn!("Initial read-state load failed: {}", error);
		}

		Ok(WashReporterApp { context, bus })
	}

	/// Run the reporter over newline-delimited events read from stdin
	///
	/// Handles everything needed for the binary:
	/// - Loading .env file
	/// - Loading configuration with defaults
	/// - Initializing tracing
	/// - Replaying stdin, then draining in-flight reports
	pub async fn start_replay(mut self) -> Result<ReplayStats, Box<dyn std::error::Error>> {
		dotenvy::dotenv().ok();

		let using_provided_settings = self.settings.is_some();
		let settings = match self.settings.take() {
			Some(settings) => settings,
			None => load_config()?,
		};

		Self::init_tracing_from_settings(&settings)?;
		log_service_info();
		info!(
			"Using configuration: loaded from {}",
			if using_provided_settings {
				"provided settings"
			} else {
				"config file, environment or defaults"
			}
		);
		log_backend_info(&settings);

		let app = self.with_settings(settings).start().await?;
		log_startup_complete();

		let stats = app.replay(BufReader::new(tokio::io::stdin())).await?;
		info!(
			"Replay finished: {} event(s) emitted, {} invalid line(s)",
			stats.emitted, stats.invalid
		);

		app.shutdown().await;
		Ok(stats)
	}
}

/// Running reporter: a mounted context and the bus it listens on
#[derive(Debug)]
pub struct WashReporterApp {
	context: WashTradingContext,
	bus: WidgetEventBus,
}

impl WashReporterApp {
	pub fn context(&self) -> &WashTradingContext {
		&self.context
	}

	pub fn bus(&self) -> &WidgetEventBus {
		&self.bus
	}

	/// Emit every event decoded from `input` on the bus
	///
	/// Blank lines are ignored; undecodable lines are logged and counted.
	pub async fn replay<R>(&self, input: R) -> Result<ReplayStats, std::io::Error>
	where
		R: AsyncBufRead + Unpin,
	{
		let mut stats = ReplayStats::default();
		let mut lines = input.lines();

		while let Some(line) = lines.next_line().await? {
			match RouteExecutionEvent::from_json(&line) {
				Ok(event) => {
					self.bus.emit(&event);
					stats.emitted += 1;
				},
				Err(EventError::Empty) => {},
				Err(error) => {
					warn!("Skipping invalid event line: {}", error);
					stats.invalid += 1;
				},
			}
		}

		Ok(stats)
	}

	/// Unmount and wait for in-flight reports and refetches
	pub async fn shutdown(mut self) {
		self.context.unmount();
		self.context.drain().await;
		log_service_shutdown();
	}
}
