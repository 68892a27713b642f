//! Wash Reporter
//!
//! Replays newline-delimited route execution events from stdin through the
//! reporting pipeline.

use wash_reporter::WashReporterBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	WashReporterBuilder::new().start_replay().await?;
	Ok(())
}
