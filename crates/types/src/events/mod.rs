//! Widget lifecycle events
//!
//! The widget emits many lifecycle events; the wash trading promotion only cares
//! about the two terminal ones, modelled here as a tagged enum so extraction is
//! done per variant.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::routes::{Route, RouteExecutionUpdate};

/// Discriminant of a [`RouteExecutionEvent`], used as the subscription key on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WidgetEvent {
	RouteExecutionCompleted,
	RouteExecutionFailed,
}

impl WidgetEvent {
	/// Both terminal event kinds
	pub const TERMINAL: [WidgetEvent; 2] = [
		WidgetEvent::RouteExecutionCompleted,
		WidgetEvent::RouteExecutionFailed,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			WidgetEvent::RouteExecutionCompleted => "RouteExecutionCompleted",
			WidgetEvent::RouteExecutionFailed => "RouteExecutionFailed",
		}
	}
}

impl fmt::Display for WidgetEvent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Terminal route execution event
///
/// JSON form: `{"event": "RouteExecutionCompleted", "payload": { ...route... }}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum RouteExecutionEvent {
	#[serde(rename = "RouteExecutionCompleted")]
	Completed(Route),
	#[serde(rename = "RouteExecutionFailed")]
	Failed(RouteExecutionUpdate),
}

impl RouteExecutionEvent {
	pub fn kind(&self) -> WidgetEvent {
		match self {
			RouteExecutionEvent::Completed(_) => WidgetEvent::RouteExecutionCompleted,
			RouteExecutionEvent::Failed(_) => WidgetEvent::RouteExecutionFailed,
		}
	}

	/// Route the event refers to
	pub fn route(&self) -> &Route {
		match self {
			RouteExecutionEvent::Completed(route) => route,
			RouteExecutionEvent::Failed(update) => &update.route,
		}
	}

	/// Transaction hash that qualifies this event for reporting.
	///
	/// Completions use the first process of the first step; failures use the
	/// update's own process.
	pub fn transaction_hash(&self) -> Option<&str> {
		match self {
			RouteExecutionEvent::Completed(route) => route.first_transaction_hash(),
			RouteExecutionEvent::Failed(update) => update.transaction_hash(),
		}
	}

	/// Decode one event from its JSON form
	pub fn from_json(input: &str) -> Result<Self, EventError> {
		if input.trim().is_empty() {
			return Err(EventError::Empty);
		}
		serde_json::from_str(input).map_err(EventError::from)
	}
}

/// Errors raised while decoding events
#[derive(Debug, Error)]
pub enum EventError {
	#[error("Invalid event payload: {0}")]
	Decode(#[from] serde_json::Error),

	#[error("Empty event input")]
	Empty,
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::routes::{Process, Step};

	fn route_with_hash(hash: &str) -> Route {
		Route {
			id: "r1".to_string(),
			steps: vec![Step::with_processes(vec![Process::broadcast(hash)])],
			..Default::default()
		}
	}

	#[test]
	fn test_kind_matches_variant() {
		let completed = RouteExecutionEvent::Completed(Route::default());
		let failed = RouteExecutionEvent::Failed(RouteExecutionUpdate::default());

		assert_eq!(completed.kind(), WidgetEvent::RouteExecutionCompleted);
		assert_eq!(failed.kind(), WidgetEvent::RouteExecutionFailed);
		assert_eq!(failed.kind().to_string(), "RouteExecutionFailed");
	}

	#[test]
	fn test_failed_event_uses_update_process() {
		// The route's own steps carry a different hash; the update's process wins.
		let update = RouteExecutionUpdate::new(route_with_hash("0xroute"), Process::broadcast("0xfail"));
		let event = RouteExecutionEvent::Failed(update);

		assert_eq!(event.transaction_hash(), Some("0xfail"));
	}

	#[test]
	fn test_failed_event_without_hash() {
		let update = RouteExecutionUpdate::new(route_with_hash("0xroute"), Process::default());
		let event = RouteExecutionEvent::Failed(update);

		assert_eq!(event.transaction_hash(), None);
	}

	#[test]
	fn test_completed_event_uses_first_step() {
		let event = RouteExecutionEvent::Completed(route_with_hash("0xabc"));
		assert_eq!(event.transaction_hash(), Some("0xabc"));
		assert_eq!(event.route().id, "r1");
	}

	#[test]
	fn test_decode_tagged_json() {
		let event = RouteExecutionEvent::from_json(
			r#"{"event":"RouteExecutionFailed","payload":{"route":{"id":"r2","steps":[]},"process":{"type":"SWAP","status":"FAILED","txHash":"0x1"}}}"#,
		)
		.unwrap();

		match &event {
			RouteExecutionEvent::Failed(update) => {
				assert_eq!(update.route.id, "r2");
				assert_eq!(update.process.status, "FAILED");
			},
			other => panic!("unexpected variant: {:?}", other),
		}
		assert_eq!(event.transaction_hash(), Some("0x1"));
	}

	#[test]
	fn test_decode_rejects_unknown_event() {
		let result = RouteExecutionEvent::from_json(r#"{"event":"RouteExecutionStarted","payload":{}}"#);
		assert!(matches!(result, Err(EventError::Decode(_))));

		assert!(matches!(RouteExecutionEvent::from_json("  "), Err(EventError::Empty)));
	}
}
