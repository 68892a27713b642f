//! Wash Types
//!
//! Shared models and traits for the wash trading reporter.
//! This crate contains the widget route models, the terminal lifecycle events,
//! the report payload and the contracts between reporter, coordinator and hooks.

pub mod events;
pub mod hooks;
pub mod reports;
pub mod routes;
pub mod wash;

// Re-export serde_json for convenience
pub use serde_json;

pub use events::{EventError, RouteExecutionEvent, WidgetEvent};
pub use hooks::{ActionState, HookError, HookResult, HookState, Refetch};
pub use reports::{ReportError, ReportPayload, ReportResult, WashReporter};
pub use routes::{Process, Route, RouteExecutionUpdate, Step, StepExecution, Token};
pub use wash::{ActionRequest, ActionResponse, Collection, Item, Nft, NftStatus, Quest};
