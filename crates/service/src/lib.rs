//! Wash Service
//!
//! Event bus, reporting coordinator, read-state hooks and actions for the wash
//! trading promotion.

pub mod actions;
pub mod context;
pub mod coordinator;
pub mod error;
pub mod event_bus;
pub mod hooks;
pub mod http_client;
pub mod reporter;

pub use actions::RemoteAction;
pub use context::WashTradingContext;
pub use coordinator::{DispatchOutcome, Dispatched, ReportingCoordinator, Subscription};
pub use error::ServiceError;
pub use event_bus::{EventHandler, ListenerId, WidgetEventBus};
pub use hooks::RemoteResource;
pub use http_client::build_client;
pub use reporter::HttpWashReporter;
