//! Reporting coordinator
//!
//! Bridges the widget's terminal route events to the wash backend. For each
//! event carrying a transaction hash it spawns one report and one refetch of
//! the NFT and inventory hooks. Nothing is awaited on the emitter's call; the
//! spawned tasks run concurrently and in no particular order.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};
use wash_types::{
	HookResult, Refetch, ReportPayload, ReportResult, RouteExecutionEvent, WashReporter,
	WidgetEvent,
};

use crate::error::ServiceError;
use crate::event_bus::{ListenerId, WidgetEventBus};

/// Counts spawned tasks so shutdown can wait for them
#[derive(Default)]
struct InFlight {
	count: AtomicUsize,
	idle: Notify,
}

/// Decrements the in-flight count when the task ends, including on panic
struct InFlightGuard(Arc<InFlight>);

impl Drop for InFlightGuard {
	fn drop(&mut self) {
		if self.0.count.fetch_sub(1, Ordering::SeqCst) == 1 {
			self.0.idle.notify_waiters();
		}
	}
}

struct CoordinatorInner {
	reporter: Arc<dyn WashReporter>,
	nft: Arc<dyn Refetch>,
	items: Arc<dyn Refetch>,
	runtime: Handle,
	in_flight: Arc<InFlight>,
}

/// Turns terminal route events into wash reports and read-state refreshes
#[derive(Clone)]
pub struct ReportingCoordinator {
	inner: Arc<CoordinatorInner>,
}

/// Tasks spawned for one qualifying event
///
/// Dropping this detaches the tasks; they keep running.
#[derive(Debug)]
pub struct Dispatched {
	pub route_id: String,
	pub tx_hash: String,
	report: JoinHandle<ReportResult<()>>,
	refetches: Vec<JoinHandle<HookResult<()>>>,
}

/// Result of joining a [`Dispatched`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
	pub reported: bool,
	pub refetches_succeeded: usize,
	pub refetches_failed: usize,
}

impl Dispatched {
	/// Wait for the report and both refetches
	pub async fn join(self) -> DispatchOutcome {
		let reported = matches!(self.report.await, Ok(Ok(())));

		let mut refetches_succeeded = 0;
		let mut refetches_failed = 0;
		for handle in self.refetches {
			match handle.await {
				Ok(Ok(())) => refetches_succeeded += 1,
				_ => refetches_failed += 1,
			}
		}

		DispatchOutcome {
			reported,
			refetches_succeeded,
			refetches_failed,
		}
	}
}

impl ReportingCoordinator {
	/// Create a coordinator spawning onto the current tokio runtime
	pub fn new(
		reporter: Arc<dyn WashReporter>,
		nft: Arc<dyn Refetch>,
		items: Arc<dyn Refetch>,
	) -> Result<Self, ServiceError> {
		let runtime = Handle::try_current().map_err(|e| ServiceError::Runtime(e.to_string()))?;
		Ok(Self::with_runtime(reporter, nft, items, runtime))
	}

	/// Create a coordinator spawning onto the given runtime
	pub fn with_runtime(
		reporter: Arc<dyn WashReporter>,
		nft: Arc<dyn Refetch>,
		items: Arc<dyn Refetch>,
		runtime: Handle,
	) -> Self {
		Self {
			inner: Arc::new(CoordinatorInner {
				reporter,
				nft,
				items,
				runtime,
				in_flight: Arc::new(InFlight::default()),
			}),
		}
	}

	/// Register one handler per terminal event kind
	///
	/// The handlers stay registered until the returned [`Subscription`] is
	/// unsubscribed or dropped.
	pub fn subscribe(&self, bus: &WidgetEventBus) -> Subscription {
		let listeners = WidgetEvent::TERMINAL
			.iter()
			.map(|kind| {
				let coordinator = self.clone();
				let id = bus.on(*kind, move |event| {
					// Fire and forget: the bus must not wait on network I/O
					let _ = coordinator.handle(event);
				});
				(*kind, id)
			})
			.collect();

		debug!("Reporting coordinator subscribed to terminal route events");
		Subscription {
			bus: bus.clone(),
			listeners,
		}
	}

	/// Handle one terminal route event
	///
	/// Events without a resolvable transaction hash are skipped entirely: no
	/// report and no refetch. Otherwise exactly one report and one refetch per
	/// hook are spawned; the refetches run whether or not the report succeeds.
	pub fn handle(&self, event: &RouteExecutionEvent) -> Option<Dispatched> {
		let Some(payload) = ReportPayload::from_event(event) else {
			trace!(
				"Skipping {} for route {}: no transaction hash",
				event.kind(),
				event.route().id
			);
			return None;
		};

		info!(
			"Reporting {} for route {} (tx {})",
			event.kind(),
			payload.id,
			payload.tx_hash
		);

		let route_id = payload.id.clone();
		let tx_hash = payload.tx_hash.clone();

		let reporter = Arc::clone(&self.inner.reporter);
		let report = self.spawn_tracked(async move {
			let result = reporter.report(&payload).await;
			if let Err(error) = &result {
				warn!(
					"Failed to report route {} (tx {}): {}",
					payload.id, payload.tx_hash, error
				);
			}
			result
		});

		let refetches = [&self.inner.nft, &self.inner.items]
			.into_iter()
			.map(|hook| {
				let hook = Arc::clone(hook);
				self.spawn_tracked(async move {
					let result = hook.refetch().await;
					if let Err(error) = &result {
						debug!("Refetch of {} after report failed: {}", hook.resource(), error);
					}
					result
				})
			})
			.collect();

		Some(Dispatched {
			route_id,
			tx_hash,
			report,
			refetches,
		})
	}

	/// Number of spawned tasks that have not finished yet
	pub fn in_flight(&self) -> usize {
		self.inner.in_flight.count.load(Ordering::SeqCst)
	}

	/// Wait until every task spawned so far has finished
	pub async fn drain(&self) {
		loop {
			let idle = self.inner.in_flight.idle.notified();
			if self.in_flight() == 0 {
				return;
			}
			idle.await;
		}
	}

	fn spawn_tracked<F>(&self, task: F) -> JoinHandle<F::Output>
	where
		F: Future + Send + 'static,
		F::Output: Send + 'static,
	{
		let in_flight = Arc::clone(&self.inner.in_flight);
		in_flight.count.fetch_add(1, Ordering::SeqCst);
		let guard = InFlightGuard(in_flight);

		self.inner.runtime.spawn(async move {
			let _guard = guard;
			task.await
		})
	}
}

impl fmt::Debug for ReportingCoordinator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ReportingCoordinator")
			.field("reporter", &self.inner.reporter)
			.field("nft", &self.inner.nft.resource())
			.field("items", &self.inner.items.resource())
			.field("in_flight", &self.in_flight())
			.finish()
	}
}

/// Live registration of a coordinator on a bus
///
/// Removes exactly the listeners it registered when unsubscribed or dropped.
/// In-flight reports and refetches are not cancelled.
#[derive(Debug)]
pub struct Subscription {
	bus: WidgetEventBus,
	listeners: Vec<(WidgetEvent, ListenerId)>,
}

impl Subscription {
	pub fn unsubscribe(mut self) {
		self.detach();
	}

	pub fn is_active(&self) -> bool {
		!self.listeners.is_empty()
	}

	fn detach(&mut self) {
		if self.listeners.is_empty() {
			return;
		}
		for (kind, id) in self.listeners.drain(..) {
			self.bus.off(kind, id);
		}
		debug!("Reporting coordinator unsubscribed");
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		self.detach();
	}
}
