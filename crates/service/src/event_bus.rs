//! In-process widget event bus
//!
//! Listeners are registered per event kind and removed by the id `on` returned.
//! There is deliberately no way to drop every listener at once: the bus is shared
//! and one consumer must never detach another.

use dashmap::DashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;
use wash_types::{RouteExecutionEvent, WidgetEvent};

/// Listener callback, invoked synchronously on the emitter's call
pub type EventHandler = Arc<dyn Fn(&RouteExecutionEvent) + Send + Sync>;

/// Handle identifying one registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
struct BusInner {
	listeners: DashMap<WidgetEvent, Vec<(ListenerId, EventHandler)>>,
	next_id: AtomicU64,
}

/// Cloneable handle to a shared event bus
#[derive(Clone, Default)]
pub struct WidgetEventBus {
	inner: Arc<BusInner>,
}

impl WidgetEventBus {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a listener for one event kind
	pub fn on<F>(&self, kind: WidgetEvent, handler: F) -> ListenerId
	where
		F: Fn(&RouteExecutionEvent) + Send + Sync + 'static,
	{
		let id = ListenerId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
		self.inner
			.listeners
			.entry(kind)
			.or_default()
			.push((id, Arc::new(handler)));
		trace!("Registered listener {:?} for {}", id, kind);
		id
	}

	/// Remove exactly the listener registered under `id`
	///
	/// Returns `false` if it was not registered for `kind`.
	pub fn off(&self, kind: WidgetEvent, id: ListenerId) -> bool {
		let Some(mut entry) = self.inner.listeners.get_mut(&kind) else {
			return false;
		};
		let before = entry.len();
		entry.retain(|(listener_id, _)| *listener_id != id);
		let removed = entry.len() != before;
		if removed {
			trace!("Removed listener {:?} for {}", id, kind);
		}
		removed
	}

	/// Dispatch an event to every listener of its kind, returning how many ran
	///
	/// The listener list is snapshotted first, so a listener may call `off`
	/// (or `on`) while being dispatched.
	pub fn emit(&self, event: &RouteExecutionEvent) -> usize {
		let kind = event.kind();
		let handlers: Vec<EventHandler> = match self.inner.listeners.get(&kind) {
			Some(entry) => entry.iter().map(|(_, handler)| Arc::clone(handler)).collect(),
			None => Vec::new(),
		};

		for handler in &handlers {
			handler(event);
		}

		trace!("Dispatched {} to {} listener(s)", kind, handlers.len());
		handlers.len()
	}

	pub fn listener_count(&self, kind: WidgetEvent) -> usize {
		self.inner
			.listeners
			.get(&kind)
			.map(|entry| entry.len())
			.unwrap_or(0)
	}
}

impl fmt::Debug for WidgetEventBus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WidgetEventBus")
			.field(
				"completed_listeners",
				&self.listener_count(WidgetEvent::RouteExecutionCompleted),
			)
			.field(
				"failed_listeners",
				&self.listener_count(WidgetEvent::RouteExecutionFailed),
			)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::AtomicUsize;
	use wash_types::{Route, RouteExecutionUpdate};

	fn completed() -> RouteExecutionEvent {
		RouteExecutionEvent::Completed(Route::default())
	}

	fn counter_handler(counter: &Arc<AtomicUsize>) -> impl Fn(&RouteExecutionEvent) + Send + Sync {
		let counter = Arc::clone(counter);
		move |_| {
			counter.fetch_add(1, Ordering::SeqCst);
		}
	}

	#[test]
	fn test_emit_reaches_only_matching_kind() {
		let bus = WidgetEventBus::new();
		let completed_calls = Arc::new(AtomicUsize::new(0));
		let failed_calls = Arc::new(AtomicUsize::new(0));

		bus.on(WidgetEvent::RouteExecutionCompleted, counter_handler(&completed_calls));
		bus.on(WidgetEvent::RouteExecutionFailed, counter_handler(&failed_calls));

		assert_eq!(bus.emit(&completed()), 1);
		assert_eq!(completed_calls.load(Ordering::SeqCst), 1);
		assert_eq!(failed_calls.load(Ordering::SeqCst), 0);

		bus.emit(&RouteExecutionEvent::Failed(RouteExecutionUpdate::default()));
		assert_eq!(failed_calls.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn test_off_removes_only_that_listener() {
		let bus = WidgetEventBus::new();
		let mine = Arc::new(AtomicUsize::new(0));
		let other = Arc::new(AtomicUsize::new(0));

		let id = bus.on(WidgetEvent::RouteExecutionCompleted, counter_handler(&mine));
		bus.on(WidgetEvent::RouteExecutionCompleted, counter_handler(&other));

		assert!(bus.off(WidgetEvent::RouteExecutionCompleted, id));
		assert!(!bus.off(WidgetEvent::RouteExecutionCompleted, id));
		assert_eq!(bus.listener_count(WidgetEvent::RouteExecutionCompleted), 1);

		bus.emit(&completed());
		assert_eq!(mine.load(Ordering::SeqCst), 0);
		assert_eq!(other.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn test_off_with_wrong_kind_is_noop() {
		let bus = WidgetEventBus::new();
		let calls = Arc::new(AtomicUsize::new(0));
		let id = bus.on(WidgetEvent::RouteExecutionCompleted, counter_handler(&calls));

		assert!(!bus.off(WidgetEvent::RouteExecutionFailed, id));
		bus.emit(&completed());
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn test_listener_can_unsubscribe_during_dispatch() {
		let bus = WidgetEventBus::new();
		let calls = Arc::new(AtomicUsize::new(0));
		let slot: Arc<std::sync::OnceLock<ListenerId>> = Arc::new(std::sync::OnceLock::new());

		let id = {
			let bus_handle = bus.clone();
			let calls = Arc::clone(&calls);
			let slot = Arc::clone(&slot);
			bus.on(WidgetEvent::RouteExecutionCompleted, move |_| {
				calls.fetch_add(1, Ordering::SeqCst);
				if let Some(id) = slot.get() {
					bus_handle.off(WidgetEvent::RouteExecutionCompleted, *id);
				}
			})
		};
		slot.set(id).unwrap();

		bus.emit(&completed());
		bus.emit(&completed());
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn test_emit_without_listeners() {
		let bus = WidgetEventBus::new();
		assert_eq!(bus.emit(&completed()), 0);
	}
}
