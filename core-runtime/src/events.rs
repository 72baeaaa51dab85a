//! # Event Bus System
//!
//! Typed publish/subscribe channel between the sync orchestrator and whoever
//! observes it (the UI state projector, progress views, log forwarders).
//!
//! ## Overview
//!
//! The event bus system consists of:
//! - **Event Types**: [`SyncEvent`], one variant per lifecycle signal, each
//!   carrying its own payload shape
//! - **EventBus**: a cheaply cloneable handle with two delivery paths
//! - **EventStream**: wrapper for consuming events asynchronously with filtering
//!
//! ## Delivery
//!
//! ```text
//!                                    ┌──────────────────────┐
//!                  emit              │ broadcast channel    ├──> EventStream / Receiver
//! ┌─────────────┐ ─────────────────> │                      │
//! │ Orchestrator│                    ├──────────────────────┤
//! └─────────────┘                    │ handler table        ├──> on(kind, fn) handlers,
//!                                    │ (registration order) │    called synchronously
//!                                    └──────────────────────┘
//! ```
//!
//! `emit` is fire-and-forget. Handlers run synchronously on the emitting task,
//! in registration order for the event's kind; a handler that panics is logged
//! and skipped, the caller never sees it. Async observers use [`EventBus::subscribe`]
//! and may lag behind (`RecvError::Lagged`) without slowing the emitter down.
//!
//! ## Re-entrancy
//!
//! A handler may emit another event: the handler table is snapshotted before
//! dispatch and no lock is held while handlers run. A handler must not emit the
//! same kind of event it is handling, or dispatch never terminates.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{EventBus, EventKind, SyncEvent};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let bus = EventBus::default();
//! let seen = Arc::new(AtomicUsize::new(0));
//!
//! let counter = Arc::clone(&seen);
//! let id = bus.on(EventKind::FetchingBooks, move |_| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! bus.emit(SyncEvent::FetchingBooks);
//! assert_eq!(seen.load(Ordering::SeqCst), 1);
//!
//! assert!(bus.off(id));
//! ```

use bridge_traits::models::{Book, Highlight, KindleFile, SyncMode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};
use tokio::sync::broadcast;
use tracing::{error, trace};

// Re-export commonly used types
pub use tokio::sync::broadcast::error::RecvError;
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the broadcast side of the bus.
///
/// A bulk session emits roughly three events per book; stream subscribers that
/// fall further behind than this receive `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Sync Events
// ============================================================================

/// Lifecycle signals of a sync session.
///
/// On the wire (serde) each event is an object tagged by its camelCase name,
/// e.g. `{"event":"syncBook","book":{...},"index":0}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SyncEvent {
    /// A bulk session started.
    SyncSessionStart { mode: SyncMode },
    /// The login flow is about to open.
    StartLogin,
    /// The login flow finished.
    LoginComplete { success: bool },
    /// Catalog discovery started.
    FetchingBooks,
    /// Catalog discovered; `recommended` is pre-selected for the user.
    FetchingBooksSuccess {
        recommended: Vec<Book>,
        all: Vec<Book>,
    },
    /// The user confirmed which books to sync (UI origin).
    ConfirmBookSelection { selected_book_ids: Vec<String> },
    /// Continuation signal: process the confirmed selection.
    StartSyncingSelectedBooks,
    /// Book `index` of the batch is being synced.
    SyncBook { book: Book, index: usize },
    SyncBookSuccess {
        book: Book,
        highlights: Vec<Highlight>,
    },
    SyncBookFailure { book: Book, message: String },
    /// The batch ran to completion (individual books may have failed).
    SyncSessionSuccess,
    /// The session aborted before any book was synced.
    SyncSessionFailure { message: String },
    /// Single-note resync started.
    ResyncBook { file: KindleFile },
    ResyncComplete { file: KindleFile, diff_count: usize },
    ResyncFailure { file: KindleFile, message: String },
}

impl SyncEvent {
    /// Discriminant of this event, used to route handlers.
    pub fn kind(&self) -> EventKind {
        match self {
            SyncEvent::SyncSessionStart { .. } => EventKind::SyncSessionStart,
            SyncEvent::StartLogin => EventKind::StartLogin,
            SyncEvent::LoginComplete { .. } => EventKind::LoginComplete,
            SyncEvent::FetchingBooks => EventKind::FetchingBooks,
            SyncEvent::FetchingBooksSuccess { .. } => EventKind::FetchingBooksSuccess,
            SyncEvent::ConfirmBookSelection { .. } => EventKind::ConfirmBookSelection,
            SyncEvent::StartSyncingSelectedBooks => EventKind::StartSyncingSelectedBooks,
            SyncEvent::SyncBook { .. } => EventKind::SyncBook,
            SyncEvent::SyncBookSuccess { .. } => EventKind::SyncBookSuccess,
            SyncEvent::SyncBookFailure { .. } => EventKind::SyncBookFailure,
            SyncEvent::SyncSessionSuccess => EventKind::SyncSessionSuccess,
            SyncEvent::SyncSessionFailure { .. } => EventKind::SyncSessionFailure,
            SyncEvent::ResyncBook { .. } => EventKind::ResyncBook,
            SyncEvent::ResyncComplete { .. } => EventKind::ResyncComplete,
            SyncEvent::ResyncFailure { .. } => EventKind::ResyncFailure,
        }
    }

    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &'static str {
        match self {
            SyncEvent::SyncSessionStart { .. } => "Sync session started",
            SyncEvent::StartLogin => "Login started",
            SyncEvent::LoginComplete { success: true } => "Login succeeded",
            SyncEvent::LoginComplete { success: false } => "Login cancelled",
            SyncEvent::FetchingBooks => "Fetching books",
            SyncEvent::FetchingBooksSuccess { .. } => "Books fetched",
            SyncEvent::ConfirmBookSelection { .. } => "Book selection confirmed",
            SyncEvent::StartSyncingSelectedBooks => "Syncing selected books",
            SyncEvent::SyncBook { .. } => "Syncing book",
            SyncEvent::SyncBookSuccess { .. } => "Book synced",
            SyncEvent::SyncBookFailure { .. } => "Book sync failed",
            SyncEvent::SyncSessionSuccess => "Sync session completed",
            SyncEvent::SyncSessionFailure { .. } => "Sync session failed",
            SyncEvent::ResyncBook { .. } => "Resyncing book",
            SyncEvent::ResyncComplete { .. } => "Resync completed",
            SyncEvent::ResyncFailure { .. } => "Resync failed",
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            SyncEvent::SyncBookFailure { .. }
            | SyncEvent::SyncSessionFailure { .. }
            | SyncEvent::ResyncFailure { .. } => EventSeverity::Error,
            SyncEvent::SyncSessionSuccess | SyncEvent::ResyncComplete { .. } => {
                EventSeverity::Info
            }
            _ => EventSeverity::Debug,
        }
    }
}

/// Payload-free discriminant of [`SyncEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    SyncSessionStart,
    StartLogin,
    LoginComplete,
    FetchingBooks,
    FetchingBooksSuccess,
    ConfirmBookSelection,
    StartSyncingSelectedBooks,
    SyncBook,
    SyncBookSuccess,
    SyncBookFailure,
    SyncSessionSuccess,
    SyncSessionFailure,
    ResyncBook,
    ResyncComplete,
    ResyncFailure,
}

impl EventKind {
    /// Event name as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::SyncSessionStart => "syncSessionStart",
            EventKind::StartLogin => "startLogin",
            EventKind::LoginComplete => "loginComplete",
            EventKind::FetchingBooks => "fetchingBooks",
            EventKind::FetchingBooksSuccess => "fetchingBooksSuccess",
            EventKind::ConfirmBookSelection => "confirmBookSelection",
            EventKind::StartSyncingSelectedBooks => "startSyncingSelectedBooks",
            EventKind::SyncBook => "syncBook",
            EventKind::SyncBookSuccess => "syncBookSuccess",
            EventKind::SyncBookFailure => "syncBookFailure",
            EventKind::SyncSessionSuccess => "syncSessionSuccess",
            EventKind::SyncSessionFailure => "syncSessionFailure",
            EventKind::ResyncBook => "resyncBook",
            EventKind::ResyncComplete => "resyncComplete",
            EventKind::ResyncFailure => "resyncFailure",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Event Bus
// ============================================================================

/// Synchronous event handler.
pub type EventHandler = Arc<dyn Fn(&SyncEvent) + Send + Sync>;

/// Identifies a handler registration so it can be removed with [`EventBus::off`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Registration {
    id: SubscriptionId,
    /// `None` matches every event.
    kind: Option<EventKind>,
    handler: EventHandler,
}

struct BusInner {
    sender: broadcast::Sender<SyncEvent>,
    handlers: RwLock<Vec<Registration>>,
    next_id: AtomicU64,
}

/// Central event bus for publishing and subscribing to sync events.
///
/// Cloning the bus yields another handle to the same channel.
///
/// # Example
///
/// ```rust
/// use core_runtime::events::{EventBus, SyncEvent};
///
/// # #[tokio::main]
/// # async fn main() {
/// let bus = EventBus::new(16);
/// let mut stream = bus.subscribe();
///
/// bus.emit(SyncEvent::StartLogin);
///
/// assert_eq!(stream.recv().await.unwrap(), SyncEvent::StartLogin);
/// # }
/// ```
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl EventBus {
    /// Creates a new event bus whose stream subscribers buffer up to
    /// `capacity` events.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero (see `tokio::sync::broadcast::channel`).
    /// [`CoreConfig`](crate::config::CoreConfig) rejects a zero capacity
    /// before it gets here.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            inner: Arc::new(BusInner {
                sender,
                handlers: RwLock::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Registers `handler` for events of `kind`.
    pub fn on<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&SyncEvent) + Send + Sync + 'static,
    {
        self.register(Some(kind), Arc::new(handler))
    }

    /// Registers `handler` for every event.
    pub fn on_all<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&SyncEvent) + Send + Sync + 'static,
    {
        self.register(None, Arc::new(handler))
    }

    fn register(&self, kind: Option<EventKind>, handler: EventHandler) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Registration { id, kind, handler });
        id
    }

    /// Removes a handler. Returns `false` if it was not registered.
    pub fn off(&self, id: SubscriptionId) -> bool {
        let mut handlers = self
            .inner
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = handlers.len();
        handlers.retain(|registration| registration.id != id);
        handlers.len() != before
    }

    /// Publishes an event to stream subscribers, then to matching handlers.
    ///
    /// Returns how many listeners (stream subscribers plus handlers) were
    /// reached. Handler panics are caught and logged.
    pub fn emit(&self, event: SyncEvent) -> usize {
        let kind = event.kind();
        trace!(event = %kind, "emit");

        let mut reached = 0;
        if self.inner.sender.receiver_count() > 0 {
            // Only fails when every receiver was dropped in the meantime.
            reached += self.inner.sender.send(event.clone()).unwrap_or(0);
        }

        let handlers: Vec<EventHandler> = {
            let table = self
                .inner
                .handlers
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            table
                .iter()
                .filter(|registration| registration.kind.map_or(true, |k| k == kind))
                .map(|registration| Arc::clone(&registration.handler))
                .collect()
        };

        for handler in handlers {
            if catch_unwind(AssertUnwindSafe(|| handler(&event))).is_err() {
                error!(event = %kind, "Event handler panicked");
            }
            reached += 1;
        }

        reached
    }

    /// Creates a new stream subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<SyncEvent> {
        self.inner.sender.subscribe()
    }

    /// Number of active stream subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.sender.receiver_count()
    }

    /// Number of registered synchronous handlers.
    pub fn handler_count(&self) -> usize {
        self.inner
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Non-owning handle, for handlers that need to emit without keeping the
    /// bus alive.
    pub fn downgrade(&self) -> WeakEventBus {
        WeakEventBus {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .field("handler_count", &self.handler_count())
            .finish()
    }
}

/// Weak counterpart of [`EventBus`].
#[derive(Clone)]
pub struct WeakEventBus {
    inner: Weak<BusInner>,
}

impl WeakEventBus {
    pub fn upgrade(&self) -> Option<EventBus> {
        self.inner.upgrade().map(|inner| EventBus { inner })
    }
}

impl fmt::Debug for WeakEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakEventBus")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

/// Type alias for event filter functions.
type EventFilter = Box<dyn Fn(&SyncEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with optional filtering.
///
/// # Example
///
/// ```rust
/// use core_runtime::events::{EventBus, EventStream, SyncEvent};
///
/// let bus = EventBus::default();
/// let failures = EventStream::new(bus.subscribe())
///     .filter(|event| matches!(event, SyncEvent::SyncBookFailure { .. }));
/// ```
pub struct EventStream {
    receiver: Receiver<SyncEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<SyncEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` will be returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&SyncEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &SyncEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` once every bus handle has been dropped.
    pub async fn recv(&mut self) -> Result<SyncEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without waiting.
    ///
    /// Returns `None` if no matching event is currently available.
    pub fn try_recv(&mut self) -> Option<Result<SyncEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn book(id: &str) -> Book {
        Book::new(id, format!("Title {}", id), "Author")
    }

    #[test]
    fn test_event_bus_creation() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.handler_count(), 0);
    }

    #[test]
    fn test_emit_without_listeners_is_silent() {
        let bus = EventBus::new(10);
        assert_eq!(bus.emit(SyncEvent::FetchingBooks), 0);
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let bus = EventBus::new(10);
        let calls = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let calls = Arc::clone(&calls);
            bus.on(EventKind::StartLogin, move |_| {
                calls.lock().unwrap().push(name);
            });
        }

        bus.emit(SyncEvent::StartLogin);
        assert_eq!(*calls.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_handlers_only_receive_their_kind() {
        let bus = EventBus::new(10);
        let logins = Arc::new(Mutex::new(0));
        let everything = Arc::new(Mutex::new(0));

        let l = Arc::clone(&logins);
        bus.on(EventKind::LoginComplete, move |_| *l.lock().unwrap() += 1);
        let e = Arc::clone(&everything);
        bus.on_all(move |_| *e.lock().unwrap() += 1);

        bus.emit(SyncEvent::StartLogin);
        bus.emit(SyncEvent::LoginComplete { success: true });

        assert_eq!(*logins.lock().unwrap(), 1);
        assert_eq!(*everything.lock().unwrap(), 2);
    }

    #[test]
    fn test_off_removes_handler() {
        let bus = EventBus::new(10);
        let count = Arc::new(Mutex::new(0));
        let c = Arc::clone(&count);
        let id = bus.on(EventKind::FetchingBooks, move |_| *c.lock().unwrap() += 1);

        bus.emit(SyncEvent::FetchingBooks);
        assert!(bus.off(id));
        assert!(!bus.off(id));
        bus.emit(SyncEvent::FetchingBooks);

        assert_eq!(*count.lock().unwrap(), 1);
        assert_eq!(bus.handler_count(), 0);
    }

    #[test]
    fn test_panicking_handler_does_not_reach_caller() {
        let bus = EventBus::new(10);
        let after = Arc::new(Mutex::new(false));

        bus.on(EventKind::SyncSessionSuccess, |_| panic!("handler bug"));
        let a = Arc::clone(&after);
        bus.on(EventKind::SyncSessionSuccess, move |_| *a.lock().unwrap() = true);

        assert_eq!(bus.emit(SyncEvent::SyncSessionSuccess), 2);
        assert!(*after.lock().unwrap());
    }

    #[test]
    fn test_handler_can_emit_other_events() {
        let bus = EventBus::new(10);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let weak = bus.downgrade();
        bus.on(EventKind::ConfirmBookSelection, move |_| {
            if let Some(bus) = weak.upgrade() {
                bus.emit(SyncEvent::StartSyncingSelectedBooks);
            }
        });
        let s = Arc::clone(&seen);
        bus.on_all(move |event| s.lock().unwrap().push(event.kind()));

        bus.emit(SyncEvent::ConfirmBookSelection {
            selected_book_ids: vec!["B1".to_string()],
        });

        // The nested event is fully dispatched before the outer one reaches
        // handlers registered after the re-emitting one.
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                EventKind::StartSyncingSelectedBooks,
                EventKind::ConfirmBookSelection
            ]
        );
    }

    #[test]
    fn test_weak_bus_does_not_keep_bus_alive() {
        let bus = EventBus::new(10);
        let weak = bus.downgrade();
        assert!(weak.upgrade().is_some());
        drop(bus);
        assert!(weak.upgrade().is_none());
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(10);
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        let event = SyncEvent::SyncBook {
            book: book("B1"),
            index: 0,
        };
        assert_eq!(bus.emit(event.clone()), 2);

        assert_eq!(sub1.recv().await.unwrap(), event);
        assert_eq!(sub2.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_event_stream_with_filter() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe())
            .filter(|event| event.severity() == EventSeverity::Error);

        bus.emit(SyncEvent::SyncBook {
            book: book("B1"),
            index: 0,
        });
        let failure = SyncEvent::SyncBookFailure {
            book: book("B1"),
            message: "timeout".to_string(),
        };
        bus.emit(failure.clone());

        assert_eq!(stream.recv().await.unwrap(), failure);
    }

    #[tokio::test]
    async fn test_lagged_subscriber() {
        let bus = EventBus::new(2);
        let mut sub = bus.subscribe();

        for index in 0..5 {
            bus.emit(SyncEvent::SyncBook {
                book: book("B1"),
                index,
            });
        }

        let result = sub.recv().await;
        assert!(matches!(result, Err(RecvError::Lagged(_))));
    }

    #[test]
    fn test_try_recv_empty() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe());
        assert!(stream.try_recv().is_none());
    }

    #[test]
    fn test_event_severity_and_description() {
        let failure = SyncEvent::SyncSessionFailure {
            message: "offline".to_string(),
        };
        assert_eq!(failure.severity(), EventSeverity::Error);
        assert_eq!(SyncEvent::SyncSessionSuccess.severity(), EventSeverity::Info);
        assert_eq!(SyncEvent::FetchingBooks.severity(), EventSeverity::Debug);
        assert_eq!(
            SyncEvent::LoginComplete { success: false }.description(),
            "Login cancelled"
        );
    }

    #[test]
    fn test_event_wire_format() {
        let event = SyncEvent::ResyncComplete {
            file: KindleFile::new("Kindle/Dune.md", book("B1")),
            diff_count: 3,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "resyncComplete");
        assert_eq!(json["diffCount"], 3);
        assert_eq!(json["file"]["book"]["id"], "B1");

        let unit = serde_json::to_value(SyncEvent::StartSyncingSelectedBooks).unwrap();
        assert_eq!(unit["event"], EventKind::StartSyncingSelectedBooks.as_str());

        let back: SyncEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_kind_names_match_wire_tags() {
        let events = vec![
            SyncEvent::SyncSessionStart {
                mode: SyncMode::Amazon,
            },
            SyncEvent::LoginComplete { success: true },
            SyncEvent::ConfirmBookSelection {
                selected_book_ids: vec![],
            },
            SyncEvent::SyncBookFailure {
                book: book("B1"),
                message: "x".to_string(),
            },
        ];

        for event in events {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["event"], event.kind().as_str());
        }
    }
}
