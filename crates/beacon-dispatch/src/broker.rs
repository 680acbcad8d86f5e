//! # Proximity Broker
//!
//! Fans out state-change events to the client connections currently located
//! within the event's effect radius.
//!
//! The broker is an explicitly constructed value with application-managed
//! lifetime; wiring code builds one and hands `Arc`s to the services that
//! publish through it. There is no process-global registry.
//!
//! ## Delivery Model
//!
//! - Each connection gets its own bounded FIFO mailbox (`tokio::mpsc`).
//! - `publish` selects the in-range subset through the shared
//!   [`SpatialIndex`] (bounding-box prefilter plus the exact great-circle
//!   test) and delivers to exactly that subset, at most once per connection.
//! - Delivery is fire-and-forget: a closed or full mailbox is logged and
//!   skipped; the remaining connections still receive the event.
//! - A disconnected client misses everything published during the gap;
//!   there is no backlog or replay on rejoin.

use crate::events::DispatchEvent;
use crate::subscriber::ConnectionHandle;
use crate::DEFAULT_MAILBOX_CAPACITY;
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use shared_types::{ConnectionId, GeoPoint, SpatialIndex};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Trait for publishing events toward nearby connections.
///
/// The services depend on this rather than the concrete broker so tests can
/// substitute a no-op or recording sink.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Publish an event.
    ///
    /// # Returns
    ///
    /// The number of connections the event was delivered to.
    async fn publish(&self, event: DispatchEvent) -> usize;
}

/// A registered connection's delivery side.
pub(crate) struct Registration {
    pub(crate) sender: mpsc::Sender<DispatchEvent>,
    /// Ties a [`ConnectionHandle`] to the registration it came from, so a
    /// stale handle dropped after a rejoin cannot evict the newer one.
    pub(crate) generation: u64,
}

/// Registered connections: mailboxes keyed by id, plus the spatial view of
/// their current points. Both sides live under one lock and move together.
#[derive(Default)]
pub(crate) struct ConnectionTable {
    pub(crate) registrations: HashMap<ConnectionId, Registration>,
    pub(crate) points: SpatialIndex<ConnectionId>,
}

impl ConnectionTable {
    pub(crate) fn insert(
        &mut self,
        connection_id: ConnectionId,
        point: GeoPoint,
        registration: Registration,
    ) {
        self.registrations.insert(connection_id, registration);
        self.points.insert(connection_id, point);
    }

    pub(crate) fn remove(&mut self, connection_id: &ConnectionId) -> Option<Registration> {
        self.points.remove(connection_id);
        self.registrations.remove(connection_id)
    }
}

pub(crate) type Registry = Arc<RwLock<ConnectionTable>>;

/// Location-filtered fan-out over per-connection mailboxes.
pub struct ProximityBroker {
    connections: Registry,
    /// Monotonic join counter; see [`Registration::generation`].
    generation: AtomicU64,
    /// Total events published (attempted, regardless of audience size).
    events_published: AtomicU64,
    /// Mailbox capacity handed to each new connection.
    mailbox_capacity: usize,
}

impl ProximityBroker {
    /// Creates a broker with the default per-connection mailbox capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_mailbox_capacity(DEFAULT_MAILBOX_CAPACITY)
    }

    /// Creates a broker with a specific per-connection mailbox capacity.
    #[must_use]
    pub fn with_mailbox_capacity(capacity: usize) -> Self {
        Self {
            connections: Arc::new(RwLock::new(ConnectionTable::default())),
            generation: AtomicU64::new(0),
            events_published: AtomicU64::new(0),
            mailbox_capacity: capacity,
        }
    }

    /// Registers a connection at `point` and returns its delivery handle.
    ///
    /// Joining an id that is already registered replaces the previous
    /// registration entirely: the old mailbox closes and events published
    /// while the client was away are not replayed.
    #[must_use]
    pub fn join(&self, connection_id: ConnectionId, point: GeoPoint) -> ConnectionHandle {
        let (sender, receiver) = mpsc::channel(self.mailbox_capacity);
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);

        self.connections.write().insert(
            connection_id,
            point,
            Registration { sender, generation },
        );

        debug!(connection = %connection_id, lat = point.lat, lng = point.lng, "Connection joined");

        ConnectionHandle::new(connection_id, generation, receiver, self.connections.clone())
    }

    /// Overwrites a registered connection's current point, keeping its
    /// mailbox. Returns false if the connection is not registered.
    pub fn update_location(&self, connection_id: ConnectionId, point: GeoPoint) -> bool {
        let mut connections = self.connections.write();
        if connections.registrations.contains_key(&connection_id) {
            connections.points.insert(connection_id, point);
            true
        } else {
            false
        }
    }

    /// Deregisters a connection. Its mailbox closes; a handle still held by
    /// the transport simply stops yielding events.
    pub fn leave(&self, connection_id: ConnectionId) {
        if self.connections.write().remove(&connection_id).is_some() {
            debug!(connection = %connection_id, "Connection left");
        }
    }

    /// Number of currently registered connections.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.read().registrations.len()
    }

    /// True if the connection is currently registered.
    #[must_use]
    pub fn is_registered(&self, connection_id: ConnectionId) -> bool {
        self.connections
            .read()
            .registrations
            .contains_key(&connection_id)
    }

    /// Total events published through this broker.
    #[must_use]
    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }

    /// Selects the in-range audience for an event.
    ///
    /// Snapshots senders under the read lock, then delivers outside it so a
    /// slow mailbox cannot block joins and leaves.
    fn audience(
        &self,
        origin: &GeoPoint,
        radius_m: f64,
    ) -> Vec<(ConnectionId, mpsc::Sender<DispatchEvent>)> {
        let connections = self.connections.read();
        connections
            .points
            .nearby(origin, radius_m)
            .into_iter()
            .filter_map(|id| {
                connections
                    .registrations
                    .get(&id)
                    .map(|registration| (id, registration.sender.clone()))
            })
            .collect()
    }

    /// Drops registrations whose mailboxes have closed.
    fn prune(&self, stale: &[ConnectionId]) {
        if stale.is_empty() {
            return;
        }
        let mut connections = self.connections.write();
        for id in stale {
            // Re-check under the write lock: the client may have rejoined
            // with a fresh mailbox in the meantime.
            if connections
                .registrations
                .get(id)
                .is_some_and(|registration| registration.sender.is_closed())
            {
                connections.remove(id);
            }
        }
    }
}

impl Default for ProximityBroker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventSink for ProximityBroker {
    async fn publish(&self, event: DispatchEvent) -> usize {
        let origin = event.origin();
        let radius_m = event.effect_radius_m();
        let kind = event.kind();

        self.events_published.fetch_add(1, Ordering::Relaxed);

        let audience = self.audience(&origin, radius_m);
        let mut delivered = 0usize;
        let mut stale = Vec::new();

        for (connection_id, sender) in audience {
            match sender.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    // At-most-once: a lagging connection loses this event
                    // rather than stalling everyone else.
                    warn!(connection = %connection_id, kind = ?kind, "Mailbox full, event dropped");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    stale.push(connection_id);
                }
            }
        }

        self.prune(&stale);

        debug!(
            kind = ?kind,
            radius_m,
            delivered,
            stale = stale.len(),
            "Event published"
        );

        delivered
    }
}

/// Sink that discards every event. For tests that exercise a service
/// without observing its fan-out.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSink;

#[async_trait]
impl EventSink for NoOpSink {
    async fn publish(&self, _event: DispatchEvent) -> usize {
        0
    }
}

/// Sink that records every published event, in order.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<DispatchEvent>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything published so far.
    #[must_use]
    pub fn events(&self) -> Vec<DispatchEvent> {
        self.events.lock().clone()
    }

    /// Kinds of everything published so far, for compact assertions.
    #[must_use]
    pub fn kinds(&self) -> Vec<crate::events::EventKind> {
        self.events.lock().iter().map(DispatchEvent::kind).collect()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn publish(&self, event: DispatchEvent) -> usize {
        self.events.lock().push(event);
        0
    }
}
