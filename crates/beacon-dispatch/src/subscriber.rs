//! # Connection Handle
//!
//! The receiving side of a proximity registration. The transport layer owns
//! one handle per live client connection and forwards whatever it yields.

use crate::broker::Registry;
use crate::events::DispatchEvent;
use shared_types::ConnectionId;
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_stream::Stream;
use tracing::debug;

/// Errors from receiving on a connection mailbox.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    /// The registration is gone (left, replaced, or broker dropped).
    #[error("Connection mailbox closed")]
    Closed,
}

/// Delivery handle for one registered connection.
///
/// Events arrive in publish order (FIFO per connection). Dropping the handle
/// deregisters the connection, unless a newer registration for the same id
/// has already replaced it.
pub struct ConnectionHandle {
    connection_id: ConnectionId,
    /// Generation of the registration this handle belongs to.
    generation: u64,
    receiver: mpsc::Receiver<DispatchEvent>,
    connections: Registry,
}

impl ConnectionHandle {
    pub(crate) fn new(
        connection_id: ConnectionId,
        generation: u64,
        receiver: mpsc::Receiver<DispatchEvent>,
        connections: Registry,
    ) -> Self {
        Self {
            connection_id,
            generation,
            receiver,
            connections,
        }
    }

    /// The connection this handle delivers for.
    #[must_use]
    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    /// Receive the next event.
    ///
    /// # Returns
    ///
    /// - `Some(event)` - the next in-range event
    /// - `None` - the registration is gone
    pub async fn recv(&mut self) -> Option<DispatchEvent> {
        self.receiver.recv().await
    }

    /// Try to receive the next event without blocking.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(event))` - an event was waiting
    /// - `Ok(None)` - nothing waiting right now
    /// - `Err(DeliveryError::Closed)` - the registration is gone
    pub fn try_recv(&mut self) -> Result<Option<DispatchEvent>, DeliveryError> {
        match self.receiver.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => Err(DeliveryError::Closed),
        }
    }
}

impl Drop for ConnectionHandle {
    fn drop(&mut self) {
        let mut connections = self.connections.write();
        // Only remove the registration this handle was minted for; a rejoin
        // may have installed a newer one under the same id.
        if connections
            .registrations
            .get(&self.connection_id)
            .is_some_and(|registration| registration.generation == self.generation)
        {
            connections.remove(&self.connection_id);
            debug!(connection = %self.connection_id, "Connection handle dropped, deregistered");
        }
    }
}

impl Stream for ConnectionHandle {
    type Item = DispatchEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::{EventSink, ProximityBroker};
    use crate::events::{DispatchEvent, EventKind};
    use shared_types::{GeoPoint, Report, ReportCategory, UserId};
    use std::time::Duration;
    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    fn point(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng).unwrap()
    }

    fn report_at(location: GeoPoint) -> Report {
        Report::new(
            ReportCategory::Hazard,
            location,
            "downed power line".into(),
            UserId::new(),
            1_700_000_000_000,
        )
    }

    #[tokio::test]
    async fn test_recv_delivers_published_event() {
        let broker = ProximityBroker::new();
        let origin = point(0.0, 0.0);
        let mut handle = broker.join(ConnectionId::new(), origin);

        broker.publish(DispatchEvent::NewReport(report_at(origin))).await;

        let event = timeout(Duration::from_millis(100), handle.recv())
            .await
            .expect("timeout")
            .expect("event");
        assert_eq!(event.kind(), EventKind::NewReport);
    }

    #[tokio::test]
    async fn test_drop_deregisters() {
        let broker = ProximityBroker::new();
        let id = ConnectionId::new();

        {
            let _handle = broker.join(id, point(0.0, 0.0));
            assert_eq!(broker.connection_count(), 1);
        }
        assert_eq!(broker.connection_count(), 0);
    }

    #[tokio::test]
    async fn test_stale_drop_does_not_evict_rejoin() {
        let broker = ProximityBroker::new();
        let id = ConnectionId::new();
        let origin = point(0.0, 0.0);

        let old = broker.join(id, origin);
        let mut new = broker.join(id, origin);
        drop(old); // stale handle from before the rejoin

        assert_eq!(broker.connection_count(), 1);
        broker.publish(DispatchEvent::NewReport(report_at(origin))).await;
        assert!(new.try_recv().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_rejoin_closes_old_mailbox() {
        let broker = ProximityBroker::new();
        let id = ConnectionId::new();
        let origin = point(0.0, 0.0);

        let mut old = broker.join(id, origin);
        let _new = broker.join(id, origin);

        assert!(old.recv().await.is_none());
        assert_eq!(old.try_recv(), Err(DeliveryError::Closed));
    }

    #[tokio::test]
    async fn test_stream_adapter() {
        let broker = ProximityBroker::new();
        let origin = point(0.0, 0.0);
        let mut handle = broker.join(ConnectionId::new(), origin);

        broker.publish(DispatchEvent::NewReport(report_at(origin))).await;

        let event = timeout(Duration::from_millis(100), handle.next())
            .await
            .expect("timeout")
            .expect("stream item");
        assert_eq!(event.kind(), EventKind::NewReport);
    }
}
