//! # Alert Service
//!
//! Drives the lifecycle state machine over the store port and publishes
//! state changes toward nearby connections.
//!
//! Writes use compare-and-swap on the alert's version: the expiry sweep and
//! an operator can race on the same alert, and the loser of the race
//! re-reads and re-applies (or discovers the transition is no longer legal).

use crate::domain::lifecycle::{transition, AlertAction};
use crate::domain::AlertError;
use crate::ports::inbound::{AlertsApi, CreateAlertInput};
use crate::ports::outbound::AlertStore;
use async_trait::async_trait;
use beacon_dispatch::{DispatchEvent, EventSink};
use shared_types::geo::validate_radius_m;
use shared_types::{
    Actor, ActorRole, Alert, AlertId, AlertMetadata, AlertSource, AlertStatus, Clock, GeoPoint,
    TargetArea, Timestamp,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Version-conflict retries before giving up on a write.
const MAX_CONFLICT_RETRIES: u32 = 3;

/// Alert subsystem service.
pub struct AlertService<S, E>
where
    S: AlertStore,
    E: EventSink,
{
    store: Arc<S>,
    events: Arc<E>,
    clock: Arc<dyn Clock>,
}

impl<S, E> AlertService<S, E>
where
    S: AlertStore,
    E: EventSink,
{
    pub fn new(store: Arc<S>, events: Arc<E>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            events,
            clock,
        }
    }

    async fn load(&self, alert_id: AlertId) -> Result<Alert, AlertError> {
        match self.store.get(alert_id).await {
            Ok(alert) => Ok(alert),
            Err(shared_types::StoreError::NotFound(_)) => Err(AlertError::NotFound(alert_id)),
            Err(e) => Err(e.into()),
        }
    }

    fn authorize(actor: Actor, action: AlertAction) -> Result<(), AlertError> {
        let allowed = match action {
            AlertAction::Reactivate => actor.role.can_reactivate(),
            _ => actor.role.is_privileged(),
        };
        if allowed {
            Ok(())
        } else {
            Err(AlertError::Unauthorized {
                action: action.verb(),
            })
        }
    }

    fn event_for(action: AlertAction, alert: Alert) -> DispatchEvent {
        match action {
            AlertAction::Resolve => DispatchEvent::AlertResolved(alert),
            AlertAction::Cancel => DispatchEvent::AlertCancelled(alert),
            AlertAction::Expire | AlertAction::Reactivate => DispatchEvent::AlertUpdated(alert),
        }
    }
}

#[async_trait]
impl<S, E> AlertsApi for AlertService<S, E>
where
    S: AlertStore,
    E: EventSink,
{
    async fn create_alert(
        &self,
        input: CreateAlertInput,
        actor: Actor,
    ) -> Result<Alert, AlertError> {
        if !actor.role.is_privileged() {
            return Err(AlertError::Unauthorized { action: "create" });
        }
        if input.title.trim().is_empty() {
            return Err(AlertError::Validation("title must not be empty".into()));
        }

        let center = GeoPoint::new(input.lat, input.lng)?;
        let radius_m = validate_radius_m(input.radius_m)?;

        let now = self.clock.now();
        if let Some(until) = input.effective_until {
            if until <= now {
                return Err(AlertError::Validation(
                    "effective window is already over".into(),
                ));
            }
        }

        let alert = Alert {
            id: AlertId::new(),
            title: input.title,
            description: input.description,
            severity: input.severity,
            area: TargetArea::new(center, radius_m),
            status: AlertStatus::Active,
            source: input.source,
            metadata: AlertMetadata {
                community_verified: matches!(input.source, AlertSource::Report { .. }),
                admin_verified: actor.role == ActorRole::Admin,
            },
            effective_until: input.effective_until,
            created_at: now,
            updated_at: now,
            version: 0,
        };
        self.store.insert(alert.clone()).await?;

        info!(
            alert = %alert.id,
            severity = %alert.severity,
            radius_m = alert.area.radius_m,
            source = ?alert.source,
            "Alert created"
        );
        self.events
            .publish(DispatchEvent::NewAlert(alert.clone()))
            .await;

        Ok(alert)
    }

    async fn transition_alert(
        &self,
        alert_id: AlertId,
        action: AlertAction,
        actor: Actor,
        reason: Option<String>,
    ) -> Result<Alert, AlertError> {
        Self::authorize(actor, action)?;

        let mut attempts = 0u32;
        let alert = loop {
            let mut alert = self.load(alert_id).await?;
            alert.status = transition(alert.status, action)?;
            alert.updated_at = self.clock.now();
            if action == AlertAction::Reactivate {
                // A revived stale window would let the sweep re-expire the
                // alert immediately; the operator sets a new one explicitly.
                alert.effective_until = None;
            }

            match self.store.update(alert).await {
                Ok(updated) => break updated,
                Err(shared_types::StoreError::VersionConflict { .. })
                    if attempts < MAX_CONFLICT_RETRIES =>
                {
                    attempts += 1;
                    debug!(alert = %alert_id, attempts, "Transition raced a concurrent write, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        };

        info!(
            alert = %alert_id,
            action = %action,
            status = %alert.status,
            actor = %actor.user_id,
            reason = reason.as_deref().unwrap_or("-"),
            "Alert transitioned"
        );
        self.events
            .publish(Self::event_for(action, alert.clone()))
            .await;

        Ok(alert)
    }

    async fn get_alert(&self, alert_id: AlertId) -> Result<Alert, AlertError> {
        self.load(alert_id).await
    }

    async fn active_alerts_near(
        &self,
        lat: f64,
        lng: f64,
        radius_m: f64,
    ) -> Result<Vec<Alert>, AlertError> {
        let origin = GeoPoint::new(lat, lng)?;
        let radius_m = validate_radius_m(radius_m)?;

        let alerts = self.store.list().await?;
        Ok(alerts
            .into_iter()
            .filter(|alert| alert.status == AlertStatus::Active)
            .filter(|alert| origin.within_m(&alert.area.center, radius_m))
            .collect())
    }

    async fn expire_due(&self, now: Timestamp) -> Result<Vec<AlertId>, AlertError> {
        let due: Vec<AlertId> = self
            .store
            .list()
            .await?
            .into_iter()
            .filter(|alert| alert.status == AlertStatus::Active)
            .filter(|alert| alert.effective_until.is_some_and(|until| now > until))
            .map(|alert| alert.id)
            .collect();

        let mut expired = Vec::with_capacity(due.len());
        for alert_id in due {
            match self
                .transition_alert(alert_id, AlertAction::Expire, Actor::system(), None)
                .await
            {
                Ok(_) => expired.push(alert_id),
                // An operator beat the sweep to this alert; nothing to do.
                Err(AlertError::InvalidTransition { .. }) | Err(AlertError::NotFound(_)) => {}
                Err(e) => {
                    warn!(alert = %alert_id, error = %e, "Expiry sweep failed for alert");
                }
            }
        }

        Ok(expired)
    }
}
