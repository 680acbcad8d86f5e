//! # Notification Policy
//!
//! Maps a delivered event to the client-side presentation directive: how
//! urgent it is and whether it should make noise, vibrate, or demand an
//! explicit acknowledgement. Pure functions of the event; the transport
//! attaches the directive to whatever it sends down the wire.

use crate::events::DispatchEvent;
use serde::{Deserialize, Serialize};
use shared_types::AlertSeverity;

/// Client-facing urgency level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Info,
    Warning,
    Urgent,
    Critical,
}

/// How the client should present a delivered event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDirective {
    pub urgency: Urgency,
    pub sound: bool,
    pub vibrate: bool,
    /// The client must keep the notification on screen until acknowledged.
    pub require_interaction: bool,
}

impl NotificationDirective {
    const fn silent(urgency: Urgency) -> Self {
        Self {
            urgency,
            sound: false,
            vibrate: false,
            require_interaction: false,
        }
    }
}

/// Presentation directive for an event.
#[must_use]
pub fn directive_for(event: &DispatchEvent) -> NotificationDirective {
    match event {
        DispatchEvent::NewAlert(alert) | DispatchEvent::AlertUpdated(alert) => {
            for_severity(alert.severity)
        }
        DispatchEvent::ReportVerified(_) => NotificationDirective {
            urgency: Urgency::Warning,
            sound: false,
            vibrate: true,
            require_interaction: false,
        },
        DispatchEvent::NewReport(_)
        | DispatchEvent::AlertResolved(_)
        | DispatchEvent::AlertCancelled(_) => NotificationDirective::silent(Urgency::Info),
    }
}

fn for_severity(severity: AlertSeverity) -> NotificationDirective {
    match severity {
        AlertSeverity::Critical => NotificationDirective {
            urgency: Urgency::Critical,
            sound: true,
            vibrate: true,
            require_interaction: true,
        },
        AlertSeverity::High => NotificationDirective {
            urgency: Urgency::Urgent,
            sound: true,
            vibrate: true,
            require_interaction: false,
        },
        AlertSeverity::Medium => NotificationDirective {
            urgency: Urgency::Warning,
            sound: false,
            vibrate: true,
            require_interaction: false,
        },
        AlertSeverity::Low => NotificationDirective::silent(Urgency::Info),
    }
}
