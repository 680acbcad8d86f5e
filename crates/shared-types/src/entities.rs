//! # Core Domain Entities
//!
//! Defines the entities shared across subsystems.
//!
//! ## Clusters
//!
//! - **Reports**: `Report`, `VoteRecord`, `VoteTally`, `ReportStatus`
//! - **Alerts**: `Alert`, `TargetArea`, `AlertSeverity`, `AlertStatus`
//! - **Actors**: `Actor`, `ActorRole`

use crate::geo::{GeoPoint, MAX_ALERT_RADIUS_M, MIN_ALERT_RADIUS_M};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// Unique identifier for a community incident report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(pub Uuid);

/// Unique identifier for an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertId(pub Uuid);

/// Unique identifier for an authenticated user.
///
/// Supplied by the identity collaborator; this core never parses or
/// re-derives it. Keyed lookups use this type directly so mixed string
/// representations of the same id can never diverge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

/// Unique identifier for a live client connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub Uuid);

macro_rules! impl_id {
    ($name:ident) => {
        impl $name {
            /// Generates a fresh random id.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

impl_id!(ReportId);
impl_id!(AlertId);
impl_id!(UserId);
impl_id!(ConnectionId);

// =============================================================================
// CLUSTER A: REPORTS
// =============================================================================

/// Incident category of a community report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportCategory {
    Fire,
    Flood,
    Accident,
    Crime,
    Medical,
    Hazard,
    Other,
}

/// Lifecycle status of a community report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Awaiting community verification.
    Pending,
    /// Confirmed by the community; an alert has been issued.
    Verified,
    /// Dismissed by moderation.
    Rejected,
    /// The underlying incident is over.
    Resolved,
    /// Escalated to authorities outside the community flow.
    Escalated,
    /// Flagged for moderation review.
    Flagged,
}

impl ReportStatus {
    /// Returns true if no further votes are accepted in this status.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::Rejected)
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
            Self::Resolved => "resolved",
            Self::Escalated => "escalated",
            Self::Flagged => "flagged",
        };
        write!(f, "{s}")
    }
}

/// A single user's stance on a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteValue {
    Confirm,
    Deny,
}

/// One user's vote on one report.
///
/// A user has at most one `VoteRecord` per report; re-voting replaces the
/// value in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub user_id: UserId,
    pub value: VoteValue,
    pub voted_at: Timestamp,
}

/// Aggregate confirm/deny counts for a report.
///
/// Always derivable from the vote map: `confirm + deny == votes.len()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub confirm: u32,
    pub deny: u32,
}

impl VoteTally {
    /// Total number of distinct voters.
    #[must_use]
    pub fn total(self) -> u32 {
        self.confirm + self.deny
    }
}

/// An unverified, community-submitted claim of an incident at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub category: ReportCategory,
    pub location: GeoPoint,
    pub description: String,
    pub status: ReportStatus,
    /// Derived aggregate of `votes`; never drifts from it.
    pub tally: VoteTally,
    /// One entry per distinct voter, keyed by canonical user id.
    pub votes: HashMap<UserId, VoteRecord>,
    pub reported_by: UserId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Monotonic write counter for optimistic-concurrency stores.
    pub version: u64,
}

impl Report {
    /// Creates a fresh pending report with an empty ledger.
    #[must_use]
    pub fn new(
        category: ReportCategory,
        location: GeoPoint,
        description: String,
        reported_by: UserId,
        now: Timestamp,
    ) -> Self {
        Self {
            id: ReportId::new(),
            category,
            location,
            description,
            status: ReportStatus::Pending,
            tally: VoteTally::default(),
            votes: HashMap::new(),
            reported_by,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }
}

// =============================================================================
// CLUSTER B: ALERTS
// =============================================================================

/// Severity of an alert, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        };
        write!(f, "{s}")
    }
}

/// Lifecycle status of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Active,
    Resolved,
    Cancelled,
    Expired,
}

impl AlertStatus {
    /// Resolved, Cancelled, and Expired are terminal; only a privileged
    /// reactivation leaves them.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Active => "active",
            Self::Resolved => "resolved",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        };
        write!(f, "{s}")
    }
}

/// Where an alert came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AlertSource {
    /// Auto-escalated from a community report.
    Report { report_id: ReportId },
    /// Issued directly by a privileged actor.
    Manual,
}

/// Verification provenance flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertMetadata {
    /// Set when the alert was produced by community escalation.
    pub community_verified: bool,
    /// Set when an administrator has vetted the alert.
    pub admin_verified: bool,
}

/// Geographic effect area of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetArea {
    pub center: GeoPoint,
    /// Effect radius in meters, clamped into the allowed band.
    pub radius_m: f64,
}

impl TargetArea {
    /// Builds an area, clamping the radius into
    /// [`MIN_ALERT_RADIUS_M`, `MAX_ALERT_RADIUS_M`].
    #[must_use]
    pub fn new(center: GeoPoint, radius_m: f64) -> Self {
        Self {
            center,
            radius_m: radius_m.clamp(MIN_ALERT_RADIUS_M, MAX_ALERT_RADIUS_M),
        }
    }
}

/// An authoritative or escalated notice of an emergency with a geographic
/// effect area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub title: String,
    pub description: String,
    pub severity: AlertSeverity,
    pub area: TargetArea,
    pub status: AlertStatus,
    pub source: AlertSource,
    pub metadata: AlertMetadata,
    /// When set, the expiry sweep moves the alert to Expired past this time.
    pub effective_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Monotonic write counter for optimistic-concurrency stores.
    pub version: u64,
}

// =============================================================================
// CLUSTER C: ACTORS
// =============================================================================

/// Role attached to an authenticated caller by the identity collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Citizen,
    Responder,
    Admin,
    /// Internal automation (e.g. the expiry sweep).
    System,
}

impl ActorRole {
    /// Roles allowed to manage alert lifecycles and moderate reports.
    #[must_use]
    pub fn is_privileged(self) -> bool {
        matches!(self, Self::Responder | Self::Admin | Self::System)
    }

    /// Roles allowed to reactivate a terminal alert.
    #[must_use]
    pub fn can_reactivate(self) -> bool {
        matches!(self, Self::Admin | Self::System)
    }
}

/// An already-authenticated caller. This core trusts the identity
/// collaborator that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub role: ActorRole,
}

impl Actor {
    #[must_use]
    pub fn new(user_id: UserId, role: ActorRole) -> Self {
        Self { user_id, role }
    }

    /// The internal system actor used by automation.
    #[must_use]
    pub fn system() -> Self {
        Self {
            user_id: UserId(Uuid::nil()),
            role: ActorRole::System,
        }
    }
}
