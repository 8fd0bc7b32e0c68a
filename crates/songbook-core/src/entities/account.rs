//! Account entity - an identity that can sign in and own songs

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::value_objects::AccountId;

/// Days between a deletion request and the irreversible purge
pub const DELETION_GRACE_PERIOD_DAYS: i64 = 14;

/// How the account authenticates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    /// Email + password, verified by a one-time code
    #[default]
    Local,
    /// External identity provider; no password hash is stored
    Federated,
}

impl AuthProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Federated => "federated",
        }
    }
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "federated" => Ok(Self::Federated),
            other => Err(format!("unknown auth provider: {other}")),
        }
    }
}

/// Deletion sub-state of an account
///
/// `Purged` is not represented: a purged account no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionState {
    Active,
    PendingDeletion {
        requested_at: DateTime<Utc>,
        purge_deadline: DateTime<Utc>,
    },
}

/// Account entity
///
/// The password hash is deliberately not part of the entity; repositories
/// hand it out only through `get_password_hash`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    pub username: String,
    pub provider: AuthProvider,
    pub picture_url: Option<String>,
    pub is_blocked: bool,
    pub is_admin: bool,
    pub delete_requested_at: Option<DateTime<Utc>>,
    pub purge_deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new local (email + password) account
    pub fn new_local(email: String, username: String, now: DateTime<Utc>) -> Self {
        Self {
            id: AccountId::new(),
            email,
            username,
            provider: AuthProvider::Local,
            picture_url: None,
            is_blocked: false,
            is_admin: false,
            delete_requested_at: None,
            purge_deadline: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new account for a federated identity's first login
    pub fn new_federated(
        email: String,
        username: String,
        picture_url: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            provider: AuthProvider::Federated,
            picture_url,
            ..Self::new_local(email, username, now)
        }
    }

    /// Current deletion sub-state
    ///
    /// Both markers are set together, so one being present without the
    /// other is treated as active.
    pub fn deletion_state(&self) -> DeletionState {
        match (self.delete_requested_at, self.purge_deadline) {
            (Some(requested_at), Some(purge_deadline)) => DeletionState::PendingDeletion {
                requested_at,
                purge_deadline,
            },
            _ => DeletionState::Active,
        }
    }

    #[inline]
    pub fn is_pending_deletion(&self) -> bool {
        self.purge_deadline.is_some()
    }

    /// Whether the purge sweep may destroy this account at `now`
    pub fn is_purge_due(&self, now: DateTime<Utc>) -> bool {
        self.purge_deadline.is_some_and(|deadline| deadline <= now)
    }

    /// Remaining grace period, clamped at zero; `None` when not pending
    pub fn grace_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.purge_deadline
            .map(|deadline| (deadline - now).max(Duration::zero()))
    }

    /// Whether a password login is possible for this account
    #[inline]
    pub fn has_password(&self) -> bool {
        self.provider == AuthProvider::Local
    }
}

/// Compute the purge deadline for a deletion requested at `requested_at`.
/// `None` if the deadline falls outside the representable time range.
pub fn purge_deadline_for(
    requested_at: DateTime<Utc>,
    grace_period: Duration,
) -> Option<DateTime<Utc>> {
    requested_at.checked_add_signed(grace_period)
}

/// Default grace period as a `Duration`
pub fn default_grace_period() -> Duration {
    Duration::days(DELETION_GRACE_PERIOD_DAYS)
}
