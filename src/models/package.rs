// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! Package accounting derived from session statuses.
//!
//! Nothing here is stored: counts are recomputed from the session ledger on
//! every read, so they cannot go stale.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::session::SessionStatus;

/// Session counts per status for one client (or one window).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PackageStats {
    pub scheduled: i64,
    pub completed: i64,
    pub no_show: i64,
    pub cancelled: i64,
}

impl PackageStats {
    /// Count statuses in one pass.
    pub fn tally<I: IntoIterator<Item = SessionStatus>>(statuses: I) -> Self {
        let mut stats = Self::default();
        for status in statuses {
            stats.record(status);
        }
        stats
    }

    pub fn record(&mut self, status: SessionStatus) {
        match status {
            SessionStatus::Scheduled => self.scheduled += 1,
            SessionStatus::Completed => self.completed += 1,
            SessionStatus::NoShow => self.no_show += 1,
            SessionStatus::Cancelled => self.cancelled += 1,
        }
    }

    pub fn count(&self, status: SessionStatus) -> i64 {
        match status {
            SessionStatus::Scheduled => self.scheduled,
            SessionStatus::Completed => self.completed,
            SessionStatus::NoShow => self.no_show,
            SessionStatus::Cancelled => self.cancelled,
        }
    }

    /// Sessions that consume package allowance.
    pub fn used(&self) -> i64 {
        SessionStatus::ALL
            .iter()
            .filter(|s| s.is_used())
            .map(|&s| self.count(s))
            .sum()
    }

    /// Remaining allowance; negative when the package is over-used.
    pub fn remaining(&self, total_package_size: i64) -> i64 {
        total_package_size - self.used()
    }
}

/// Derived package fields attached to a client view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSummary {
    pub remaining_sessions: i64,
    pub completed_sessions: i64,
    pub no_show_sessions: i64,
    pub cancelled_sessions: i64,
    pub scheduled_sessions: i64,
}

impl PackageSummary {
    pub fn new(total_package_size: i64, stats: PackageStats) -> Self {
        Self {
            remaining_sessions: stats.remaining(total_package_size),
            completed_sessions: stats.completed,
            no_show_sessions: stats.no_show,
            cancelled_sessions: stats.cancelled,
            scheduled_sessions: stats.scheduled,
        }
    }
}
