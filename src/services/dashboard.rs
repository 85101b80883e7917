// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! Read-only dashboard and calendar views across a trainer's clients.

use crate::db::{Db, Filter};
use crate::error::Result;
use crate::middleware::TrainerScope;
use crate::models::{PackageStats, SessionStatus, SessionView};
use crate::services::{clients, sessions};
use crate::time_utils::{day_window, format_utc_rfc3339, week_window};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Sessions shown in the "upcoming" list.
pub const UPCOMING_LIMIT: usize = 5;

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub today_sessions: Vec<SessionView>,
    pub total_clients: i64,
    pub total_sessions: i64,
    pub weekly_stats: PackageStats,
    pub upcoming_sessions: Vec<SessionView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CalendarResponse {
    pub sessions: Vec<SessionView>,
}

/// Dashboard as of `now`; "today" and "this week" follow `tz`.
pub async fn dashboard(
    db: &Db,
    scope: &TrainerScope,
    tz: FixedOffset,
    now: DateTime<Utc>,
) -> Result<DashboardResponse> {
    let total_clients = clients::owned_clients(db, scope).await?.len() as i64;

    // One fetch of every live session; the windows are cut in memory.
    let all = sessions::scoped_views(db, scope, None, Vec::new()).await?;

    let today = day_window(now, tz);
    let week = week_window(now, tz);

    let today_sessions = all
        .iter()
        .filter(|v| v.session.scheduled_at >= today.start && v.session.scheduled_at < today.end)
        .cloned()
        .collect();

    let weekly_stats = PackageStats::tally(
        all.iter()
            .filter(|v| v.session.scheduled_at >= week.start && v.session.scheduled_at < week.end)
            .map(|v| v.session.status),
    );

    let upcoming_sessions = all
        .iter()
        .filter(|v| v.session.status == SessionStatus::Scheduled && v.session.scheduled_at > now)
        .take(UPCOMING_LIMIT)
        .cloned()
        .collect();

    tracing::debug!(trainer_id = %scope.trainer_id(), sessions = all.len(), "Built dashboard");

    Ok(DashboardResponse {
        today_sessions,
        total_clients,
        total_sessions: all.len() as i64,
        weekly_stats,
        upcoming_sessions,
    })
}

/// Sessions in an optional inclusive range, ascending.
pub async fn calendar(
    db: &Db,
    scope: &TrainerScope,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Result<CalendarResponse> {
    let mut filters = Vec::new();
    if let Some(from) = from {
        filters.push(Filter::gte("scheduled_at", format_utc_rfc3339(from)));
    }
    if let Some(to) = to {
        filters.push(Filter::lte("scheduled_at", format_utc_rfc3339(to)));
    }

    Ok(CalendarResponse {
        sessions: sessions::scoped_views(db, scope, None, filters).await?,
    })
}
