// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! Package accounting: session counts per client, derived on read.

use crate::db::{collections, Db, Filter};
use crate::error::Result;
use crate::models::{PackageStats, Session};
use std::collections::HashMap;
use uuid::Uuid;

/// Status counts over one client's live sessions.
pub async fn stats(db: &Db, client_id: Uuid) -> Result<PackageStats> {
    let sessions: Vec<Session> = db
        .query(collections::SESSIONS, vec![Filter::eq("client_id", client_id)])
        .await?;
    Ok(PackageStats::tally(sessions.iter().map(|s| s.status)))
}

/// Status counts for many clients with one fetch. Clients without sessions
/// get zeroed stats.
pub async fn stats_by_client(db: &Db, client_ids: &[Uuid]) -> Result<HashMap<Uuid, PackageStats>> {
    let mut by_client: HashMap<Uuid, PackageStats> = client_ids
        .iter()
        .map(|id| (*id, PackageStats::default()))
        .collect();

    let sessions: Vec<Session> = db
        .query(
            collections::SESSIONS,
            vec![Filter::is_in("client_id", client_ids)],
        )
        .await?;

    for session in sessions {
        by_client
            .entry(session.client_id)
            .or_default()
            .record(session.status);
    }

    Ok(by_client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionStatus;
    use chrono::Utc;

    async fn add_session(db: &Db, client_id: Uuid, status: SessionStatus) -> Uuid {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            client_id,
            scheduled_at: now,
            duration_minutes: 60,
            status,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        };
        db.put(collections::SESSIONS, &session.id.to_string(), &session)
            .await
            .unwrap();
        session.id
    }

    #[tokio::test]
    async fn test_stats_skip_deleted_sessions() {
        let db = Db::memory();
        let client = Uuid::new_v4();
        add_session(&db, client, SessionStatus::Completed).await;
        let gone = add_session(&db, client, SessionStatus::Completed).await;
        add_session(&db, client, SessionStatus::Cancelled).await;
        add_session(&db, Uuid::new_v4(), SessionStatus::Completed).await;

        db.soft_delete(collections::SESSIONS, &gone.to_string())
            .await
            .unwrap();

        let stats = stats(&db, client).await.unwrap();
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.cancelled, 1);
        assert_eq!(stats.remaining(4), 3);
    }

    #[tokio::test]
    async fn test_stats_by_client_includes_idle_clients() {
        let db = Db::memory();
        let busy = Uuid::new_v4();
        let idle = Uuid::new_v4();
        add_session(&db, busy, SessionStatus::NoShow).await;
        add_session(&db, busy, SessionStatus::Scheduled).await;

        let all = stats_by_client(&db, &[busy, idle]).await.unwrap();
        assert_eq!(all[&busy].no_show, 1);
        assert_eq!(all[&busy].scheduled, 1);
        assert_eq!(all[&idle], PackageStats::default());
    }
}
