// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! Session ledger.
//!
//! Sessions carry no trainer field; ownership follows the session's client.
//! Scoped reads first resolve the caller's live clients, then match sessions
//! with `client_id IN (...)`.

use crate::db::{collections, Db, Filter};
use crate::error::{AppError, Result};
use crate::middleware::TrainerScope;
use crate::models::patch::{self, Patch};
use crate::models::session::DEFAULT_DURATION_MINUTES;
use crate::models::{ClientSummary, Session, SessionStatus, SessionView};
use crate::services::clients;
use crate::time_utils::{format_utc_rfc3339, rfc3339};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub client_id: Uuid,
    #[serde(with = "rfc3339")]
    pub scheduled_at: DateTime<Utc>,
    /// Absent or zero means the default length.
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub notes: String,
}

/// Sparse session update. Status stays a string so an unknown value is a
/// validation error with the list of valid ones.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSessionRequest {
    #[serde(default, deserialize_with = "patch::timestamp")]
    pub scheduled_at: Patch<DateTime<Utc>>,
    #[serde(default)]
    pub duration_minutes: Patch<i32>,
    #[serde(default)]
    pub status: Patch<String>,
    #[serde(default)]
    pub notes: Patch<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Conjunctive list filters; `None` means unconstrained.
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    pub client_id: Option<Uuid>,
    pub status: Option<SessionStatus>,
    /// Inclusive lower bound on `scheduled_at`
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `scheduled_at`
    pub to: Option<DateTime<Utc>>,
}

pub fn parse_status(raw: &str) -> Result<SessionStatus> {
    raw.parse::<SessionStatus>()
        .map_err(|e| AppError::Validation(e.to_string()))
}

fn normalize_duration(duration: Option<i32>) -> Result<i32> {
    match duration {
        None | Some(0) => Ok(DEFAULT_DURATION_MINUTES),
        Some(d) if d < 0 => Err(AppError::Validation(
            "duration_minutes cannot be negative".to_string(),
        )),
        Some(d) => Ok(d),
    }
}

/// The caller's sessions matching `extra`, each with its client summary,
/// ascending by scheduled time.
pub async fn scoped_views(
    db: &Db,
    scope: &TrainerScope,
    only_client: Option<Uuid>,
    mut extra: Vec<Filter>,
) -> Result<Vec<SessionView>> {
    let summaries: HashMap<Uuid, ClientSummary> = clients::owned_clients(db, scope)
        .await?
        .iter()
        .filter(|c| only_client.map_or(true, |id| id == c.id))
        .map(|c| (c.id, ClientSummary::from(c)))
        .collect();

    extra.push(Filter::is_in("client_id", summaries.keys()));
    let mut sessions: Vec<Session> = db.query(collections::SESSIONS, extra).await?;
    sessions.sort_by(|a, b| {
        a.scheduled_at
            .cmp(&b.scheduled_at)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });

    Ok(sessions
        .into_iter()
        .map(|session| SessionView {
            client: summaries.get(&session.client_id).cloned(),
            session,
        })
        .collect())
}

pub async fn list(db: &Db, scope: &TrainerScope, filter: SessionFilter) -> Result<Vec<SessionView>> {
    let mut extra = Vec::new();
    if let Some(status) = filter.status {
        extra.push(Filter::eq("status", status));
    }
    if let Some(from) = filter.from {
        extra.push(Filter::gte("scheduled_at", format_utc_rfc3339(from)));
    }
    if let Some(to) = filter.to {
        extra.push(Filter::lte("scheduled_at", format_utc_rfc3339(to)));
    }

    let views = scoped_views(db, scope, filter.client_id, extra).await?;
    tracing::debug!(trainer_id = %scope.trainer_id(), count = views.len(), "Listed sessions");
    Ok(views)
}

pub async fn create(db: &Db, scope: &TrainerScope, req: CreateSessionRequest) -> Result<SessionView> {
    let client = clients::owned_client(db, scope, req.client_id).await?;

    let now = Utc::now();
    let session = Session {
        id: Uuid::new_v4(),
        client_id: client.id,
        scheduled_at: req.scheduled_at,
        duration_minutes: normalize_duration(req.duration_minutes)?,
        status: SessionStatus::Scheduled,
        notes: req.notes,
        created_at: now,
        updated_at: now,
    };

    db.put(collections::SESSIONS, &session.id.to_string(), &session)
        .await?;

    tracing::info!(session_id = %session.id, client_id = %client.id, "Session scheduled");
    Ok(SessionView {
        session,
        client: Some(ClientSummary::from(&client)),
    })
}

/// A live session whose client the caller owns, with that client's summary.
async fn owned_session(db: &Db, scope: &TrainerScope, session_id: Uuid) -> Result<SessionView> {
    let session = db
        .get::<Session>(collections::SESSIONS, &session_id.to_string())
        .await?
        .ok_or_else(|| AppError::not_found("Session"))?;

    let client = clients::owned_client(db, scope, session.client_id)
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) => AppError::not_found("Session"),
            other => other,
        })?;

    Ok(SessionView {
        session,
        client: Some(ClientSummary::from(&client)),
    })
}

pub async fn get(db: &Db, scope: &TrainerScope, session_id: Uuid) -> Result<SessionView> {
    owned_session(db, scope, session_id).await
}

pub async fn update(
    db: &Db,
    scope: &TrainerScope,
    session_id: Uuid,
    req: UpdateSessionRequest,
) -> Result<SessionView> {
    let mut view = owned_session(db, scope, session_id).await?;
    let session = &mut view.session;

    // Validate everything before touching the stored copy.
    let status = match req.status {
        Patch::Missing => None,
        Patch::Null => return Err(AppError::Validation("status cannot be null".to_string())),
        Patch::Value(raw) => Some(parse_status(&raw)?),
    };
    let duration = match req.duration_minutes {
        Patch::Missing => None,
        Patch::Null => Some(DEFAULT_DURATION_MINUTES),
        Patch::Value(d) => Some(normalize_duration(Some(d))?),
    };

    req.scheduled_at
        .apply_required(&mut session.scheduled_at, "scheduled_at")
        .map_err(AppError::Validation)?;
    req.notes.apply_to_text(&mut session.notes);
    if let Some(status) = status {
        session.status = status;
    }
    if let Some(duration) = duration {
        session.duration_minutes = duration;
    }
    session.updated_at = Utc::now();

    db.put(collections::SESSIONS, &session.id.to_string(), &*session)
        .await?;

    tracing::info!(session_id = %session.id, "Session updated");
    Ok(view)
}

pub async fn update_status(
    db: &Db,
    scope: &TrainerScope,
    session_id: Uuid,
    raw_status: &str,
) -> Result<SessionView> {
    let status = parse_status(raw_status)?;
    let mut view = owned_session(db, scope, session_id).await?;

    let previous = view.session.status;
    view.session.status = status;
    view.session.updated_at = Utc::now();
    db.put(
        collections::SESSIONS,
        &view.session.id.to_string(),
        &view.session,
    )
    .await?;

    tracing::info!(
        session_id = %view.session.id,
        from = %previous,
        to = %status,
        "Session status changed"
    );
    Ok(view)
}

pub async fn delete(db: &Db, scope: &TrainerScope, session_id: Uuid) -> Result<()> {
    let view = owned_session(db, scope, session_id).await?;
    if !db
        .soft_delete(collections::SESSIONS, &view.session.id.to_string())
        .await?
    {
        return Err(AppError::not_found("Session"));
    }

    tracing::info!(session_id = %view.session.id, "Session deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::clients::CreateClientRequest;
    use crate::time_utils::parse_rfc3339;

    async fn setup() -> (Db, TrainerScope, Uuid) {
        let db = Db::memory();
        let scope = TrainerScope::new(Uuid::new_v4());
        let client = clients::create(
            &db,
            &scope,
            CreateClientRequest {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                phone: String::new(),
                email: String::new(),
                total_package_size: 10,
                package_start_date: None,
                notes: String::new(),
            },
        )
        .await
        .unwrap();
        (db, scope, client.id)
    }

    fn at(raw: &str) -> DateTime<Utc> {
        parse_rfc3339(raw).unwrap()
    }

    fn request(client_id: Uuid, when: &str, duration: Option<i32>) -> CreateSessionRequest {
        CreateSessionRequest {
            client_id,
            scheduled_at: at(when),
            duration_minutes: duration,
            notes: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_defaults() {
        let (db, scope, client_id) = setup().await;

        let view = create(&db, &scope, request(client_id, "2026-02-01T10:00:00Z", None))
            .await
            .unwrap();
        assert_eq!(view.session.duration_minutes, 60);
        assert_eq!(view.session.status, SessionStatus::Scheduled);
        assert_eq!(view.client.unwrap().first_name, "Jane");

        let zero = create(&db, &scope, request(client_id, "2026-02-01T12:00:00Z", Some(0)))
            .await
            .unwrap();
        assert_eq!(zero.session.duration_minutes, 60);

        let custom = create(&db, &scope, request(client_id, "2026-02-01T14:00:00Z", Some(45)))
            .await
            .unwrap();
        assert_eq!(custom.session.duration_minutes, 45);
    }

    #[tokio::test]
    async fn test_create_for_unknown_client_is_not_found() {
        let (db, _, client_id) = setup().await;
        let stranger = TrainerScope::new(Uuid::new_v4());

        let err = create(&db, &stranger, request(client_id, "2026-02-01T10:00:00Z", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Client not found"));
    }

    #[tokio::test]
    async fn test_list_filters_and_orders() {
        let (db, scope, client_id) = setup().await;
        let late = create(&db, &scope, request(client_id, "2026-02-03T10:00:00Z", None))
            .await
            .unwrap();
        let early = create(&db, &scope, request(client_id, "2026-02-01T10:00:00Z", None))
            .await
            .unwrap();
        let middle = create(&db, &scope, request(client_id, "2026-02-02T10:00:00Z", None))
            .await
            .unwrap();
        update_status(&db, &scope, middle.session.id, "completed")
            .await
            .unwrap();

        let all = list(&db, &scope, SessionFilter::default()).await.unwrap();
        let ids: Vec<Uuid> = all.iter().map(|v| v.session.id).collect();
        assert_eq!(ids, vec![early.session.id, middle.session.id, late.session.id]);

        let completed = list(
            &db,
            &scope,
            SessionFilter {
                status: Some(SessionStatus::Completed),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].session.id, middle.session.id);

        let ranged = list(
            &db,
            &scope,
            SessionFilter {
                from: Some(at("2026-02-02T00:00:00Z")),
                to: Some(at("2026-02-03T10:00:00Z")),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(ranged.len(), 2);

        let other_client = list(
            &db,
            &scope,
            SessionFilter {
                client_id: Some(Uuid::new_v4()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(other_client.is_empty());
    }

    #[tokio::test]
    async fn test_status_validation() {
        let (db, scope, client_id) = setup().await;
        let view = create(&db, &scope, request(client_id, "2026-02-01T10:00:00Z", None))
            .await
            .unwrap();

        let err = update_status(&db, &scope, view.session.id, "finished")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("no_show")));

        let req: UpdateSessionRequest = serde_json::from_str(r#"{"status": "done"}"#).unwrap();
        assert!(matches!(
            update(&db, &scope, view.session.id, req).await.unwrap_err(),
            AppError::Validation(_)
        ));

        // Any status is reachable from any other.
        for status in ["cancelled", "no_show", "scheduled", "completed"] {
            let v = update_status(&db, &scope, view.session.id, status)
                .await
                .unwrap();
            assert_eq!(v.session.status.as_str(), status);
        }
    }

    #[tokio::test]
    async fn test_partial_update_and_soft_delete() {
        let (db, scope, client_id) = setup().await;
        let view = create(&db, &scope, request(client_id, "2026-02-01T10:00:00Z", Some(30)))
            .await
            .unwrap();

        let req: UpdateSessionRequest = serde_json::from_str(r#"{"notes": "bring bands"}"#).unwrap();
        let updated = update(&db, &scope, view.session.id, req).await.unwrap();
        assert_eq!(updated.session.notes, "bring bands");
        assert_eq!(updated.session.duration_minutes, 30);
        assert_eq!(updated.session.scheduled_at, view.session.scheduled_at);

        delete(&db, &scope, view.session.id).await.unwrap();
        assert!(matches!(
            get(&db, &scope, view.session.id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(list(&db, &scope, SessionFilter::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_sessions_of_other_trainers_are_hidden() {
        let (db, scope, client_id) = setup().await;
        let view = create(&db, &scope, request(client_id, "2026-02-01T10:00:00Z", None))
            .await
            .unwrap();
        let stranger = TrainerScope::new(Uuid::new_v4());

        assert!(matches!(
            get(&db, &stranger, view.session.id).await.unwrap_err(),
            AppError::NotFound(ref m) if m == "Session not found"
        ));
        assert!(update_status(&db, &stranger, view.session.id, "completed")
            .await
            .is_err());
        assert!(list(&db, &stranger, SessionFilter::default())
            .await
            .unwrap()
            .is_empty());
    }
}
