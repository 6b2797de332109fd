//! Pure translation from engine events to notification intents. No I/O here;
//! delivery and duplicate suppression belong to the dispatcher behind
//! [`super::repository::NotificationDispatcher`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{Application, Document, JobSeekerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ApplicationStatusChanged,
    DocumentExpiring,
}

impl NotificationKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ApplicationStatusChanged => "application_status_changed",
            Self::DocumentExpiring => "document_expiring",
        }
    }
}

/// Outbound notification payload keyed for at-most-once delivery.
///
/// `dedupe_key` is derived from the triggering event, so retrying a send after
/// a transient failure can never double-notify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationIntent {
    pub recipient: JobSeekerId,
    pub kind: NotificationKind,
    pub payload: BTreeMap<String, String>,
    pub dedupe_key: String,
}

/// One intent per (application, transition).
pub fn status_change_intent(application: &Application) -> NotificationIntent {
    let mut payload = BTreeMap::new();
    payload.insert("application_id".to_string(), application.id.0.clone());
    payload.insert("job_id".to_string(), application.job_id.0.clone());
    payload.insert(
        "status".to_string(),
        application.status.label().to_string(),
    );
    if let Some(note) = application
        .history
        .last()
        .and_then(|entry| entry.note.as_ref())
    {
        payload.insert("note".to_string(), note.clone());
    }

    NotificationIntent {
        recipient: application.seeker_id.clone(),
        kind: NotificationKind::ApplicationStatusChanged,
        payload,
        dedupe_key: format!("{}:{}", application.id.0, application.status.label()),
    }
}

/// One intent per (document, expiry cycle). The cycle is identified by the
/// expiry date itself: a renewed document starts a fresh cycle.
pub fn document_expiry_intent(document: &Document) -> NotificationIntent {
    let expiry = document
        .expiry_date
        .map(|date| date.date_naive().to_string())
        .unwrap_or_else(|| "none".to_string());

    let mut payload = BTreeMap::new();
    payload.insert("document_id".to_string(), document.id.0.clone());
    payload.insert(
        "document_type".to_string(),
        document.doc_type.code().to_string(),
    );
    payload.insert("expires_on".to_string(), expiry.clone());

    NotificationIntent {
        recipient: document.owner.clone(),
        kind: NotificationKind::DocumentExpiring,
        payload,
        dedupe_key: format!("{}:{}", document.id.0, expiry),
    }
}
