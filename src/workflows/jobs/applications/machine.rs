//! Transition table for the application workflow.
//!
//! The table is closed: every status pair not listed here is illegal, and
//! terminal statuses have no outgoing edges at all.

use chrono::{DateTime, Utc};

use super::domain::{Application, ApplicationStatus, HistoryEntry};

/// Transition rejected by the table or its guards.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("no transition from '{from}' to '{to}' is permitted")]
    Illegal {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
    #[error("a note explaining the rejection is required")]
    NoteRequired,
}

/// Statuses reachable from `from` in a single transition.
pub const fn next_statuses(from: ApplicationStatus) -> &'static [ApplicationStatus] {
    use ApplicationStatus::*;

    match from {
        Applied => &[Reviewing, Rejected, Withdrawn],
        Reviewing => &[Shortlisted, Rejected, Withdrawn],
        Shortlisted => &[Interview, Rejected, Withdrawn],
        Interview => &[Offered, Rejected, Withdrawn],
        Offered => &[Accepted, Rejected, Withdrawn],
        Accepted | Rejected | Withdrawn => &[],
    }
}

pub fn permits(from: ApplicationStatus, to: ApplicationStatus) -> bool {
    next_statuses(from).contains(&to)
}

/// Check a requested edge without mutating anything.
///
/// Rejections are sponsor- or agent-initiated and must carry a non-empty note
/// so the job seeker sees why.
pub fn validate_transition(
    from: ApplicationStatus,
    to: ApplicationStatus,
    note: Option<&str>,
) -> Result<(), TransitionError> {
    if !permits(from, to) {
        return Err(TransitionError::Illegal { from, to });
    }

    if to == ApplicationStatus::Rejected && note.map(str::trim).map_or(true, str::is_empty) {
        return Err(TransitionError::NoteRequired);
    }

    Ok(())
}

/// Apply a validated transition: status, history append, and version bump
/// happen together so the three can never disagree.
pub fn apply_transition(
    application: &mut Application,
    to: ApplicationStatus,
    note: Option<String>,
    now: DateTime<Utc>,
) -> Result<(), TransitionError> {
    validate_transition(application.status, to, note.as_deref())?;

    application.status = to;
    application.history.push(HistoryEntry {
        status: to,
        changed_at: now,
        note,
    });
    application.version += 1;

    Ok(())
}
