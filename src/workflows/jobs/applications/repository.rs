//! Collaborator contracts the engine consumes. Abstract on purpose: the
//! service module can be exercised in isolation and the persistence boundary
//! supplies the locking and conditional-write primitives.

use chrono::{DateTime, Utc};

use super::domain::{
    Application, ApplicationId, ApplicationStatus, Document, DocumentId, JobId, JobPosting,
    JobSeekerId, Profile,
};
use super::eligibility::EligibilityVerdict;
use super::machine::TransitionError;
use super::notifications::NotificationIntent;

/// Error enumeration shared by the lookup-style store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("record already exists or lost a concurrent write")]
    Conflict,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub trait JobStore: Send + Sync {
    fn job(&self, id: &JobId) -> Result<JobPosting, StoreError>;
}

pub trait ProfileStore: Send + Sync {
    fn profile(&self, id: &JobSeekerId) -> Result<Profile, StoreError>;
}

pub trait DocumentStore: Send + Sync {
    /// Documents owned by one job seeker, in stable id order.
    fn documents_for(&self, owner: &JobSeekerId) -> Result<Vec<Document>, StoreError>;

    /// Every stored document; input to the expiration sweep.
    fn all_documents(&self) -> Result<Vec<Document>, StoreError>;

    /// Conditional write claiming a document's current expiry cycle.
    ///
    /// Fails with `Conflict` when the flag is already set, so two concurrent
    /// sweeps cannot both fire a notification for the same document.
    fn set_notification_sent(&self, id: &DocumentId) -> Result<(), StoreError>;
}

/// Re-evaluation hook run inside the application store's critical section, so
/// creation never trusts a verdict computed before the lock was taken.
pub type EligibilityRecheck<'a> = dyn Fn() -> Result<EligibilityVerdict, StoreError> + 'a;

/// Failure modes of the atomic create.
#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    #[error("an application for this job and job seeker already exists")]
    Duplicate,
    #[error("job seeker is no longer eligible for this job")]
    Ineligible(EligibilityVerdict),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure modes of the atomic transition.
#[derive(Debug, thiserror::Error)]
pub enum TransitionStoreError {
    #[error("application not found")]
    NotFound,
    #[error("expected version {expected} but found {actual}")]
    VersionConflict { expected: u64, actual: u64 },
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub trait ApplicationStore: Send + Sync {
    fn by_key(
        &self,
        job: &JobId,
        seeker: &JobSeekerId,
    ) -> Result<Option<Application>, StoreError>;

    fn application(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError>;

    /// Insert a new application, enforcing (job, seeker) uniqueness and
    /// re-running the eligibility check inside the same critical section.
    fn create_atomic(
        &self,
        application: Application,
        recheck: &EligibilityRecheck<'_>,
    ) -> Result<Application, CreateError>;

    /// Commit a status change and its history entry as one logical unit,
    /// guarded by the caller's expected version.
    fn transition_atomic(
        &self,
        id: &ApplicationId,
        expected_version: u64,
        target: ApplicationStatus,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Application, TransitionStoreError>;
}

/// Notification transport failure; safe to retry thanks to dedupe keys.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Outbound delivery hook. Implementations must be idempotent on
/// `dedupe_key`.
pub trait NotificationDispatcher: Send + Sync {
    fn send(&self, intent: NotificationIntent) -> Result<(), DispatchError>;
}
