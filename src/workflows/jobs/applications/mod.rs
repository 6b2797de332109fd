//! Application lifecycle and eligibility engine.
//!
//! Decides whether a job seeker may apply to a posting, advances applications
//! through a bounded status workflow with an auditable history, tracks
//! document verification and expiry, and derives the notifications each event
//! owes. Persistence, delivery, and routing sit behind the traits in
//! [`repository`].

pub mod domain;
pub mod eligibility;
pub mod machine;
pub mod memory;
pub mod notifications;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationId, ApplicationStatus, Document, DocumentId, DocumentType, Education,
    HistoryEntry, IdentityDetails, JobId, JobPosting, JobSeekerId, JobStatus, Profile,
    ProfileField, VerificationStatus,
};
pub use eligibility::{
    CompletenessReport, EligibilityConfig, EligibilityEngine, EligibilityVerdict, FieldWeight,
    RequirementCode,
};
pub use machine::TransitionError;
pub use notifications::{NotificationIntent, NotificationKind};
pub use repository::{
    ApplicationStore, CreateError, DispatchError, DocumentStore, JobStore, NotificationDispatcher,
    ProfileStore, StoreError, TransitionStoreError,
};
pub use router::{application_router, ApplicationView};
pub use service::{ApplicationLifecycleService, LifecycleError, SubmissionRequest};
