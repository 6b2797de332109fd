use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::domain::{
    Application, ApplicationId, ApplicationStatus, DocumentId, JobId, JobSeekerId,
};
use super::eligibility::{EligibilityConfig, EligibilityEngine, EligibilityVerdict};
use super::machine::{self, TransitionError};
use super::notifications::{self, NotificationIntent};
use super::repository::{
    ApplicationStore, CreateError, DispatchError, DocumentStore, JobStore, NotificationDispatcher,
    ProfileStore, StoreError, TransitionStoreError,
};

/// Inbound submission payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub job_id: JobId,
    pub seeker_id: JobSeekerId,
    #[serde(default)]
    pub cover_letter: Option<String>,
    #[serde(default)]
    pub document_ids: Vec<DocumentId>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

/// Facade composing the eligibility engine, the state machine, and the
/// collaborator stores into the operations the routing layer exposes.
pub struct ApplicationLifecycleService<J, P, D, A, N> {
    jobs: Arc<J>,
    profiles: Arc<P>,
    documents: Arc<D>,
    applications: Arc<A>,
    dispatcher: Arc<N>,
    engine: Arc<EligibilityEngine>,
}

impl<J, P, D, A, N> ApplicationLifecycleService<J, P, D, A, N>
where
    J: JobStore + 'static,
    P: ProfileStore + 'static,
    D: DocumentStore + 'static,
    A: ApplicationStore + 'static,
    N: NotificationDispatcher + 'static,
{
    pub fn new(
        jobs: Arc<J>,
        profiles: Arc<P>,
        documents: Arc<D>,
        applications: Arc<A>,
        dispatcher: Arc<N>,
        config: EligibilityConfig,
    ) -> Self {
        Self {
            jobs,
            profiles,
            documents,
            applications,
            dispatcher,
            engine: Arc::new(EligibilityEngine::new(config)),
        }
    }

    pub fn engine(&self) -> &EligibilityEngine {
        &self.engine
    }

    /// Evaluate whether a job seeker may apply right now. Read-only.
    pub fn check_eligibility(
        &self,
        seeker_id: &JobSeekerId,
        job_id: &JobId,
        now: DateTime<Utc>,
    ) -> Result<EligibilityVerdict, LifecycleError> {
        let job = self
            .jobs
            .job(job_id)
            .map_err(|error| lookup_error("job posting", &job_id.0, error))?;
        let profile = self
            .profiles
            .profile(seeker_id)
            .map_err(|error| lookup_error("profile", &seeker_id.0, error))?;
        let documents = self
            .documents
            .documents_for(seeker_id)
            .map_err(|error| lookup_error("documents", &seeker_id.0, error))?;

        Ok(self.engine.evaluate(&job, &profile, &documents, now))
    }

    /// Create an application in its initial state.
    ///
    /// Eligibility is checked twice: once up front to fail fast with a full
    /// verdict, and again inside the store's critical section because profile
    /// and document state can change between evaluation and the write.
    pub fn submit_application(
        &self,
        request: SubmissionRequest,
        now: DateTime<Utc>,
    ) -> Result<Application, LifecycleError> {
        let verdict = self.check_eligibility(&request.seeker_id, &request.job_id, now)?;
        if !verdict.eligible {
            return Err(LifecycleError::Ineligible(verdict));
        }

        let existing = self
            .applications
            .by_key(&request.job_id, &request.seeker_id)
            .map_err(store_error)?;
        if existing.is_some() {
            return Err(LifecycleError::Conflict);
        }

        let application = Application::submitted(
            next_application_id(),
            request.job_id.clone(),
            request.seeker_id.clone(),
            request.cover_letter,
            request.document_ids,
            now,
        );

        let recheck = || -> Result<EligibilityVerdict, StoreError> {
            let job = self.jobs.job(&request.job_id)?;
            let profile = self.profiles.profile(&request.seeker_id)?;
            let documents = self.documents.documents_for(&request.seeker_id)?;
            Ok(self.engine.evaluate(&job, &profile, &documents, now))
        };

        let stored = self
            .applications
            .create_atomic(application, &recheck)
            .map_err(|error| match error {
                CreateError::Duplicate => LifecycleError::Conflict,
                CreateError::Ineligible(verdict) => LifecycleError::Ineligible(verdict),
                CreateError::Store(source) => store_error(source),
            })?;

        self.dispatcher
            .send(notifications::status_change_intent(&stored))?;

        info!(
            application_id = %stored.id.0,
            job_id = %stored.job_id.0,
            "application submitted"
        );
        Ok(stored)
    }

    /// Advance an application along a legal edge of the transition table.
    pub fn advance_application(
        &self,
        id: &ApplicationId,
        target: ApplicationStatus,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Application, LifecycleError> {
        let current = self
            .applications
            .application(id)
            .map_err(store_error)?
            .ok_or_else(|| LifecycleError::NotFound {
                entity: "application",
                id: id.0.clone(),
            })?;

        machine::validate_transition(current.status, target, note.as_deref())?;

        let updated = self
            .applications
            .transition_atomic(id, current.version, target, note, now)
            .map_err(|error| match error {
                TransitionStoreError::NotFound => LifecycleError::NotFound {
                    entity: "application",
                    id: id.0.clone(),
                },
                TransitionStoreError::VersionConflict { .. } => LifecycleError::VersionConflict,
                TransitionStoreError::InvalidTransition(source) => {
                    LifecycleError::InvalidTransition(source)
                }
                TransitionStoreError::Unavailable(detail) => LifecycleError::Unavailable(detail),
            })?;

        self.dispatcher
            .send(notifications::status_change_intent(&updated))?;

        info!(
            application_id = %updated.id.0,
            status = %updated.status,
            "application advanced"
        );
        Ok(updated)
    }

    /// Fetch an application for status views.
    pub fn application(&self, id: &ApplicationId) -> Result<Application, LifecycleError> {
        self.applications
            .application(id)
            .map_err(store_error)?
            .ok_or_else(|| LifecycleError::NotFound {
                entity: "application",
                id: id.0.clone(),
            })
    }

    /// Fire expiry warnings for documents expiring within the horizon.
    ///
    /// Each document is claimed with a conditional write before its intent is
    /// dispatched; losing that race means another sweep already fired, and the
    /// document is skipped. An immediate second sweep therefore returns
    /// nothing.
    pub fn sweep_document_expirations(
        &self,
        now: DateTime<Utc>,
        horizon_days: i64,
    ) -> Result<Vec<NotificationIntent>, LifecycleError> {
        let documents = self.documents.all_documents().map_err(store_error)?;
        let due = super::eligibility::expiring_within(&documents, now, horizon_days);

        let mut fired = Vec::new();
        for document in due {
            match self.documents.set_notification_sent(&document.id) {
                Ok(()) => {
                    let intent = notifications::document_expiry_intent(document);
                    self.dispatcher.send(intent.clone())?;
                    fired.push(intent);
                }
                Err(StoreError::Conflict) => {
                    debug!(document_id = %document.id.0, "expiry already claimed, skipping");
                }
                Err(other) => return Err(store_error(other)),
            }
        }

        info!(count = fired.len(), horizon_days, "expiration sweep finished");
        Ok(fired)
    }
}

fn lookup_error(entity: &'static str, id: &str, source: StoreError) -> LifecycleError {
    match source {
        StoreError::NotFound => LifecycleError::NotFound {
            entity,
            id: id.to_string(),
        },
        other => store_error(other),
    }
}

fn store_error(source: StoreError) -> LifecycleError {
    match source {
        StoreError::NotFound => LifecycleError::Unavailable("record vanished mid-operation".to_string()),
        StoreError::Conflict => LifecycleError::Conflict,
        StoreError::Unavailable(detail) => LifecycleError::Unavailable(detail),
    }
}

/// Error raised by the lifecycle service.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("job seeker does not meet the requirements for this job")]
    Ineligible(EligibilityVerdict),
    #[error("an application for this job and job seeker already exists")]
    Conflict,
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),
    #[error("application was modified concurrently, re-fetch and retry")]
    VersionConflict,
    #[error("upstream store unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
