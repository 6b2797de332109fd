//! In-memory store implementations backing the demo binary and tests.
//!
//! Each store serializes access through a single mutex, which is what gives
//! `create_atomic` and `transition_atomic` their critical sections here. A
//! real deployment substitutes stores backed by a database offering the same
//! compare-and-swap semantics.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use super::domain::{
    Application, ApplicationId, ApplicationStatus, Document, DocumentId, JobId, JobPosting,
    JobSeekerId, Profile,
};
use super::machine;
use super::notifications::NotificationIntent;
use super::repository::{
    ApplicationStore, CreateError, DispatchError, DocumentStore, EligibilityRecheck, JobStore,
    NotificationDispatcher, ProfileStore, StoreError, TransitionStoreError,
};

fn lock<'a, T>(
    mutex: &'a Mutex<T>,
    what: &str,
) -> Result<MutexGuard<'a, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_: PoisonError<_>| StoreError::Unavailable(format!("{what} lock poisoned")))
}

#[derive(Default)]
pub struct MemoryJobStore {
    jobs: Mutex<HashMap<JobId, JobPosting>>,
}

impl MemoryJobStore {
    pub fn upsert(&self, job: JobPosting) -> Result<(), StoreError> {
        lock(&self.jobs, "job store")?.insert(job.id.clone(), job);
        Ok(())
    }
}

impl JobStore for MemoryJobStore {
    fn job(&self, id: &JobId) -> Result<JobPosting, StoreError> {
        lock(&self.jobs, "job store")?
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

#[derive(Default)]
pub struct MemoryProfileStore {
    profiles: Mutex<HashMap<JobSeekerId, Profile>>,
}

impl MemoryProfileStore {
    pub fn upsert(&self, profile: Profile) -> Result<(), StoreError> {
        lock(&self.profiles, "profile store")?.insert(profile.seeker_id.clone(), profile);
        Ok(())
    }
}

impl ProfileStore for MemoryProfileStore {
    fn profile(&self, id: &JobSeekerId) -> Result<Profile, StoreError> {
        lock(&self.profiles, "profile store")?
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: Mutex<HashMap<DocumentId, Document>>,
}

impl MemoryDocumentStore {
    pub fn upsert(&self, document: Document) -> Result<(), StoreError> {
        lock(&self.documents, "document store")?.insert(document.id.clone(), document);
        Ok(())
    }

    pub fn remove(&self, id: &DocumentId) -> Result<(), StoreError> {
        lock(&self.documents, "document store")?.remove(id);
        Ok(())
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn documents_for(&self, owner: &JobSeekerId) -> Result<Vec<Document>, StoreError> {
        let guard = lock(&self.documents, "document store")?;
        let mut documents: Vec<Document> = guard
            .values()
            .filter(|document| &document.owner == owner)
            .cloned()
            .collect();
        documents.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(documents)
    }

    fn all_documents(&self) -> Result<Vec<Document>, StoreError> {
        let guard = lock(&self.documents, "document store")?;
        let mut documents: Vec<Document> = guard.values().cloned().collect();
        documents.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(documents)
    }

    fn set_notification_sent(&self, id: &DocumentId) -> Result<(), StoreError> {
        let mut guard = lock(&self.documents, "document store")?;
        let document = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        if document.notification_sent {
            return Err(StoreError::Conflict);
        }
        document.notification_sent = true;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryApplicationStore {
    applications: Mutex<HashMap<ApplicationId, Application>>,
}

impl ApplicationStore for MemoryApplicationStore {
    fn by_key(
        &self,
        job: &JobId,
        seeker: &JobSeekerId,
    ) -> Result<Option<Application>, StoreError> {
        let guard = lock(&self.applications, "application store")?;
        Ok(guard
            .values()
            .find(|application| &application.job_id == job && &application.seeker_id == seeker)
            .cloned())
    }

    fn application(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        Ok(lock(&self.applications, "application store")?.get(id).cloned())
    }

    fn create_atomic(
        &self,
        application: Application,
        recheck: &EligibilityRecheck<'_>,
    ) -> Result<Application, CreateError> {
        let mut guard = lock(&self.applications, "application store")?;

        let duplicate = guard.values().any(|existing| {
            existing.job_id == application.job_id && existing.seeker_id == application.seeker_id
        });
        if duplicate {
            return Err(CreateError::Duplicate);
        }

        let verdict = recheck()?;
        if !verdict.eligible {
            return Err(CreateError::Ineligible(verdict));
        }

        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn transition_atomic(
        &self,
        id: &ApplicationId,
        expected_version: u64,
        target: ApplicationStatus,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Application, TransitionStoreError> {
        let mut guard = lock(&self.applications, "application store")
            .map_err(|error| TransitionStoreError::Unavailable(error.to_string()))?;

        let application = guard.get_mut(id).ok_or(TransitionStoreError::NotFound)?;

        if application.version != expected_version {
            return Err(TransitionStoreError::VersionConflict {
                expected: expected_version,
                actual: application.version,
            });
        }

        machine::apply_transition(application, target, note, now)?;
        Ok(application.clone())
    }
}

/// Dispatcher with its own delivery ledger: the second send of a dedupe key
/// is acknowledged without being recorded again.
#[derive(Default)]
pub struct MemoryDispatcher {
    delivered: Mutex<(BTreeSet<String>, Vec<NotificationIntent>)>,
}

impl MemoryDispatcher {
    pub fn delivered(&self) -> Vec<NotificationIntent> {
        self.delivered
            .lock()
            .map(|guard| guard.1.clone())
            .unwrap_or_default()
    }
}

impl NotificationDispatcher for MemoryDispatcher {
    fn send(&self, intent: NotificationIntent) -> Result<(), DispatchError> {
        let mut guard = self
            .delivered
            .lock()
            .map_err(|_| DispatchError::Transport("dispatch ledger lock poisoned".to_string()))?;

        if guard.0.insert(intent.dedupe_key.clone()) {
            guard.1.push(intent);
        }
        Ok(())
    }
}
