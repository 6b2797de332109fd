use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::jobs::applications::domain::{
    Document, DocumentId, DocumentType, Education, IdentityDetails, JobId, JobPosting,
    JobSeekerId, JobStatus, Profile, VerificationStatus,
};
use crate::workflows::jobs::applications::eligibility::{EligibilityConfig, EligibilityEngine};
use crate::workflows::jobs::applications::memory::{
    MemoryApplicationStore, MemoryDispatcher, MemoryDocumentStore, MemoryJobStore,
    MemoryProfileStore,
};
use crate::workflows::jobs::applications::repository::{DocumentStore, StoreError};
use crate::workflows::jobs::applications::service::{
    ApplicationLifecycleService, SubmissionRequest,
};

pub(super) type MemoryService = ApplicationLifecycleService<
    MemoryJobStore,
    MemoryProfileStore,
    MemoryDocumentStore,
    MemoryApplicationStore,
    MemoryDispatcher,
>;

pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn seeker_id() -> JobSeekerId {
    JobSeekerId("seeker-001".to_string())
}

pub(super) fn job_id() -> JobId {
    JobId("job-001".to_string())
}

pub(super) fn active_job(now: DateTime<Utc>) -> JobPosting {
    JobPosting {
        id: job_id(),
        title: "Certified Welder".to_string(),
        required_documents: vec![DocumentType::Passport, DocumentType::Resume],
        required_skills: vec!["MIG welding".to_string()],
        status: JobStatus::Active,
        expires_at: now + Duration::days(30),
    }
}

pub(super) fn complete_profile() -> Profile {
    Profile {
        seeker_id: seeker_id(),
        headline: Some("Structural welder".to_string()),
        summary: Some("Eight years of site experience".to_string()),
        education: vec![Education {
            institution: "Dhaka Polytechnic".to_string(),
            credential: "Welding certificate".to_string(),
            graduated_on: None,
        }],
        skills: vec!["MIG welding".to_string()],
        languages: vec!["Bengali".to_string(), "English".to_string()],
        identity: Some(IdentityDetails {
            legal_name: "Ayan Rahman".to_string(),
            nationality: "Bangladeshi".to_string(),
            date_of_birth: chrono::NaiveDate::from_ymd_opt(1992, 3, 14).expect("valid date"),
        }),
    }
}

pub(super) fn verified_passport(now: DateTime<Utc>) -> Document {
    Document {
        id: DocumentId("doc-passport".to_string()),
        owner: seeker_id(),
        doc_type: DocumentType::Passport,
        verification_status: VerificationStatus::Verified,
        expiry_date: Some(now + Duration::days(90)),
        notification_sent: false,
    }
}

pub(super) fn verified_resume() -> Document {
    Document {
        id: DocumentId("doc-resume".to_string()),
        owner: seeker_id(),
        doc_type: DocumentType::Resume,
        verification_status: VerificationStatus::Verified,
        expiry_date: None,
        notification_sent: false,
    }
}

pub(super) fn engine() -> EligibilityEngine {
    EligibilityEngine::new(EligibilityConfig::default())
}

pub(super) fn submission() -> SubmissionRequest {
    SubmissionRequest {
        job_id: job_id(),
        seeker_id: seeker_id(),
        cover_letter: Some("Available immediately.".to_string()),
        document_ids: vec![
            DocumentId("doc-passport".to_string()),
            DocumentId("doc-resume".to_string()),
        ],
    }
}

pub(super) struct ServiceFixture {
    pub service: Arc<MemoryService>,
    pub jobs: Arc<MemoryJobStore>,
    pub profiles: Arc<MemoryProfileStore>,
    pub documents: Arc<MemoryDocumentStore>,
    pub applications: Arc<MemoryApplicationStore>,
    pub dispatcher: Arc<MemoryDispatcher>,
}

pub(super) fn build_service() -> ServiceFixture {
    let config = EligibilityConfig::default();
    let now = fixed_now();
    let jobs = Arc::new(MemoryJobStore::default());
    let profiles = Arc::new(MemoryProfileStore::default());
    let documents = Arc::new(MemoryDocumentStore::default());
    let applications = Arc::new(MemoryApplicationStore::default());
    let dispatcher = Arc::new(MemoryDispatcher::default());

    jobs.upsert(active_job(now)).expect("job seeds");
    profiles.upsert(complete_profile()).expect("profile seeds");
    documents
        .upsert(verified_passport(now))
        .expect("passport seeds");
    documents.upsert(verified_resume()).expect("resume seeds");

    let service = Arc::new(ApplicationLifecycleService::new(
        jobs.clone(),
        profiles.clone(),
        documents.clone(),
        applications.clone(),
        dispatcher.clone(),
        config,
    ));

    ServiceFixture {
        service,
        jobs,
        profiles,
        documents,
        applications,
        dispatcher,
    }
}

/// Document store that serves a full document set exactly once, then turns up
/// empty. Lets tests observe the in-lock eligibility re-check.
pub(super) struct VanishingDocumentStore {
    calls: AtomicUsize,
    documents: Vec<Document>,
}

impl VanishingDocumentStore {
    pub(super) fn new(documents: Vec<Document>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            documents,
        }
    }
}

impl DocumentStore for VanishingDocumentStore {
    fn documents_for(&self, _owner: &JobSeekerId) -> Result<Vec<Document>, StoreError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(self.documents.clone())
        } else {
            Ok(Vec::new())
        }
    }

    fn all_documents(&self) -> Result<Vec<Document>, StoreError> {
        Ok(Vec::new())
    }

    fn set_notification_sent(&self, _id: &DocumentId) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Document store whose conditional writes always lose the race.
pub(super) struct ClaimedDocumentStore {
    documents: Vec<Document>,
}

impl ClaimedDocumentStore {
    pub(super) fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }
}

impl DocumentStore for ClaimedDocumentStore {
    fn documents_for(&self, owner: &JobSeekerId) -> Result<Vec<Document>, StoreError> {
        Ok(self
            .documents
            .iter()
            .filter(|document| &document.owner == owner)
            .cloned()
            .collect())
    }

    fn all_documents(&self) -> Result<Vec<Document>, StoreError> {
        Ok(self.documents.clone())
    }

    fn set_notification_sent(&self, _id: &DocumentId) -> Result<(), StoreError> {
        Err(StoreError::Conflict)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
