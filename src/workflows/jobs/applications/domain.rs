use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Identifier wrapper for job seekers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobSeekerId(pub String);

/// Identifier wrapper for uploaded documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub String);

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Lifecycle state of a job posting as managed by sponsors and agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Draft,
    Pending,
    Active,
    Filled,
    Closed,
    Rejected,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            JobStatus::Draft => "draft",
            JobStatus::Pending => "pending",
            JobStatus::Active => "active",
            JobStatus::Filled => "filled",
            JobStatus::Closed => "closed",
            JobStatus::Rejected => "rejected",
        }
    }
}

/// Posting snapshot consumed by the eligibility evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub title: String,
    pub required_documents: Vec<DocumentType>,
    pub required_skills: Vec<String>,
    pub status: JobStatus,
    pub expires_at: DateTime<Utc>,
}

impl JobPosting {
    /// Applications may only be created while the posting is active and unexpired.
    pub fn accepting_applications(&self, now: DateTime<Utc>) -> bool {
        self.status == JobStatus::Active && now < self.expires_at
    }
}

/// Structured profile owned by a job seeker; input to the completeness calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub seeker_id: JobSeekerId,
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub education: Vec<Education>,
    pub skills: Vec<String>,
    pub languages: Vec<String>,
    pub identity: Option<IdentityDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub institution: String,
    pub credential: String,
    pub graduated_on: Option<NaiveDate>,
}

/// Identity attributes captured during onboarding and checked by verifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityDetails {
    pub legal_name: String,
    pub nationality: String,
    pub date_of_birth: NaiveDate,
}

/// Fields tracked by the completeness schedule, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfileField {
    Headline,
    Summary,
    Education,
    Skills,
    Languages,
    Identity,
}

impl ProfileField {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Headline,
            Self::Summary,
            Self::Education,
            Self::Skills,
            Self::Languages,
            Self::Identity,
        ]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Headline => "HEADLINE",
            Self::Summary => "SUMMARY",
            Self::Education => "EDUCATION",
            Self::Skills => "SKILLS",
            Self::Languages => "LANGUAGES",
            Self::Identity => "IDENTITY",
        }
    }
}

/// Document categories a posting can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Passport,
    NationalId,
    Resume,
    WorkPermit,
    PoliceClearance,
    MedicalCertificate,
}

impl DocumentType {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Passport => "PASSPORT",
            Self::NationalId => "NATIONAL_ID",
            Self::Resume => "RESUME",
            Self::WorkPermit => "WORK_PERMIT",
            Self::PoliceClearance => "POLICE_CLEARANCE",
            Self::MedicalCertificate => "MEDICAL_CERTIFICATE",
        }
    }
}

/// Stored verification state of a document, independent of expiry.
///
/// `Expired` is derived when the expiry date has passed; clients never set it
/// directly. See [`super::eligibility::effective_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
    Expired,
}

impl VerificationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
        }
    }
}

/// Identity document uploaded by a job seeker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub owner: JobSeekerId,
    pub doc_type: DocumentType,
    pub verification_status: VerificationStatus,
    pub expiry_date: Option<DateTime<Utc>>,
    pub notification_sent: bool,
}

/// Application workflow status. Transitions are governed by
/// [`super::machine`], which owns the legal-edge table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    Reviewing,
    Shortlisted,
    Interview,
    Offered,
    Accepted,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Reviewing => "reviewing",
            Self::Shortlisted => "shortlisted",
            Self::Interview => "interview",
            Self::Offered => "offered",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Withdrawn => "withdrawn",
        }
    }

    /// Terminal statuses have no outgoing transitions.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected | Self::Withdrawn)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Single entry of an application's append-only transition history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub status: ApplicationStatus,
    pub changed_at: DateTime<Utc>,
    pub note: Option<String>,
}

/// Application linking one posting and one job seeker; unique per pair.
///
/// `history` is owned exclusively by the application: insertion order is
/// chronological order, entries are never reordered or truncated. `version`
/// backs optimistic concurrency at the store boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub seeker_id: JobSeekerId,
    pub cover_letter: Option<String>,
    pub documents: Vec<DocumentId>,
    pub status: ApplicationStatus,
    pub history: Vec<HistoryEntry>,
    pub version: u64,
}

impl Application {
    /// Build a freshly submitted application with its initial history entry.
    pub fn submitted(
        id: ApplicationId,
        job_id: JobId,
        seeker_id: JobSeekerId,
        cover_letter: Option<String>,
        documents: Vec<DocumentId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            job_id,
            seeker_id,
            cover_letter,
            documents,
            status: ApplicationStatus::Applied,
            history: vec![HistoryEntry {
                status: ApplicationStatus::Applied,
                changed_at: now,
                note: None,
            }],
            version: 1,
        }
    }
}
