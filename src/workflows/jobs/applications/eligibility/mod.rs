//! Eligibility evaluation: profile completeness, document verification, and
//! posting state composed into a single verdict with itemized reasons.

mod completeness;
mod config;
mod documents;

pub use completeness::{compute_completeness, CompletenessReport};
pub use config::{EligibilityConfig, FieldWeight};
pub use documents::{effective_status, expiring_within, missing_or_invalid, required_documents};

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

use super::domain::{Document, DocumentType, JobPosting, JobStatus, Profile, ProfileField};

/// Unified requirement code covering both profile-field gaps and document
/// gaps. Serialized as the bare code string (e.g. `"SKILLS"`, `"PASSPORT"`)
/// so downstream views render one flat list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequirementCode {
    Profile(ProfileField),
    Document(DocumentType),
}

impl RequirementCode {
    pub const fn code(self) -> &'static str {
        match self {
            RequirementCode::Profile(field) => field.code(),
            RequirementCode::Document(doc_type) => doc_type.code(),
        }
    }
}

impl fmt::Display for RequirementCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for RequirementCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.code())
    }
}

/// Outcome of an eligibility check. Never an error path: an ineligible job
/// seeker gets a verdict, not an exception.
///
/// Ordering is part of the contract: completeness failures precede document
/// failures, so repeated evaluation of unchanged inputs is byte-identical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EligibilityVerdict {
    pub eligible: bool,
    pub missing_requirements: Vec<RequirementCode>,
    pub reasons: Vec<String>,
}

impl EligibilityVerdict {
    fn refused(reason: &str) -> Self {
        Self {
            eligible: false,
            missing_requirements: Vec::new(),
            reasons: vec![reason.to_string()],
        }
    }
}

/// Stateless evaluator combining the completeness calculator, the document
/// tracker, and posting state.
#[derive(Debug, Clone)]
pub struct EligibilityEngine {
    config: EligibilityConfig,
}

impl EligibilityEngine {
    pub fn new(config: EligibilityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EligibilityConfig {
        &self.config
    }

    /// Evaluate in contract order: posting state first (short-circuits),
    /// then profile completeness, then required documents.
    pub fn evaluate(
        &self,
        job: &JobPosting,
        profile: &Profile,
        documents: &[Document],
        now: DateTime<Utc>,
    ) -> EligibilityVerdict {
        if job.status != JobStatus::Active {
            return EligibilityVerdict::refused("Job is not accepting applications");
        }

        if now >= job.expires_at {
            return EligibilityVerdict::refused("Job posting has expired");
        }

        let mut missing_requirements = Vec::new();
        let mut reasons = Vec::new();

        let report = compute_completeness(profile, &self.config.field_weights);
        if report.completion_percentage < self.config.required_completion {
            reasons.push("Incomplete profile".to_string());
            missing_requirements.extend(
                report
                    .missing_fields
                    .into_iter()
                    .map(RequirementCode::Profile),
            );
        }

        let missing_documents = missing_or_invalid(documents, required_documents(job), now);
        if !missing_documents.is_empty() {
            reasons.push("Missing required documents".to_string());
            missing_requirements.extend(missing_documents.into_iter().map(RequirementCode::Document));
        }

        EligibilityVerdict {
            eligible: missing_requirements.is_empty() && job.accepting_applications(now),
            missing_requirements,
            reasons,
        }
    }
}
