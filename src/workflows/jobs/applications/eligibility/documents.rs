use chrono::{DateTime, Duration, Utc};

use super::super::domain::{Document, DocumentType, JobPosting, VerificationStatus};

/// Document types a posting requires, in the order the posting lists them.
pub fn required_documents(job: &JobPosting) -> &[DocumentType] {
    &job.required_documents
}

/// Verification status as of `now`.
///
/// A past expiry date always reads as `Expired`, whatever status is stored.
pub fn effective_status(document: &Document, now: DateTime<Utc>) -> VerificationStatus {
    match document.expiry_date {
        Some(expiry) if expiry < now => VerificationStatus::Expired,
        _ => document.verification_status,
    }
}

fn satisfies(document: &Document, doc_type: DocumentType, now: DateTime<Utc>) -> bool {
    document.doc_type == doc_type && effective_status(document, now) == VerificationStatus::Verified
}

/// Required types with no verified, unexpired document on file.
///
/// The result preserves the required order so verdicts are deterministic.
pub fn missing_or_invalid(
    documents: &[Document],
    required: &[DocumentType],
    now: DateTime<Utc>,
) -> Vec<DocumentType> {
    let mut missing = Vec::new();

    for doc_type in required {
        let satisfied = documents
            .iter()
            .any(|document| satisfies(document, *doc_type, now));
        if !satisfied && !missing.contains(doc_type) {
            missing.push(*doc_type);
        }
    }

    missing
}

/// Documents due an expiry warning: expiry within `[now, now + horizon_days]`
/// and no notification fired for the current cycle.
///
/// Selection is pure; claiming a document (flipping `notification_sent`) goes
/// through the document store's conditional write so concurrent sweeps cannot
/// both fire for the same document.
pub fn expiring_within(
    documents: &[Document],
    now: DateTime<Utc>,
    horizon_days: i64,
) -> Vec<&Document> {
    let horizon_end = now + Duration::days(horizon_days);

    let mut due: Vec<&Document> = documents
        .iter()
        .filter(|document| {
            !document.notification_sent
                && document
                    .expiry_date
                    .map_or(false, |expiry| expiry >= now && expiry <= horizon_end)
        })
        .collect();

    due.sort_by(|a, b| {
        a.expiry_date
            .cmp(&b.expiry_date)
            .then_with(|| a.id.0.cmp(&b.id.0))
    });

    due
}
