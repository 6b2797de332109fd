use chrono::Duration;

use super::common::*;
use crate::workflows::jobs::applications::domain::{
    DocumentId, DocumentType, VerificationStatus,
};
use crate::workflows::jobs::applications::eligibility::{
    effective_status, expiring_within, missing_or_invalid, required_documents,
};

#[test]
fn required_documents_come_from_the_posting() {
    let job = active_job(fixed_now());

    assert_eq!(
        required_documents(&job),
        &[DocumentType::Passport, DocumentType::Resume]
    );
}

#[test]
fn past_expiry_reads_as_expired_regardless_of_stored_status() {
    let now = fixed_now();
    let mut passport = verified_passport(now);
    passport.expiry_date = Some(now - Duration::days(1));

    assert_eq!(passport.verification_status, VerificationStatus::Verified);
    assert_eq!(effective_status(&passport, now), VerificationStatus::Expired);
}

#[test]
fn unexpired_documents_keep_their_stored_status() {
    let now = fixed_now();
    let passport = verified_passport(now);

    assert_eq!(
        effective_status(&passport, now),
        VerificationStatus::Verified
    );

    let resume = verified_resume();
    assert_eq!(effective_status(&resume, now), VerificationStatus::Verified);
}

#[test]
fn missing_types_are_reported_in_required_order() {
    let now = fixed_now();
    let required = [DocumentType::Passport, DocumentType::Resume];

    let missing = missing_or_invalid(&[], &required, now);

    assert_eq!(missing, vec![DocumentType::Passport, DocumentType::Resume]);
}

#[test]
fn verified_unexpired_document_satisfies_its_type() {
    let now = fixed_now();
    let documents = vec![verified_resume()];
    let required = [DocumentType::Passport, DocumentType::Resume];

    let missing = missing_or_invalid(&documents, &required, now);

    assert_eq!(missing, vec![DocumentType::Passport]);
}

#[test]
fn pending_and_expired_documents_do_not_satisfy() {
    let now = fixed_now();
    let mut pending_passport = verified_passport(now);
    pending_passport.verification_status = VerificationStatus::Pending;

    let mut expired_resume = verified_resume();
    expired_resume.expiry_date = Some(now - Duration::hours(1));

    let documents = vec![pending_passport, expired_resume];
    let required = [DocumentType::Passport, DocumentType::Resume];

    let missing = missing_or_invalid(&documents, &required, now);

    assert_eq!(missing, vec![DocumentType::Passport, DocumentType::Resume]);
}

#[test]
fn duplicate_required_types_are_reported_once() {
    let now = fixed_now();
    let required = [
        DocumentType::Passport,
        DocumentType::Passport,
        DocumentType::Resume,
    ];

    let missing = missing_or_invalid(&[], &required, now);

    assert_eq!(missing, vec![DocumentType::Passport, DocumentType::Resume]);
}

#[test]
fn sweep_selection_honors_horizon_and_flag() {
    let now = fixed_now();

    let mut inside = verified_passport(now);
    inside.id = DocumentId("doc-inside".to_string());
    inside.expiry_date = Some(now + Duration::days(15));

    let mut outside = verified_passport(now);
    outside.id = DocumentId("doc-outside".to_string());
    outside.expiry_date = Some(now + Duration::days(45));

    let mut already_notified = verified_passport(now);
    already_notified.id = DocumentId("doc-claimed".to_string());
    already_notified.expiry_date = Some(now + Duration::days(10));
    already_notified.notification_sent = true;

    let mut no_expiry = verified_resume();
    no_expiry.id = DocumentId("doc-open-ended".to_string());

    let documents = vec![inside, outside, already_notified, no_expiry];

    let due = expiring_within(&documents, now, 30);

    let ids: Vec<&str> = due.iter().map(|document| document.id.0.as_str()).collect();
    assert_eq!(ids, vec!["doc-inside"]);
}

#[test]
fn sweep_selection_orders_by_expiry_then_id() {
    let now = fixed_now();

    let mut later = verified_passport(now);
    later.id = DocumentId("doc-a".to_string());
    later.expiry_date = Some(now + Duration::days(20));

    let mut sooner = verified_passport(now);
    sooner.id = DocumentId("doc-b".to_string());
    sooner.expiry_date = Some(now + Duration::days(5));

    let mut tie = verified_passport(now);
    tie.id = DocumentId("doc-c".to_string());
    tie.expiry_date = Some(now + Duration::days(20));

    let documents = vec![later, sooner, tie];

    let due = expiring_within(&documents, now, 30);

    let ids: Vec<&str> = due.iter().map(|document| document.id.0.as_str()).collect();
    assert_eq!(ids, vec!["doc-b", "doc-a", "doc-c"]);
}

#[test]
fn document_expiring_exactly_at_horizon_is_included() {
    let now = fixed_now();
    let mut document = verified_passport(now);
    document.expiry_date = Some(now + Duration::days(30));

    let due = expiring_within(std::slice::from_ref(&document), now, 30);

    assert_eq!(due.len(), 1);
}
