use super::common::fixed_now;
use crate::workflows::jobs::applications::domain::{Application, ApplicationStatus};
use crate::workflows::jobs::applications::machine::{
    apply_transition, next_statuses, permits, validate_transition, TransitionError,
};

const ALL_STATUSES: [ApplicationStatus; 8] = [
    ApplicationStatus::Applied,
    ApplicationStatus::Reviewing,
    ApplicationStatus::Shortlisted,
    ApplicationStatus::Interview,
    ApplicationStatus::Offered,
    ApplicationStatus::Accepted,
    ApplicationStatus::Rejected,
    ApplicationStatus::Withdrawn,
];

fn sample_application() -> Application {
    Application::submitted(
        crate::workflows::jobs::applications::domain::ApplicationId("app-1".to_string()),
        crate::workflows::jobs::applications::domain::JobId("job-1".to_string()),
        crate::workflows::jobs::applications::domain::JobSeekerId("seeker-1".to_string()),
        None,
        Vec::new(),
        fixed_now(),
    )
}

#[test]
fn happy_path_edges_are_permitted() {
    use ApplicationStatus::*;

    for (from, to) in [
        (Applied, Reviewing),
        (Reviewing, Shortlisted),
        (Shortlisted, Interview),
        (Interview, Offered),
        (Offered, Accepted),
    ] {
        assert!(permits(from, to), "{from} -> {to} should be legal");
    }
}

#[test]
fn terminal_states_permit_nothing() {
    for from in ALL_STATUSES {
        if !from.is_terminal() {
            continue;
        }
        assert!(next_statuses(from).is_empty());
        for to in ALL_STATUSES {
            assert_eq!(
                validate_transition(from, to, Some("note")),
                Err(TransitionError::Illegal { from, to }),
                "{from} -> {to} must be rejected"
            );
        }
    }
}

#[test]
fn withdrawn_and_rejected_reachable_from_every_non_terminal_state() {
    for from in ALL_STATUSES {
        if from.is_terminal() {
            continue;
        }
        assert!(permits(from, ApplicationStatus::Withdrawn));
        assert!(permits(from, ApplicationStatus::Rejected));
    }
}

#[test]
fn skipping_stages_is_illegal() {
    assert_eq!(
        validate_transition(
            ApplicationStatus::Applied,
            ApplicationStatus::Offered,
            None
        ),
        Err(TransitionError::Illegal {
            from: ApplicationStatus::Applied,
            to: ApplicationStatus::Offered,
        })
    );
}

#[test]
fn rejection_requires_a_note() {
    assert_eq!(
        validate_transition(ApplicationStatus::Reviewing, ApplicationStatus::Rejected, None),
        Err(TransitionError::NoteRequired)
    );
    assert_eq!(
        validate_transition(
            ApplicationStatus::Reviewing,
            ApplicationStatus::Rejected,
            Some("   ")
        ),
        Err(TransitionError::NoteRequired)
    );
    assert!(validate_transition(
        ApplicationStatus::Reviewing,
        ApplicationStatus::Rejected,
        Some("does not meet skill requirements")
    )
    .is_ok());
}

#[test]
fn withdrawal_needs_no_note() {
    assert!(
        validate_transition(ApplicationStatus::Interview, ApplicationStatus::Withdrawn, None)
            .is_ok()
    );
}

#[test]
fn apply_transition_appends_history_and_bumps_version() {
    let now = fixed_now();
    let mut application = sample_application();

    apply_transition(
        &mut application,
        ApplicationStatus::Reviewing,
        Some("under review".to_string()),
        now,
    )
    .expect("legal transition applies");

    assert_eq!(application.status, ApplicationStatus::Reviewing);
    assert_eq!(application.version, 2);
    assert_eq!(application.history.len(), 2);

    let last = application.history.last().expect("entry appended");
    assert_eq!(last.status, ApplicationStatus::Reviewing);
    assert_eq!(last.note.as_deref(), Some("under review"));
}

#[test]
fn failed_transition_leaves_application_untouched() {
    let now = fixed_now();
    let mut application = sample_application();
    let before = application.clone();

    let result = apply_transition(&mut application, ApplicationStatus::Offered, None, now);

    assert!(result.is_err());
    assert_eq!(application, before);
}

#[test]
fn history_timestamps_never_decrease() {
    let now = fixed_now();
    let mut application = sample_application();

    apply_transition(&mut application, ApplicationStatus::Reviewing, None, now)
        .expect("first transition");
    apply_transition(
        &mut application,
        ApplicationStatus::Shortlisted,
        None,
        now + chrono::Duration::minutes(5),
    )
    .expect("second transition");

    let timestamps: Vec<_> = application
        .history
        .iter()
        .map(|entry| entry.changed_at)
        .collect();
    assert!(timestamps.windows(2).all(|pair| pair[0] <= pair[1]));
}
