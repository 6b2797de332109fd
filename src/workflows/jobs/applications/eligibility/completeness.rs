use serde::Serialize;

use super::super::domain::{Profile, ProfileField};
use super::config::FieldWeight;

/// Result of scoring a profile against the tracked-field schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletenessReport {
    /// Weighted share of populated fields, rounded to a whole percentage.
    pub completion_percentage: u8,
    /// Unpopulated fields in schedule order.
    pub missing_fields: Vec<ProfileField>,
}

/// Score a profile. Pure: identical profile content and schedule always
/// produce an identical report.
///
/// Invariant: `missing_fields` is empty iff `completion_percentage == 100`,
/// so rounding never reports a complete profile while fields are missing.
pub fn compute_completeness(profile: &Profile, schedule: &[FieldWeight]) -> CompletenessReport {
    let mut total_weight: u64 = 0;
    let mut earned_weight: u64 = 0;
    let mut missing_fields = Vec::new();

    for entry in schedule {
        if entry.weight == 0 {
            continue;
        }
        total_weight += u64::from(entry.weight);
        if field_populated(profile, entry.field) {
            earned_weight += u64::from(entry.weight);
        } else {
            missing_fields.push(entry.field);
        }
    }

    let mut completion_percentage = if total_weight == 0 {
        100
    } else {
        ((earned_weight as f64) * 100.0 / (total_weight as f64)).round() as u8
    };

    if !missing_fields.is_empty() {
        completion_percentage = completion_percentage.min(99);
    }

    CompletenessReport {
        completion_percentage,
        missing_fields,
    }
}

pub(crate) fn field_populated(profile: &Profile, field: ProfileField) -> bool {
    match field {
        ProfileField::Headline => text_present(profile.headline.as_deref()),
        ProfileField::Summary => text_present(profile.summary.as_deref()),
        ProfileField::Education => !profile.education.is_empty(),
        ProfileField::Skills => !profile.skills.is_empty(),
        ProfileField::Languages => !profile.languages.is_empty(),
        ProfileField::Identity => profile.identity.is_some(),
    }
}

fn text_present(value: Option<&str>) -> bool {
    value.map_or(false, |text| !text.trim().is_empty())
}
