use serde::{Deserialize, Serialize};

use super::super::domain::ProfileField;

/// Tuning knobs for the eligibility evaluator.
///
/// Field weights are configuration, not code: callers supply the schedule and
/// the calculator only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityConfig {
    /// Minimum completion percentage a profile must reach, 0-100.
    pub required_completion: u8,
    /// Default window for the document expiration sweep.
    pub expiry_horizon_days: i64,
    pub field_weights: Vec<FieldWeight>,
}

/// Weight of one tracked profile field in the completeness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldWeight {
    pub field: ProfileField,
    pub weight: u32,
}

impl EligibilityConfig {
    /// Equal weight for every tracked field.
    pub fn equal_weights() -> Vec<FieldWeight> {
        ProfileField::ordered()
            .iter()
            .map(|field| FieldWeight {
                field: *field,
                weight: 1,
            })
            .collect()
    }
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            required_completion: 100,
            expiry_horizon_days: 30,
            field_weights: Self::equal_weights(),
        }
    }
}
