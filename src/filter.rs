//! Hard eligibility constraints applied before a program is scored.
//!
//! Every rule is vacuously satisfied when either side of it is unknown. A program
//! that fails any rule is excluded regardless of what the model would say.

use crate::normalize::{has_label, known, normalize_level};
use crate::types::{ProgramCandidate, StudentProfile};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tuition may exceed the budget by this factor and still pass.
pub const BUDGET_TOLERANCE: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    LevelMismatch,
    FieldMismatch,
    OverBudget,
    RegionMismatch,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::LevelMismatch => "level_mismatch",
            Rejection::FieldMismatch => "field_mismatch",
            Rejection::OverBudget => "over_budget",
            Rejection::RegionMismatch => "region_mismatch",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_eligible(profile: &StudentProfile, program: &ProgramCandidate) -> bool {
    check_eligibility(profile, program).is_ok()
}

/// Returns the first failing rule, checked in order: level, field, budget, region.
pub fn check_eligibility(
    profile: &StudentProfile,
    program: &ProgramCandidate,
) -> Result<(), Rejection> {
    if has_label(&profile.study_level)
        && has_label(&program.level)
        && normalize_level(&profile.study_level) != normalize_level(&program.level)
    {
        return Err(Rejection::LevelMismatch);
    }

    // Empty interests mean "no preference".
    if !profile.field_ids.is_empty() && !profile.field_ids.contains(&program.field_id) {
        return Err(Rejection::FieldMismatch);
    }

    if let (Some(budget), Some(tuition)) = (known(profile.budget), known(program.tuition_fee)) {
        if tuition > budget * BUDGET_TOLERANCE {
            return Err(Rejection::OverBudget);
        }
    }

    if let Some(region) = program.university_state.as_deref() {
        if !profile.preferred_states.is_empty()
            && !profile.preferred_states.iter().any(|s| s == region)
        {
            return Err(Rejection::RegionMismatch);
        }
    }

    Ok(())
}
