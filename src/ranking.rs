//! Ordering and truncation of model outputs.
//!
//! All orderings are descending by score and stable, so equal scores keep their
//! input order.

use crate::normalize::known;
use crate::types::{FieldPrediction, ProgramCandidate, ProgramScore, StudentProfile};
use std::cmp::Ordering;
use std::collections::HashMap;

pub const DEFAULT_TOP_K: usize = 3;

/// Non-finite scores become 0.0; everything else is clamped into `[0, 1]`.
pub fn sanitise_score(score: f64) -> f64 {
    if !score.is_finite() {
        return 0.0;
    }
    score.clamp(0.0, 1.0)
}

/// Pairs probabilities with the vocabulary and keeps the `top_k` most likely.
///
/// Probabilities beyond the vocabulary length are dropped.
pub fn top_fields(probabilities: &[f64], vocabulary: &[&str], top_k: usize) -> Vec<FieldPrediction> {
    let mut fields: Vec<FieldPrediction> = vocabulary
        .iter()
        .zip(probabilities.iter())
        .map(|(name, p)| FieldPrediction {
            field_name: name.to_string(),
            probability: sanitise_score(*p),
        })
        .collect();

    fields.sort_by(|a, b| descending(a.probability, b.probability));
    fields.truncate(top_k);
    fields
}

/// Full ranked list; callers take the prefix they need.
pub fn rank_scores(mut scores: Vec<ProgramScore>) -> Vec<ProgramScore> {
    scores.sort_by(|a, b| descending(a.score, b.score));
    scores
}

/// Re-weights ranked scores with catalog signals the model does not see, then
/// re-sorts.
///
/// - tuition more than 10% over budget: `× (1 - min(excess × 0.3, 0.3))`
/// - employment rate ≥ 90: `× 1.10`, ≥ 80: `× 1.05`
/// - university in a preferred state: `× 1.08`
/// - rating ≥ 4.5: `× 1.05`, ≥ 4.0: `× 1.02`
pub fn adjust_scores(
    ranked: Vec<ProgramScore>,
    programs: &[ProgramCandidate],
    profile: &StudentProfile,
) -> Vec<ProgramScore> {
    let mut by_id: HashMap<i64, &ProgramCandidate> = HashMap::with_capacity(programs.len());
    for program in programs {
        by_id.entry(program.program_id).or_insert(program);
    }

    let adjusted = ranked
        .into_iter()
        .map(|mut rec| {
            if let Some(program) = by_id.get(&rec.program_id) {
                rec.score = sanitise_score(rec.score * adjustment_factor(program, profile));
            }
            rec
        })
        .collect();

    rank_scores(adjusted)
}

fn adjustment_factor(program: &ProgramCandidate, profile: &StudentProfile) -> f64 {
    let mut factor = 1.0;

    if let (Some(budget), Some(tuition)) = (known(profile.budget), known(program.tuition_fee)) {
        let excess = (tuition - budget) / budget;
        if excess > 0.1 {
            factor *= 1.0 - (excess * 0.3).min(0.3);
        }
    }

    match program.employment_rate {
        Some(rate) if rate >= 90.0 => factor *= 1.10,
        Some(rate) if rate >= 80.0 => factor *= 1.05,
        _ => {}
    }

    if in_preferred_state(program, profile) {
        factor *= 1.08;
    }

    match program.rating {
        Some(rating) if rating >= 4.5 => factor *= 1.05,
        Some(rating) if rating >= 4.0 => factor *= 1.02,
        _ => {}
    }

    factor
}

/// Case-insensitive state match, used for boosts and explanations only.
pub(crate) fn in_preferred_state(program: &ProgramCandidate, profile: &StudentProfile) -> bool {
    match program.university_state.as_deref() {
        Some(state) => profile
            .preferred_states
            .iter()
            .any(|preferred| preferred.eq_ignore_ascii_case(state)),
        None => false,
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
