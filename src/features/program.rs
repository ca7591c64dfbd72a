//! Student/program matching feature vector.
//!
//! Every optional input that is unknown contributes the neutral value 0.5 so the
//! vector keeps its width regardless of what the caller supplied.

use super::{flag, one_hot, total_width, vector::VectorWriter, FeatureVector};
use crate::normalize::{known, level_index};
use crate::types::{ProgramCandidate, StudentProfile};
use crate::vocab::{FIELD_SLOT_COUNT, LEVELS, LEVEL_COUNT};

const NEUTRAL: f64 = 0.5;
const BUDGET_RATIO_CAP: f64 = 2.0;
const BUDGET_STRETCH: f64 = 1.2;
const MAX_DURATION_MONTHS: f64 = 48.0;
const MAX_TUITION: f64 = 200_000.0;
const MAX_UNIVERSITY_ID: f64 = 100.0;
const MAX_PROGRAM_ID: f64 = 3_000.0;

const BLOCK_WIDTHS: [usize; 16] = [
    LEVEL_COUNT,      // student level
    LEVEL_COUNT,      // program level
    1,                // level match
    FIELD_SLOT_COUNT, // field one-hot
    1, // field match
    3, // budget
    2, // cgpa
    2, // duration
    1, // tuition
    1, // cgpa x budget ratio
    1, // level match x field match
    1, // location
    1, // university id
    1, // program id
    1, // remaining budget
    1, // affordability
];

pub const PROGRAM_FEATURE_COUNT: usize = total_width(&BLOCK_WIDTHS);

const _: () = assert!(PROGRAM_FEATURE_COUNT == 47);

/// Budget-derived values, only available when both budget and tuition are known.
#[derive(Debug, Clone, Copy)]
struct BudgetFit {
    ratio: f64,
    within: bool,
    remaining_fraction: f64,
}

impl BudgetFit {
    fn new(budget: f64, tuition: f64) -> Self {
        Self {
            ratio: (tuition / budget).min(BUDGET_RATIO_CAP),
            within: tuition <= budget,
            remaining_fraction: ((budget - tuition).max(0.0) / budget).min(1.0),
        }
    }
}

pub fn build_program_features(profile: &StudentProfile, program: &ProgramCandidate) -> FeatureVector {
    let student_level = level_index(&profile.study_level);
    let program_level = level_index(&program.level);
    let level_match = flag(student_level == program_level);

    let field_block: [f64; FIELD_SLOT_COUNT] = one_hot(field_slot(program.field_id));
    // An empty interest list never matches here, unlike the eligibility rule.
    let field_match = flag(
        !profile.field_ids.is_empty() && profile.field_ids.contains(&program.field_id),
    );

    let budget = known(profile.budget);
    let tuition = known(program.tuition_fee);
    let cgpa = known(profile.cgpa);
    let duration = known(program.duration_months.map(|d| d as f64));

    let fit = match (budget, tuition) {
        (Some(b), Some(t)) => Some(BudgetFit::new(b, t)),
        _ => None,
    };
    let cgpa_norm = cgpa.map(|c| (c / 4.0).min(1.0));

    let budget_block = match (fit, budget, tuition) {
        (Some(fit), Some(b), Some(t)) => [fit.ratio, flag(fit.within), flag(t <= b * BUDGET_STRETCH)],
        _ => [NEUTRAL; 3],
    };

    let cgpa_block = match (cgpa, cgpa_norm) {
        (Some(c), Some(norm)) => [norm, cgpa_tier(c)],
        _ => [NEUTRAL; 2],
    };

    let duration_block = match duration {
        Some(d) => [(d / MAX_DURATION_MONTHS).min(1.0), duration_tier(d)],
        None => [NEUTRAL; 2],
    };

    let tuition_norm = tuition.map_or(NEUTRAL, |t| (t / MAX_TUITION).min(1.0));

    let cgpa_budget = match (cgpa_norm, fit) {
        (Some(norm), Some(fit)) => norm * fit.ratio,
        _ => NEUTRAL,
    };

    let affordability = match (cgpa_norm, fit) {
        (Some(norm), Some(fit)) => (norm + flag(fit.within)) / 2.0,
        _ => NEUTRAL,
    };

    VectorWriter::with_capacity(PROGRAM_FEATURE_COUNT)
        .block::<LEVEL_COUNT>(one_hot(Some(student_level)))
        .block::<LEVEL_COUNT>(one_hot(Some(program_level)))
        .value(level_match)
        .block(field_block)
        .value(field_match)
        .block(budget_block)
        .block(cgpa_block)
        .block(duration_block)
        .value(tuition_norm)
        .value(cgpa_budget)
        .value(level_match * field_match)
        // Needs a university -> region lookup this builder does not have.
        .value(NEUTRAL)
        .value(normalized_id(program.university_id, MAX_UNIVERSITY_ID))
        .value(normalized_id(program.program_id, MAX_PROGRAM_ID))
        .value(fit.map_or(NEUTRAL, |f| f.remaining_fraction))
        .value(affordability)
        .finish()
}

/// Column names in vector order.
pub fn program_feature_names() -> Vec<String> {
    let mut names = Vec::with_capacity(PROGRAM_FEATURE_COUNT);
    names.extend(LEVELS.iter().map(|l| format!("student_level_{}", l)));
    names.extend(LEVELS.iter().map(|l| format!("program_level_{}", l)));
    names.push("level_match".to_string());
    names.extend((1..=FIELD_SLOT_COUNT).map(|id| format!("field_{}", id)));
    names.push("field_match".to_string());
    names.extend(
        ["budget_ratio", "within_budget", "within_budget_120"]
            .iter()
            .map(|s| s.to_string()),
    );
    names.extend(["cgpa_norm", "cgpa_tier"].iter().map(|s| s.to_string()));
    names.extend(["duration_norm", "duration_tier"].iter().map(|s| s.to_string()));
    names.extend(
        [
            "tuition_norm",
            "cgpa_x_budget_ratio",
            "level_x_field_match",
            "location_match",
            "university_norm",
            "program_norm",
            "remaining_budget",
            "affordability",
        ]
        .iter()
        .map(|s| s.to_string()),
    );
    names
}

fn field_slot(field_id: i64) -> Option<usize> {
    if (1..=FIELD_SLOT_COUNT as i64).contains(&field_id) {
        Some((field_id - 1) as usize)
    } else {
        None
    }
}

fn cgpa_tier(cgpa: f64) -> f64 {
    if cgpa >= 3.5 {
        1.0
    } else if cgpa >= 2.5 {
        0.5
    } else {
        0.0
    }
}

fn duration_tier(months: f64) -> f64 {
    if months <= 24.0 {
        0.0
    } else if months <= 36.0 {
        0.5
    } else {
        1.0
    }
}

fn normalized_id(id: i64, max: f64) -> f64 {
    if id > 0 {
        (id as f64 / max).min(1.0)
    } else {
        NEUTRAL
    }
}
