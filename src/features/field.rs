//! Field-interest feature vector.
//!
//! Layout: interests (7), skills (7), subject taken (15), subject grade (15),
//! study track one-hot (2), extracurricular (1).

use super::{flag, one_hot, total_width, vector::VectorWriter, FeatureVector, ScalingConfig};
use crate::normalize::grade_value;
use crate::types::SubjectProfile;
use crate::vocab::{
    taken_column, INTERESTS, INTEREST_COUNT, SKILLS, SKILL_COUNT, STUDY_TRACKS,
    STUDY_TRACK_COUNT, SUBJECTS, SUBJECT_COUNT,
};
use std::collections::HashMap;

const BLOCK_WIDTHS: [usize; 6] = [
    INTEREST_COUNT,
    SKILL_COUNT,
    SUBJECT_COUNT,
    SUBJECT_COUNT,
    STUDY_TRACK_COUNT,
    1,
];

pub const FIELD_FEATURE_COUNT: usize = total_width(&BLOCK_WIDTHS);

const _: () = assert!(FIELD_FEATURE_COUNT == 47);

const DEFAULT_SCORE: f64 = 3.0;

pub fn build_field_features(profile: &SubjectProfile, scaling: &ScalingConfig) -> FeatureVector {
    let scores = scaling.scores();
    let grades = scaling.grades();

    let interests: [f64; INTEREST_COUNT] =
        std::array::from_fn(|i| scores.apply(score_or_default(&profile.interests, INTERESTS[i])));
    let skills: [f64; SKILL_COUNT] =
        std::array::from_fn(|i| scores.apply(score_or_default(&profile.skills, SKILLS[i])));

    let taken: [f64; SUBJECT_COUNT] = std::array::from_fn(|i| taken_flag(profile, SUBJECTS[i]));
    let grade_block: [f64; SUBJECT_COUNT] = std::array::from_fn(|i| {
        let value = grade_value(profile.grades.get(SUBJECTS[i]));
        grades.apply(f64::from(value))
    });

    let track: [f64; STUDY_TRACK_COUNT] = one_hot(Some(study_track_index(&profile.study)));

    VectorWriter::with_capacity(FIELD_FEATURE_COUNT)
        .block(interests)
        .block(skills)
        .block(taken)
        .block(grade_block)
        .block(track)
        .value(flag(profile.extracurricular))
        .finish()
}

/// Column names in vector order.
pub fn field_feature_names() -> Vec<String> {
    let mut names = Vec::with_capacity(FIELD_FEATURE_COUNT);
    names.extend(INTERESTS.iter().map(|s| s.to_string()));
    names.extend(SKILLS.iter().map(|s| s.to_string()));
    names.extend(SUBJECTS.iter().map(|s| taken_column(s)));
    names.extend(SUBJECTS.iter().map(|s| s.to_string()));
    names.extend(STUDY_TRACKS.iter().map(|t| format!("Study_{}", t)));
    names.push("Extracurricular".to_string());
    names
}

fn score_or_default(scores: &HashMap<String, f64>, key: &str) -> f64 {
    scores
        .get(key)
        .copied()
        .filter(|v| v.is_finite())
        .unwrap_or(DEFAULT_SCORE)
}

// Accepts both `Took_<Subject>` and bare subject keys.
fn taken_flag(profile: &SubjectProfile, subject: &str) -> f64 {
    profile
        .subject_taken
        .get(&taken_column(subject))
        .or_else(|| profile.subject_taken.get(subject))
        .map(|f| f.as_flag())
        .unwrap_or(0.0)
}

fn study_track_index(study: &str) -> usize {
    let wanted = study.trim().to_uppercase();
    STUDY_TRACKS
        .iter()
        .position(|track| *track == wanted)
        .unwrap_or(0)
}
