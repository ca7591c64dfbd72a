#![allow(dead_code)]

use edumatch_engine::error::{prediction_error, AppError};
use edumatch_engine::features::{program_feature_names, FeatureVector};
use edumatch_engine::model::{Classifier, ModelHandle};
use edumatch_engine::types::{ProgramCandidate, StudentProfile};
use std::collections::HashMap;
use std::sync::Arc;

/// Returns the same probability row for every input.
pub struct FixedModel {
    pub arity: usize,
    pub row: Vec<f64>,
}

impl Classifier for FixedModel {
    fn input_arity(&self) -> usize {
        self.arity
    }

    fn n_classes(&self) -> usize {
        self.row.len()
    }

    fn version(&self) -> &str {
        "fixed"
    }

    fn predict_proba(&self, batch: &[FeatureVector]) -> Result<Vec<Vec<f64>>, AppError> {
        batch
            .iter()
            .map(|v| {
                v.ensure_len(self.arity)?;
                Ok(self.row.clone())
            })
            .collect()
    }
}

/// Scores programs by id, recovered from the normalized program-id slot.
/// Ids without a score make the prediction fail.
pub struct ScoreById {
    scores: HashMap<i64, f64>,
    slot: usize,
}

impl ScoreById {
    pub fn new(scores: &[(i64, f64)]) -> Self {
        let slot = program_feature_names()
            .iter()
            .position(|name| name == "program_norm")
            .expect("program id slot");
        Self {
            scores: scores.iter().copied().collect(),
            slot,
        }
    }
}

impl Classifier for ScoreById {
    fn input_arity(&self) -> usize {
        47
    }

    fn n_classes(&self) -> usize {
        2
    }

    fn predict_proba(&self, batch: &[FeatureVector]) -> Result<Vec<Vec<f64>>, AppError> {
        batch
            .iter()
            .map(|v| {
                v.ensure_len(47)?;
                let id = (v.get(self.slot).unwrap_or(0.0) * 3000.0).round() as i64;
                let p = self
                    .scores
                    .get(&id)
                    .copied()
                    .ok_or_else(|| prediction_error(format!("no score for program {}", id)))?;
                Ok(vec![1.0 - p, p])
            })
            .collect()
    }
}

pub fn handle<C: Classifier + 'static>(model: C) -> ModelHandle {
    Some(Arc::new(model))
}

pub fn bachelor_profile() -> StudentProfile {
    StudentProfile {
        study_level: "Bachelor".into(),
        ..Default::default()
    }
}

pub fn program(id: i64, field_id: i64) -> ProgramCandidate {
    ProgramCandidate {
        program_id: id,
        university_id: 1,
        field_id,
        level: "Bachelor".into(),
        ..Default::default()
    }
}
