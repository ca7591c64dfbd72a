use crate::{
    config::Config,
    error::{prediction_error, AppError},
    explain,
    features::{self, FeatureVector, ScalingConfig},
    filter::{self, Rejection},
    model::{load_handle, Classifier, ModelHandle},
    ranking::{adjust_scores, rank_scores, sanitise_score, top_fields, DEFAULT_TOP_K},
    types::*,
    vocab::FIELD_CATEGORIES,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

const DEFAULT_MAX_CANDIDATES: usize = 5000;

/// Stateless front of both pipelines. Holds the shared read-only models and
/// the feature scaling constants; every call is independent.
pub struct RecommendationEngine {
    field_model: ModelHandle,
    program_model: ModelHandle,
    scaling: ScalingConfig,
    default_top_k: usize,
    max_candidates: usize,
}

impl RecommendationEngine {
    /// One model serves both pipelines.
    pub fn new(model: ModelHandle) -> Self {
        Self::with_models(model.clone(), model)
    }

    pub fn with_models(field_model: ModelHandle, program_model: ModelHandle) -> Self {
        Self {
            field_model,
            program_model,
            scaling: ScalingConfig::default(),
            default_top_k: DEFAULT_TOP_K,
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        info!("Initializing recommendation engine...");

        let field_model = load_handle(&config.field_model_path);
        let program_model = match &config.program_model_path {
            Some(path) => load_handle(path),
            None => field_model.clone(),
        };

        let engine = Self::with_models(field_model, program_model)
            .with_scaling(config.scaling)
            .with_default_top_k(config.default_top_k)
            .with_max_candidates(config.max_candidates);

        info!(
            "Recommendation engine ready (model loaded: {})",
            engine.model_loaded()
        );
        engine
    }

    pub fn with_scaling(mut self, scaling: ScalingConfig) -> Self {
        self.scaling = scaling;
        self
    }

    pub fn with_default_top_k(mut self, top_k: usize) -> Self {
        self.default_top_k = top_k;
        self
    }

    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    pub fn model_loaded(&self) -> bool {
        self.field_model.is_some() && self.program_model.is_some()
    }

    /// The field model, reported by health checks.
    pub fn field_model(&self) -> Option<&Arc<dyn Classifier>> {
        self.field_model.as_ref()
    }

    pub fn predict_field_interests(
        &self,
        profile: &SubjectProfile,
        top_k: Option<usize>,
    ) -> Result<Vec<FieldPrediction>, AppError> {
        let model = self.field_model.as_ref().ok_or(AppError::ModelUnavailable)?;

        let vector = features::build_field_features(profile, &self.scaling);
        let probabilities = model
            .predict_proba(std::slice::from_ref(&vector))
            .and_then(|rows| {
                rows.into_iter()
                    .next()
                    .filter(|row| !row.is_empty())
                    .ok_or_else(|| prediction_error("model returned no probabilities"))
            })
            .map_err(|e| {
                metrics::counter!("prediction_errors_total", "pipeline" => "field").increment(1);
                e
            })?;

        let top_k = top_k.unwrap_or(self.default_top_k);
        let fields = top_fields(&probabilities, &FIELD_CATEGORIES, top_k);
        debug!("Predicted {} field(s) from {} probabilities", fields.len(), probabilities.len());
        Ok(fields)
    }

    pub fn build_program_features(
        &self,
        profile: &StudentProfile,
        program: &ProgramCandidate,
    ) -> FeatureVector {
        features::build_program_features(profile, program)
    }

    pub fn is_eligible(&self, profile: &StudentProfile, program: &ProgramCandidate) -> bool {
        filter::is_eligible(profile, program)
    }

    pub fn check_eligibility(
        &self,
        profile: &StudentProfile,
        program: &ProgramCandidate,
    ) -> Result<(), Rejection> {
        filter::check_eligibility(profile, program)
    }

    /// Filters, scores and sorts a batch of candidates.
    ///
    /// A candidate whose prediction fails is logged and left out; only a missing
    /// model or an oversized batch fails the whole call.
    pub fn rank_programs(
        &self,
        profile: &StudentProfile,
        programs: &[ProgramCandidate],
    ) -> Result<RankingOutcome, AppError> {
        let model = self.program_model.as_ref().ok_or(AppError::ModelUnavailable)?;

        if programs.len() > self.max_candidates {
            return Err(AppError::InvalidInput(format!(
                "{} programs exceeds the limit of {}",
                programs.len(),
                self.max_candidates
            )));
        }

        let mut outcome = RankingOutcome::default();
        let mut scores = Vec::with_capacity(programs.len());

        for program in programs {
            if let Err(rule) = filter::check_eligibility(profile, program) {
                debug!("Program {} filtered: {}", program.program_id, rule);
                metrics::counter!("programs_filtered_total", "rule" => rule.as_str()).increment(1);
                outcome.filtered += 1;
                continue;
            }

            let vector = features::build_program_features(profile, program);
            match score_program(model.as_ref(), &vector) {
                Ok(score) => scores.push(ProgramScore::new(program.program_id, score)),
                Err(e) => {
                    warn!("Prediction failed for program {}: {}", program.program_id, e);
                    metrics::counter!("prediction_errors_total", "pipeline" => "program")
                        .increment(1);
                    outcome.errors += 1;
                }
            }
        }

        outcome.recommendations = rank_scores(scores);
        debug!(
            "Ranked {} of {} programs ({} filtered, {} errors)",
            outcome.recommendations.len(),
            programs.len(),
            outcome.filtered,
            outcome.errors
        );
        Ok(outcome)
    }

    /// `rank_programs` plus the opt-in adjustments and explanations.
    pub fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationResponse, AppError> {
        let profile = &request.student_profile;
        let outcome = self.rank_programs(profile, &request.programs)?;

        let mut recommendations = if request.adjust {
            adjust_scores(outcome.recommendations, &request.programs, profile)
        } else {
            outcome.recommendations
        };

        if request.explain {
            let mut by_id: HashMap<i64, &ProgramCandidate> = HashMap::new();
            for program in &request.programs {
                by_id.entry(program.program_id).or_insert(program);
            }
            for rec in &mut recommendations {
                if let Some(program) = by_id.get(&rec.program_id) {
                    rec.reasons = explain::reasons(profile, program);
                }
            }
        }

        Ok(RecommendationResponse {
            request_id: Uuid::new_v4(),
            recommendations,
            filtered: outcome.filtered,
            errors: outcome.errors,
        })
    }
}

/// Positive-class probability from a two-class output.
fn score_program(model: &dyn Classifier, vector: &FeatureVector) -> Result<f64, AppError> {
    let rows = model.predict_proba(std::slice::from_ref(vector))?;
    let row = rows
        .first()
        .ok_or_else(|| prediction_error("model returned no rows"))?;
    let positive = row.get(1).copied().ok_or_else(|| {
        prediction_error(format!("expected two-class output, got {} values", row.len()))
    })?;
    Ok(sanitise_score(positive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::PROGRAM_FEATURE_COUNT;

    /// Scores each program by the value of its program-id slot.
    struct SlotModel {
        slot: usize,
    }

    impl Classifier for SlotModel {
        fn input_arity(&self) -> usize {
            PROGRAM_FEATURE_COUNT
        }

        fn n_classes(&self) -> usize {
            2
        }

        fn predict_proba(&self, batch: &[FeatureVector]) -> Result<Vec<Vec<f64>>, AppError> {
            batch
                .iter()
                .map(|v| {
                    v.ensure_len(PROGRAM_FEATURE_COUNT)?;
                    let p = v.get(self.slot).unwrap_or(0.0);
                    Ok(vec![1.0 - p, p])
                })
                .collect()
        }
    }

    fn program(id: i64, field_id: i64) -> ProgramCandidate {
        ProgramCandidate {
            program_id: id,
            university_id: 1,
            field_id,
            level: "Bachelor".into(),
            ..Default::default()
        }
    }

    #[test]
    fn missing_model_is_unavailable() {
        let engine = RecommendationEngine::new(None);
        assert!(!engine.model_loaded());
        assert!(matches!(
            engine.rank_programs(&StudentProfile::default(), &[program(1, 1)]),
            Err(AppError::ModelUnavailable)
        ));
        assert!(matches!(
            engine.predict_field_interests(&SubjectProfile::default(), None),
            Err(AppError::ModelUnavailable)
        ));
    }

    #[test]
    fn oversized_batch_is_rejected() {
        let engine = RecommendationEngine::new(Some(Arc::new(SlotModel { slot: 0 })))
            .with_max_candidates(2);
        let programs = vec![program(1, 1), program(2, 1), program(3, 1)];
        assert!(matches!(
            engine.rank_programs(&StudentProfile::default(), &programs),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn filtered_programs_are_counted() {
        // Slot 0 is the bachelor one-hot, so every eligible program scores 1.0.
        let engine = RecommendationEngine::new(Some(Arc::new(SlotModel { slot: 0 })));
        let profile = StudentProfile {
            study_level: "Bachelor".into(),
            field_ids: vec![1],
            ..Default::default()
        };
        let outcome = engine
            .rank_programs(&profile, &[program(1, 1), program(2, 2), program(3, 1)])
            .unwrap();

        let ids: Vec<i64> = outcome.recommendations.iter().map(|r| r.program_id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(outcome.filtered, 1);
        assert_eq!(outcome.errors, 0);
    }

    #[test]
    fn recommend_attaches_reasons_on_request() {
        let engine = RecommendationEngine::new(Some(Arc::new(SlotModel { slot: 0 })));
        let request = RecommendationRequest {
            student_profile: StudentProfile {
                study_level: "Bachelor".into(),
                ..Default::default()
            },
            programs: vec![program(4, 1)],
            adjust: false,
            explain: true,
        };
        let response = engine.recommend(&request).unwrap();
        assert_eq!(response.recommendations.len(), 1);
        assert_eq!(
            response.recommendations[0].reasons,
            vec!["Matches Bachelor level preference".to_string()]
        );
    }

    #[test]
    fn single_column_output_is_a_prediction_error() {
        struct OneColumn;
        impl Classifier for OneColumn {
            fn input_arity(&self) -> usize {
                PROGRAM_FEATURE_COUNT
            }
            fn n_classes(&self) -> usize {
                1
            }
            fn predict_proba(&self, batch: &[FeatureVector]) -> Result<Vec<Vec<f64>>, AppError> {
                Ok(batch.iter().map(|_| vec![0.7]).collect())
            }
        }

        let vector = FeatureVector::from_values(vec![0.0; PROGRAM_FEATURE_COUNT]);
        assert!(matches!(
            score_program(&OneColumn, &vector),
            Err(AppError::Prediction(_))
        ));
    }
}
