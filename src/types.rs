use crate::filter::Rejection;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A grade as supplied by callers: a letter, or the number 0 for "not taken".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum GradeValue {
    Letter(String),
    Numeric(f64),
}

/// Subject-taken marker: `true`/`false` or `1`/`0`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TakenFlag {
    Bool(bool),
    Number(f64),
}

impl TakenFlag {
    pub fn as_flag(&self) -> f64 {
        match self {
            TakenFlag::Bool(true) => 1.0,
            TakenFlag::Bool(false) => 0.0,
            TakenFlag::Number(n) if *n != 0.0 && n.is_finite() => 1.0,
            TakenFlag::Number(_) => 0.0,
        }
    }
}

/// Input of the field-interest pipeline. Absent entries fall back to documented
/// defaults (grade 0, interest/skill 3, not taken).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubjectProfile {
    #[serde(default)]
    pub study: String,
    #[serde(default)]
    pub extracurricular: bool,
    #[serde(default)]
    pub grades: HashMap<String, GradeValue>,
    #[serde(default)]
    pub subject_taken: HashMap<String, TakenFlag>,
    #[serde(default)]
    pub interests: HashMap<String, f64>,
    #[serde(default)]
    pub skills: HashMap<String, f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentProfile {
    #[serde(default)]
    pub study_level: String,
    /// Empty means "no preference" for eligibility.
    #[serde(default)]
    pub field_ids: Vec<i64>,
    #[serde(default)]
    pub cgpa: Option<f64>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default, alias = "preferred_regions")]
    pub preferred_states: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramCandidate {
    pub program_id: i64,
    #[serde(default)]
    pub university_id: i64,
    #[serde(default)]
    pub field_id: i64,
    #[serde(default)]
    pub tuition_fee: Option<f64>,
    #[serde(default)]
    pub duration_months: Option<i64>,
    #[serde(default)]
    pub level: String,
    #[serde(default, alias = "university_region")]
    pub university_state: Option<String>,
    #[serde(default)]
    pub employment_rate: Option<f64>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub average_salary: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldPrediction {
    pub field_name: String,
    pub probability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgramScore {
    pub program_id: i64,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

impl ProgramScore {
    pub fn new(program_id: i64, score: f64) -> Self {
        Self {
            program_id,
            score,
            reasons: Vec::new(),
        }
    }
}

/// Result of one ranking batch: the ordered scores plus what was dropped on the way.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankingOutcome {
    pub recommendations: Vec<ProgramScore>,
    pub filtered: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldPredictionRequest {
    #[serde(flatten)]
    pub profile: SubjectProfile,
    #[serde(default)]
    pub top_k: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldPredictionResponse {
    pub fields: Vec<FieldPrediction>,
    pub estimated_cgpa: Option<f64>,
    pub model_version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub student_profile: StudentProfile,
    #[serde(default)]
    pub programs: Vec<ProgramCandidate>,
    #[serde(default)]
    pub adjust: bool,
    #[serde(default)]
    pub explain: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub request_id: Uuid,
    pub recommendations: Vec<ProgramScore>,
    pub filtered: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramPairRequest {
    pub student_profile: StudentProfile,
    pub program: ProgramCandidate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityResponse {
    pub eligible: bool,
    pub rejection: Option<Rejection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramFeaturesResponse {
    pub features: Vec<f64>,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub model_version: Option<String>,
    pub model_sha256: Option<String>,
    pub timestamp: String,
    pub version: String,
}
