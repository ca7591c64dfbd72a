use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{sync::Arc, time::Instant};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::{
    engine::RecommendationEngine,
    error::AppError,
    features::program_feature_names,
    normalize::estimate_cgpa,
    types::{
        EligibilityResponse, FieldPredictionRequest, FieldPredictionResponse, HealthResponse,
        ProgramFeaturesResponse, ProgramPairRequest, RecommendationRequest,
        RecommendationResponse,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RecommendationEngine>,
    /// Absent when no Prometheus recorder was installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(engine: RecommendationEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/predict-fields", post(predict_fields_handler))
        .route("/recommend", post(recommend_handler))
        .route("/eligibility", post(eligibility_handler))
        .route("/features/program", post(program_features_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn predict_fields_handler(
    State(state): State<AppState>,
    Json(request): Json<FieldPredictionRequest>,
) -> Result<Json<FieldPredictionResponse>, AppError> {
    let start = Instant::now();
    metrics::counter!("requests_total", "endpoint" => "predict_fields").increment(1);

    let fields = state
        .engine
        .predict_field_interests(&request.profile, request.top_k)?;
    let model_version = state.engine.field_model().map(|m| m.version().to_string());

    record_latency("predict_fields", start);
    Ok(Json(FieldPredictionResponse {
        fields,
        estimated_cgpa: estimate_cgpa(&request.profile),
        model_version,
    }))
}

async fn recommend_handler(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let start = Instant::now();
    metrics::counter!("requests_total", "endpoint" => "recommend").increment(1);

    let response = state.engine.recommend(&request)?;
    info!(
        "Request {}: {} recommendation(s) from {} program(s)",
        response.request_id,
        response.recommendations.len(),
        request.programs.len()
    );

    record_latency("recommend", start);
    Ok(Json(response))
}

async fn eligibility_handler(
    State(state): State<AppState>,
    Json(request): Json<ProgramPairRequest>,
) -> Json<EligibilityResponse> {
    metrics::counter!("requests_total", "endpoint" => "eligibility").increment(1);

    let rejection = state
        .engine
        .check_eligibility(&request.student_profile, &request.program)
        .err();
    Json(EligibilityResponse {
        eligible: rejection.is_none(),
        rejection,
    })
}

async fn program_features_handler(
    State(state): State<AppState>,
    Json(request): Json<ProgramPairRequest>,
) -> Json<ProgramFeaturesResponse> {
    metrics::counter!("requests_total", "endpoint" => "program_features").increment(1);

    let features = state
        .engine
        .build_program_features(&request.student_profile, &request.program);
    Json(ProgramFeaturesResponse {
        features: features.into_inner(),
        names: program_feature_names(),
    })
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let model = state.engine.field_model();
    let model_loaded = state.engine.model_loaded();

    Json(HealthResponse {
        status: if model_loaded { "healthy" } else { "degraded" }.to_string(),
        model_loaded,
        model_version: model.map(|m| m.version().to_string()),
        model_sha256: model.and_then(|m| m.fingerprint().map(str::to_string)),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}

fn record_latency(endpoint: &'static str, start: Instant) {
    let latency = start.elapsed().as_secs_f64() * 1000.0;
    metrics::histogram!("request_duration_ms", "endpoint" => endpoint).record(latency);
}
