use crate::error::AppError;
use crate::features::FeatureVector;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A fitted probabilistic classifier, used read-only and shared across requests.
pub trait Classifier: Send + Sync {
    /// Number of values every input vector must have.
    fn input_arity(&self) -> usize;

    fn n_classes(&self) -> usize;

    fn version(&self) -> &str {
        "unknown"
    }

    /// SHA-256 of the artifact the classifier was loaded from, if any.
    fn fingerprint(&self) -> Option<&str> {
        None
    }

    /// One probability row per input vector, in input order.
    fn predict_proba(&self, batch: &[FeatureVector]) -> Result<Vec<Vec<f64>>, AppError>;
}

/// Loaded model, or `None` when loading failed at startup.
pub type ModelHandle = Option<Arc<dyn Classifier>>;

/// Serialized logistic-regression weights.
///
/// A single coefficient row is a binary model producing `[1 - p, p]`; two or more
/// rows are a multinomial model evaluated with softmax.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticArtifact {
    #[serde(default = "default_version")]
    pub version: String,
    pub n_features: usize,
    #[serde(default)]
    pub classes: Vec<String>,
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

fn default_version() -> String {
    "v1.0.0".to_string()
}

pub struct LogisticModel {
    version: String,
    weights: DMatrix<f64>,
    intercepts: DVector<f64>,
    n_features: usize,
    fingerprint: Option<String>,
}

impl LogisticModel {
    pub fn from_artifact(artifact: LogisticArtifact) -> Result<Self, AppError> {
        let rows = artifact.coefficients.len();
        if artifact.n_features == 0 {
            return Err(AppError::ModelArtifact("n_features must be positive".into()));
        }
        if rows == 0 {
            return Err(AppError::ModelArtifact("no coefficient rows".into()));
        }
        if artifact.intercepts.len() != rows {
            return Err(AppError::ModelArtifact(format!(
                "{} intercepts for {} coefficient rows",
                artifact.intercepts.len(),
                rows
            )));
        }
        if let Some((i, row)) = artifact
            .coefficients
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != artifact.n_features)
        {
            return Err(AppError::ModelArtifact(format!(
                "coefficient row {} has {} values, expected {}",
                i,
                row.len(),
                artifact.n_features
            )));
        }
        let all_finite = artifact
            .coefficients
            .iter()
            .flatten()
            .chain(artifact.intercepts.iter())
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(AppError::ModelArtifact("non-finite weight".into()));
        }

        let n_classes = if rows == 1 { 2 } else { rows };
        if !artifact.classes.is_empty() && artifact.classes.len() != n_classes {
            return Err(AppError::ModelArtifact(format!(
                "{} class labels for {} classes",
                artifact.classes.len(),
                n_classes
            )));
        }

        let weights = DMatrix::from_fn(rows, artifact.n_features, |r, c| {
            artifact.coefficients[r][c]
        });

        Ok(Self {
            version: artifact.version,
            weights,
            intercepts: DVector::from_vec(artifact.intercepts),
            n_features: artifact.n_features,
            fingerprint: None,
        })
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, AppError> {
        let artifact: LogisticArtifact = serde_json::from_slice(bytes)?;
        let mut model = Self::from_artifact(artifact)?;
        model.fingerprint = Some(hex::encode(Sha256::digest(bytes)));
        Ok(model)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let model = Self::from_json(&bytes)?;
        info!(
            "Loaded model {} from {} ({} features, {} classes)",
            model.version,
            path.display(),
            model.n_features,
            model.n_classes()
        );
        Ok(model)
    }

    fn probabilities(&self, logits: &[f64]) -> Vec<f64> {
        if logits.len() == 1 {
            let p = sigmoid(logits[0]);
            return vec![1.0 - p, p];
        }
        softmax(logits)
    }
}

impl Classifier for LogisticModel {
    fn input_arity(&self) -> usize {
        self.n_features
    }

    fn n_classes(&self) -> usize {
        if self.weights.nrows() == 1 {
            2
        } else {
            self.weights.nrows()
        }
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    fn predict_proba(&self, batch: &[FeatureVector]) -> Result<Vec<Vec<f64>>, AppError> {
        for vector in batch {
            vector.ensure_len(self.n_features)?;
        }
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let inputs = DMatrix::from_fn(batch.len(), self.n_features, |r, c| {
            batch[r].as_slice()[c]
        });
        let logits = inputs * self.weights.transpose();

        let rows = (0..batch.len())
            .map(|r| {
                let row: Vec<f64> = logits
                    .row(r)
                    .iter()
                    .zip(self.intercepts.iter())
                    .map(|(z, b)| z + b)
                    .collect();
                self.probabilities(&row)
            })
            .collect::<Vec<_>>();

        debug!("Scored batch of {} with model {}", batch.len(), self.version);
        Ok(rows)
    }
}

/// Loads an artifact, logging and returning `None` on failure so the service can
/// still start and report the model as unavailable.
pub fn load_handle<P: AsRef<Path>>(path: P) -> ModelHandle {
    let path = path.as_ref();
    match LogisticModel::load(path) {
        Ok(model) => Some(Arc::new(model)),
        Err(e) => {
            warn!("Failed to load model from {}: {}", path.display(), e);
            warn!("Service will start but predictions will fail until a model is available");
            None
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|z| (z - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}
