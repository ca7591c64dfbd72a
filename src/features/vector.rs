use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Ordered model input. Length and field order are fixed per pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn from_values(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    /// Fails with `FeatureShape` when the vector does not match the model's arity.
    pub fn ensure_len(&self, expected: usize) -> Result<(), AppError> {
        if self.0.len() != expected {
            return Err(AppError::FeatureShape {
                expected,
                actual: self.0.len(),
            });
        }
        Ok(())
    }
}

/// Appends fixed-width blocks in declaration order.
#[derive(Debug)]
pub(crate) struct VectorWriter {
    values: Vec<f64>,
}

impl VectorWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn block<const N: usize>(mut self, block: [f64; N]) -> Self {
        self.values.extend_from_slice(&block);
        self
    }

    pub fn value(mut self, value: f64) -> Self {
        self.values.push(value);
        self
    }

    pub fn finish(self) -> FeatureVector {
        FeatureVector(self.values)
    }
}
