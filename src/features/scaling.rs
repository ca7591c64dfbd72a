use serde::{Deserialize, Serialize};

/// Approximate standardization: `(value - mean) / std`.
///
/// The constants are assumed population statistics, not fitted from data, so the
/// output is not calibrated to any particular training distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Standardizer {
    pub mean: f64,
    pub std: f64,
}

impl Standardizer {
    pub const fn new(mean: f64, std: f64) -> Self {
        Self { mean, std }
    }

    pub fn apply(&self, value: f64) -> f64 {
        // A zero std only centers.
        if self.std == 0.0 {
            return value - self.mean;
        }
        (value - self.mean) / self.std
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalingConfig {
    #[serde(default = "default_interest_mean")]
    pub interest_mean: f64,
    #[serde(default = "default_interest_std")]
    pub interest_std: f64,
    #[serde(default = "default_grade_mean")]
    pub grade_mean: f64,
    #[serde(default = "default_grade_std")]
    pub grade_std: f64,
}

fn default_interest_mean() -> f64 {
    3.0
}

fn default_interest_std() -> f64 {
    1.2
}

fn default_grade_mean() -> f64 {
    2.5
}

fn default_grade_std() -> f64 {
    1.5
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            interest_mean: default_interest_mean(),
            interest_std: default_interest_std(),
            grade_mean: default_grade_mean(),
            grade_std: default_grade_std(),
        }
    }
}

impl ScalingConfig {
    /// Shared by the interest and skill blocks.
    pub fn scores(&self) -> Standardizer {
        Standardizer::new(self.interest_mean, self.interest_std)
    }

    pub fn grades(&self) -> Standardizer {
        Standardizer::new(self.grade_mean, self.grade_std)
    }
}
