//! Feature-vector construction for both model pipelines.

pub mod field;
pub mod program;
pub mod scaling;
pub mod vector;

pub use field::{build_field_features, field_feature_names, FIELD_FEATURE_COUNT};
pub use program::{build_program_features, program_feature_names, PROGRAM_FEATURE_COUNT};
pub use scaling::{ScalingConfig, Standardizer};
pub use vector::FeatureVector;

/// Sum of block widths, usable in const assertions.
pub(crate) const fn total_width(widths: &[usize]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < widths.len() {
        total += widths[i];
        i += 1;
    }
    total
}

/// One-hot block with `index` set. Out-of-range indices yield all zeros.
pub(crate) fn one_hot<const N: usize>(index: Option<usize>) -> [f64; N] {
    let mut block = [0.0; N];
    if let Some(i) = index {
        if i < N {
            block[i] = 1.0;
        }
    }
    block
}

pub(crate) fn flag(condition: bool) -> f64 {
    if condition {
        1.0
    } else {
        0.0
    }
}
