//! Min-max rescaling to [0, 1].

use crate::traits::Normalizer;

/// Linear rescale so the smallest value maps to 0 and the largest to 1.
///
/// When every value is the same (zero range), every output is 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinMaxNormalizer;

impl Normalizer for MinMaxNormalizer {
    fn name(&self) -> &str {
        "MinMaxNormalizer"
    }

    fn normalize(&self, values: &[f32]) -> Vec<f32> {
        let (min, max) = values
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let range = max - min;

        if !(range.is_finite() && range > 0.0) {
            return vec![0.0; values.len()];
        }
        values
            .iter()
            .map(|&v| ((v - min) / range).clamp(0.0, 1.0))
            .collect()
    }
}
