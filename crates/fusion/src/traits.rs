//! Core traits for score fusion.

/// Rescales one signal column over the candidate set of a single query.
///
/// ## Design Note
/// - `Send + Sync` so one fusion step can be shared by concurrent queries
/// - Output has the same length and order as the input
/// - Must never produce NaN, whatever the input range
pub trait Normalizer: Send + Sync {
    /// Returns the name of this normalizer (for logging/debugging)
    fn name(&self) -> &str;

    /// Rescale `values`, returning one output per input
    fn normalize(&self, values: &[f32]) -> Vec<f32>;
}
