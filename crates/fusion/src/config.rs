//! Fusion settings.
//!
//! Defaults reproduce the hybrid blend: collaborative signal weighted 0.7,
//! content 0.3, ten neighbors per space and ten results.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Slack for weights like 0.3 + 0.7 that do not sum to exactly 1.0 in f32
const WEIGHT_SUM_TOLERANCE: f32 = 1e-5;

/// Invalid fusion settings
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    /// A weight is negative, NaN or infinite
    #[error("Invalid weight for {signal}: {value}")]
    InvalidWeight { signal: String, value: f32 },

    /// Both weights are zero, every score would be zero
    #[error("At least one of content_weight and collab_weight must be positive")]
    AllWeightsZero,

    /// Weights summing above one could push scores past 1.0
    #[error("content_weight + collab_weight must not exceed 1.0 (got {sum})")]
    WeightSumTooLarge { sum: f32 },

    /// A count that must be at least one was zero
    #[error("{field} must be at least 1")]
    ZeroLimit { field: String },
}

/// Weights and limits for one hybrid query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Weight of the rescaled content score
    pub content_weight: f32,
    /// Weight of the rescaled collaborative score
    pub collab_weight: f32,
    /// Neighbors retrieved from each space before fusion
    pub neighbors_per_space: usize,
    /// Maximum length of the ranked output
    pub max_results: usize,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            content_weight: 0.3,
            collab_weight: 0.7,
            neighbors_per_space: 10,
            max_results: 10,
        }
    }
}

impl FusionConfig {
    /// Configure the content weight (default: 0.3)
    pub fn with_content_weight(mut self, weight: f32) -> Self {
        self.content_weight = weight;
        self
    }

    /// Configure the collaborative weight (default: 0.7)
    pub fn with_collab_weight(mut self, weight: f32) -> Self {
        self.collab_weight = weight;
        self
    }

    /// Configure neighbors retrieved per space (default: 10)
    pub fn with_neighbors_per_space(mut self, k: usize) -> Self {
        self.neighbors_per_space = k;
        self
    }

    /// Configure the output cap (default: 10)
    pub fn with_max_results(mut self, limit: usize) -> Self {
        self.max_results = limit;
        self
    }

    /// Check weights and limits before the config is used
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (signal, value) in [
            ("content_weight", self.content_weight),
            ("collab_weight", self.collab_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    signal: signal.to_string(),
                    value,
                });
            }
        }
        if self.content_weight == 0.0 && self.collab_weight == 0.0 {
            return Err(ConfigError::AllWeightsZero);
        }
        let sum = self.content_weight + self.collab_weight;
        if sum > 1.0 + WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSumTooLarge { sum });
        }
        if self.neighbors_per_space == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "neighbors_per_space".to_string(),
            });
        }
        if self.max_results == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "max_results".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = FusionConfig::default();
        assert_eq!(config.content_weight, 0.3);
        assert_eq!(config.collab_weight, 0.7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_negative_weight() {
        let config = FusionConfig::default().with_content_weight(-0.1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn test_rejects_nan_weight() {
        let config = FusionConfig::default().with_collab_weight(f32::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_weights_and_limits() {
        let zero = FusionConfig::default()
            .with_content_weight(0.0)
            .with_collab_weight(0.0);
        assert_eq!(zero.validate(), Err(ConfigError::AllWeightsZero));

        let no_results = FusionConfig::default().with_max_results(0);
        assert!(matches!(
            no_results.validate(),
            Err(ConfigError::ZeroLimit { .. })
        ));
    }

    #[test]
    fn test_rejects_weights_above_one() {
        let config = FusionConfig::default()
            .with_content_weight(0.6)
            .with_collab_weight(0.7);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::WeightSumTooLarge { .. })
        ));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: FusionConfig = serde_json::from_str(r#"{ "collab_weight": 0.5 }"#).unwrap();
        assert_eq!(config.collab_weight, 0.5);
        assert_eq!(config.content_weight, 0.3);
        assert_eq!(config.max_results, 10);
    }
}
