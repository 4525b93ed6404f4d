//! Score fusion: two neighbor lists in, one ranked list out.
//!
//! ## Algorithm
//! 1. Outer-join both lists on title (missing signal = 0)
//! 2. Empty join -> empty result
//! 3. Rescale each signal column independently over this query's candidates
//! 4. final = content_weight * content_scaled + collab_weight * collab_scaled
//! 5. Stable sort by final score, keep `max_results`, rank from 1
//!
//! Rescaling per query (not globally) is what makes the two signals
//! comparable: their raw cosine magnitudes are unrelated.

use crate::candidate::merge_candidates;
use crate::config::{ConfigError, FusionConfig};
use crate::min_max::MinMaxNormalizer;
use crate::traits::Normalizer;
use serde::{Deserialize, Serialize};
use spaces::Neighbor;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Raw and rescaled signals behind one final score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalBreakdown {
    pub content_score: f32,
    pub collab_score: f32,
    pub content_scaled: f32,
    pub collab_scaled: f32,
}

/// One row of the final recommendation list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecommendation {
    /// 1-based, contiguous
    pub rank: usize,
    pub title: String,
    /// Hybrid score in [0, 1]
    pub score: f32,
    pub signals: SignalBreakdown,
}

/// Merges content and collaborative neighbors into a ranked list
#[derive(Clone)]
pub struct ScoreFusion {
    config: FusionConfig,
    normalizer: Arc<dyn Normalizer>,
}

impl ScoreFusion {
    /// Create a fusion step with min-max rescaling
    ///
    /// The config is validated here so every fused score stays in [0, 1].
    pub fn new(config: FusionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            normalizer: Arc::new(MinMaxNormalizer),
        })
    }

    /// Replace the per-column rescaling
    pub fn with_normalizer(mut self, normalizer: impl Normalizer + 'static) -> Self {
        self.normalizer = Arc::new(normalizer);
        self
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Fuse one query's neighbor lists
    #[instrument(skip_all, fields(content = content.len(), collaborative = collaborative.len()))]
    pub fn fuse(
        &self,
        content: &[Neighbor],
        collaborative: &[Neighbor],
    ) -> Vec<RankedRecommendation> {
        // Step 1: outer join
        let candidates = merge_candidates(content, collaborative);

        // Step 2: nothing found by either space
        if candidates.is_empty() {
            debug!("No candidates to fuse");
            return Vec::new();
        }

        // Step 3: rescale each column on its own
        let content_raw: Vec<f32> = candidates.iter().map(|c| c.content_or_zero()).collect();
        let collab_raw: Vec<f32> = candidates.iter().map(|c| c.collab_or_zero()).collect();
        let content_scaled = self.normalizer.normalize(&content_raw);
        let collab_scaled = self.normalizer.normalize(&collab_raw);

        // Step 4: weighted blend
        let mut scored: Vec<(String, f32, SignalBreakdown)> = candidates
            .into_iter()
            .enumerate()
            .map(|(i, candidate)| {
                let score = self.config.content_weight * content_scaled[i]
                    + self.config.collab_weight * collab_scaled[i];
                let signals = SignalBreakdown {
                    content_score: content_raw[i],
                    collab_score: collab_raw[i],
                    content_scaled: content_scaled[i],
                    collab_scaled: collab_scaled[i],
                };
                (candidate.title, score, signals)
            })
            .collect();

        // Step 5: rank; sort_by is stable so ties keep title order
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(self.config.max_results);

        debug!(
            "Fused {} candidates with {}",
            scored.len(),
            self.normalizer.name()
        );

        scored
            .into_iter()
            .enumerate()
            .map(|(i, (title, score, signals))| RankedRecommendation {
                rank: i + 1,
                title,
                score,
                signals,
            })
            .collect()
    }
}

impl Default for ScoreFusion {
    fn default() -> Self {
        Self {
            config: FusionConfig::default(),
            normalizer: Arc::new(MinMaxNormalizer),
        }
    }
}

/// Fuse with the default 0.3 / 0.7 blend and a cap of 10
pub fn fuse(content: &[Neighbor], collaborative: &[Neighbor]) -> Vec<RankedRecommendation> {
    ScoreFusion::default().fuse(content, collaborative)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighbor(title: &str, score: f32) -> Neighbor {
        Neighbor {
            title: title.to_string(),
            score,
        }
    }

    #[test]
    fn test_empty_inputs_give_empty_output() {
        assert!(fuse(&[], &[]).is_empty());
    }

    #[test]
    fn test_collaborative_weight_dominates() {
        // x leads on content, y leads on collaborative
        let content = [neighbor("x", 0.9), neighbor("y", 0.1)];
        let collaborative = [neighbor("y", 0.9), neighbor("x", 0.1)];

        let ranked = fuse(&content, &collaborative);
        assert_eq!(ranked[0].title, "y");
        assert!((ranked[0].score - 0.7).abs() < 1e-6);
        assert_eq!(ranked[1].title, "x");
        assert!((ranked[1].score - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_content_only_candidate_keeps_content_share() {
        let content = [neighbor("a", 0.8), neighbor("b", 0.4)];
        let collaborative = [neighbor("c", 0.6)];

        let ranked = fuse(&content, &collaborative);
        let a = ranked.iter().find(|r| r.title == "a").unwrap();
        assert_eq!(a.signals.collab_score, 0.0);
        assert_eq!(a.signals.collab_scaled, 0.0);
        assert_eq!(a.signals.content_scaled, 1.0);
        assert!((a.score - 0.3).abs() < 1e-6);

        // c is the only collaborative hit: max of its column
        assert_eq!(ranked[0].title, "c");
        assert!((ranked[0].score - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_single_shared_candidate_scores_zero() {
        let ranked = fuse(&[neighbor("b", 0.5)], &[neighbor("b", 1.0)]);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].score, 0.0);
        assert!(!ranked[0].score.is_nan());
    }

    #[test]
    fn test_caps_results_and_ranks_contiguously() {
        let content: Vec<Neighbor> = (0..10)
            .map(|i| neighbor(&format!("c{:02}", i), 1.0 - i as f32 * 0.05))
            .collect();
        let collaborative: Vec<Neighbor> = (0..10)
            .map(|i| neighbor(&format!("k{:02}", i), 1.0 - i as f32 * 0.05))
            .collect();

        let ranked = fuse(&content, &collaborative);
        assert_eq!(ranked.len(), 10);
        for (i, rec) in ranked.iter().enumerate() {
            assert_eq!(rec.rank, i + 1);
            assert!((0.0..=1.0).contains(&rec.score));
        }
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_ties_follow_title_order() {
        let ranked = fuse(&[neighbor("m", 0.5), neighbor("b", 0.5)], &[]);
        let titles: Vec<&str> = ranked.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "m"]);
    }

    #[test]
    fn test_fuse_is_deterministic() {
        let content = [neighbor("p", 0.7), neighbor("q", 0.7), neighbor("r", 0.2)];
        let collaborative = [neighbor("q", 0.3), neighbor("s", 0.3)];
        assert_eq!(fuse(&content, &collaborative), fuse(&content, &collaborative));
    }

    #[test]
    fn test_custom_weights_and_limit() {
        let fusion = ScoreFusion::new(
            FusionConfig::default()
                .with_content_weight(1.0)
                .with_collab_weight(0.0)
                .with_max_results(1),
        )
        .unwrap();
        let ranked = fusion.fuse(
            &[neighbor("x", 0.9), neighbor("y", 0.1)],
            &[neighbor("y", 0.9)],
        );
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].title, "x");
        assert_eq!(ranked[0].score, 1.0);
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let overweight = FusionConfig::default()
            .with_content_weight(0.9)
            .with_collab_weight(0.9);
        assert!(matches!(
            ScoreFusion::new(overweight),
            Err(ConfigError::WeightSumTooLarge { .. })
        ));
        assert!(ScoreFusion::new(FusionConfig::default().with_max_results(0)).is_err());
        assert_eq!(
            ScoreFusion::new(FusionConfig::default()).unwrap().config(),
            &FusionConfig::default()
        );
    }

    #[test]
    fn test_custom_normalizer() {
        struct Identity;
        impl Normalizer for Identity {
            fn name(&self) -> &str {
                "Identity"
            }
            fn normalize(&self, values: &[f32]) -> Vec<f32> {
                values.to_vec()
            }
        }

        let fusion = ScoreFusion::default().with_normalizer(Identity);
        let ranked = fusion.fuse(&[neighbor("b", 0.5)], &[neighbor("b", 1.0)]);
        assert!((ranked[0].score - (0.3 * 0.5 + 0.7)).abs() < 1e-6);
    }
}
