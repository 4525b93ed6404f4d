//! Aggregate view of a recommendation list.

use crate::fuse::RankedRecommendation;
use serde::{Deserialize, Serialize};

/// Headline numbers for one result list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSummary {
    pub count: usize,
    pub average_score: f32,
    pub best_score: f32,
}

impl RecommendationSummary {
    /// `None` for an empty list, there is nothing to summarize
    pub fn from_recommendations(recommendations: &[RankedRecommendation]) -> Option<Self> {
        if recommendations.is_empty() {
            return None;
        }
        let total: f32 = recommendations.iter().map(|r| r.score).sum();
        let best_score = recommendations
            .iter()
            .map(|r| r.score)
            .fold(f32::NEG_INFINITY, f32::max);
        Some(Self {
            count: recommendations.len(),
            average_score: total / recommendations.len() as f32,
            best_score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuse::SignalBreakdown;

    fn rec(rank: usize, score: f32) -> RankedRecommendation {
        RankedRecommendation {
            rank,
            title: format!("movie {}", rank),
            score,
            signals: SignalBreakdown {
                content_score: 0.0,
                collab_score: 0.0,
                content_scaled: 0.0,
                collab_scaled: 0.0,
            },
        }
    }

    #[test]
    fn test_summary_of_list() {
        let summary =
            RecommendationSummary::from_recommendations(&[rec(1, 0.9), rec(2, 0.5), rec(3, 0.1)])
                .unwrap();
        assert_eq!(summary.count, 3);
        assert!((summary.average_score - 0.5).abs() < 1e-6);
        assert_eq!(summary.best_score, 0.9);
    }

    #[test]
    fn test_empty_list_has_no_summary() {
        assert!(RecommendationSummary::from_recommendations(&[]).is_none());
    }
}
