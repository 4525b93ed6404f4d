//! Outer join of the two neighbor lists.

use spaces::Neighbor;
use std::collections::BTreeMap;

/// One title seen by at least one space during a query
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationCandidate {
    pub title: String,
    pub content_score: Option<f32>,
    pub collab_score: Option<f32>,
}

impl RecommendationCandidate {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            content_score: None,
            collab_score: None,
        }
    }

    /// Content score, 0 when the content space did not return this title
    pub fn content_or_zero(&self) -> f32 {
        self.content_score.unwrap_or(0.0)
    }

    /// Collaborative score, 0 when the collaborative space did not return this title
    pub fn collab_or_zero(&self) -> f32 {
        self.collab_score.unwrap_or(0.0)
    }
}

/// Merge both lists on title, ordered by title.
///
/// A title repeated within one list keeps its highest score.
pub fn merge_candidates(
    content: &[Neighbor],
    collaborative: &[Neighbor],
) -> Vec<RecommendationCandidate> {
    let mut merged: BTreeMap<&str, RecommendationCandidate> = BTreeMap::new();

    for neighbor in content {
        let candidate = merged
            .entry(neighbor.title.as_str())
            .or_insert_with(|| RecommendationCandidate::new(&neighbor.title));
        candidate.content_score = Some(
            candidate
                .content_score
                .map_or(neighbor.score, |s| s.max(neighbor.score)),
        );
    }

    for neighbor in collaborative {
        let candidate = merged
            .entry(neighbor.title.as_str())
            .or_insert_with(|| RecommendationCandidate::new(&neighbor.title));
        candidate.collab_score = Some(
            candidate
                .collab_score
                .map_or(neighbor.score, |s| s.max(neighbor.score)),
        );
    }

    merged.into_values().collect()
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
    fn test_outer_join_by_title() {
        let merged = merge_candidates(
            &[neighbor("b", 0.9), neighbor("a", 0.5)],
            &[neighbor("c", 0.8), neighbor("b", 0.4)],
        );
        let titles: Vec<&str> = merged.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);

        assert_eq!(merged[0].collab_score, None);
        assert_eq!(merged[0].collab_or_zero(), 0.0);
        assert_eq!(merged[1].content_score, Some(0.9));
        assert_eq!(merged[1].collab_score, Some(0.4));
        assert_eq!(merged[2].content_or_zero(), 0.0);
    }

    #[test]
    fn test_empty_lists() {
        assert!(merge_candidates(&[], &[]).is_empty());
    }

    #[test]
    fn test_repeated_title_keeps_best() {
        let merged = merge_candidates(&[neighbor("a", 0.2), neighbor("a", 0.7)], &[]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].content_score, Some(0.7));
    }
}
