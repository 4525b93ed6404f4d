//! # Recommendation Service
//!
//! Async front for `HybridEngine`. Each request runs its two neighbor
//! queries side by side on the blocking pool (they are CPU-bound), then
//! fuses. Many requests can be in flight at once: the engine is read-only.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use fusion::RankedRecommendation;
use spaces::Neighbor;

use crate::hybrid::HybridEngine;

/// Cloneable async handle to a shared engine
#[derive(Clone)]
pub struct RecommendationService {
    engine: HybridEngine,
}

impl RecommendationService {
    pub fn new(engine: HybridEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &HybridEngine {
        &self.engine
    }

    /// Ranked recommendations for `title`
    ///
    /// Errors only if a worker task panicked; an unknown title is an empty list.
    pub async fn recommend(&self, title: &str) -> Result<Vec<RankedRecommendation>> {
        let start_time = Instant::now();

        let (content, collaborative) = self.neighbors_parallel(title).await?;
        let ranked = self.engine.fuse(&content, &collaborative);

        info!(
            "Recommended {} titles for '{}' in {:.2?} (content={}, collaborative={})",
            ranked.len(),
            title,
            start_time.elapsed(),
            content.len(),
            collaborative.len()
        );
        Ok(ranked)
    }

    /// Query both spaces in parallel
    async fn neighbors_parallel(&self, title: &str) -> Result<(Vec<Neighbor>, Vec<Neighbor>)> {
        let (content_result, collab_result) = tokio::join!(
            tokio::task::spawn_blocking({
                let engine = self.engine.clone();
                let title = title.to_string();
                move || engine.content_neighbors(&title)
            }),
            tokio::task::spawn_blocking({
                let engine = self.engine.clone();
                let title = title.to_string();
                move || engine.collaborative_neighbors(&title)
            })
        );

        let content = content_result.context("Content neighbor task panicked")?;
        let collaborative = collab_result.context("Collaborative neighbor task panicked")?;
        Ok((content, collaborative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{Catalog, Movie, Rating};
    use fusion::FusionConfig;

    fn build_service() -> RecommendationService {
        let catalog = Catalog::from_parts(
            vec![
                Movie::with_genre_string(1, "Alien (1979)", "Horror|Sci-Fi"),
                Movie::with_genre_string(2, "Aliens (1986)", "Action|Horror|Sci-Fi"),
                Movie::with_genre_string(3, "Annie Hall (1977)", "Comedy|Romance"),
            ],
            vec![
                Rating { user_id: 1, movie_id: 1, rating: 5.0 },
                Rating { user_id: 1, movie_id: 2, rating: 4.0 },
                Rating { user_id: 2, movie_id: 2, rating: 4.5 },
                Rating { user_id: 2, movie_id: 3, rating: 3.0 },
            ],
        );
        let engine = HybridEngine::build(&catalog, FusionConfig::default()).unwrap();
        RecommendationService::new(engine)
    }

    #[tokio::test]
    async fn test_matches_synchronous_engine() {
        let service = build_service();
        let ranked = service.recommend("Alien (1979)").await.unwrap();
        assert_eq!(ranked, service.engine().recommend("Alien (1979)"));
        assert_eq!(ranked[0].title, "aliens (1986)");
    }

    #[tokio::test]
    async fn test_unknown_title_is_empty() {
        let service = build_service();
        assert!(service.recommend("Heat (1995)").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_requests() {
        let service = build_service();
        let mut handles = Vec::new();
        for title in ["alien (1979)", "aliens (1986)", "annie hall (1977)", "missing"] {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                let ranked = service.recommend(title).await?;
                Ok::<_, anyhow::Error>((title, ranked))
            }));
        }

        for handle in handles {
            let (title, ranked) = handle.await.unwrap().unwrap();
            assert!(ranked.iter().all(|r| r.title != title));
            assert_eq!(ranked, service.engine().recommend(title));
        }
    }
}
