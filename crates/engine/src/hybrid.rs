//! # Hybrid Engine
//!
//! Owns both similarity spaces and the fusion step. Built once at startup
//! from a single catalog snapshot, then shared read-only by every query.
//!
//! ## Query flow
//! 1. Nearest neighbors in the content space
//! 2. Nearest neighbors in the collaborative space
//! 3. Fuse both lists into the final ranking
//!
//! An unknown title simply produces empty neighbor lists and an empty
//! ranking; nothing in the query path fails.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument};

use data_loader::{Catalog, canonical_title};
use fusion::{ConfigError, FusionConfig, RankedRecommendation, ScoreFusion};
use spaces::{CollaborativeSpace, ContentSpace, Neighbor, VectorSpace, nearest};

/// Both vector spaces plus the fusion step.
///
/// Cloning is cheap: the spaces sit behind `Arc` and are never mutated.
#[derive(Clone)]
pub struct HybridEngine {
    content: Arc<ContentSpace>,
    collaborative: Arc<CollaborativeSpace>,
    fusion: ScoreFusion,
}

impl HybridEngine {
    /// Build both spaces from the same catalog snapshot
    ///
    /// The two builders are independent and run in parallel.
    pub fn build(catalog: &Catalog, config: FusionConfig) -> Result<Self, ConfigError> {
        let fusion = ScoreFusion::new(config)?;

        let start = Instant::now();
        let (content, collaborative) = rayon::join(
            || ContentSpace::build(catalog),
            || CollaborativeSpace::build(catalog),
        );
        info!(
            "Built content ({} rows) and collaborative ({} rows) spaces in {:.2?}",
            content.len(),
            collaborative.len(),
            start.elapsed()
        );

        Ok(Self {
            content: Arc::new(content),
            collaborative: Arc::new(collaborative),
            fusion,
        })
    }

    pub fn content_space(&self) -> &ContentSpace {
        &self.content
    }

    pub fn collaborative_space(&self) -> &CollaborativeSpace {
        &self.collaborative
    }

    pub fn config(&self) -> &FusionConfig {
        self.fusion.config()
    }

    /// Whether either space knows the title
    pub fn contains(&self, title: &str) -> bool {
        let canonical = canonical_title(title);
        self.content.row_of(&canonical).is_some()
            || self.collaborative.row_of(&canonical).is_some()
    }

    /// Titles described most like `title`
    pub fn content_neighbors(&self, title: &str) -> Vec<Neighbor> {
        nearest(
            self.content.as_ref(),
            title,
            self.config().neighbors_per_space,
        )
    }

    /// Titles rated most like `title`
    pub fn collaborative_neighbors(&self, title: &str) -> Vec<Neighbor> {
        nearest(
            self.collaborative.as_ref(),
            title,
            self.config().neighbors_per_space,
        )
    }

    /// Fuse two neighbor lists with this engine's weights
    pub fn fuse(&self, content: &[Neighbor], collaborative: &[Neighbor]) -> Vec<RankedRecommendation> {
        self.fusion.fuse(content, collaborative)
    }

    /// Main entry point: ranked recommendations for one title
    ///
    /// # Returns
    /// At most `max_results` entries, best first; empty when neither space
    /// has anything to offer for the title.
    #[instrument(skip(self))]
    pub fn recommend(&self, title: &str) -> Vec<RankedRecommendation> {
        let start = Instant::now();

        let content = self.content_neighbors(title);
        let collaborative = self.collaborative_neighbors(title);
        debug!(
            "Neighbors: content={}, collaborative={}",
            content.len(),
            collaborative.len()
        );

        let ranked = self.fuse(&content, &collaborative);
        debug!(
            "Ranked {} recommendations in {:.2?}",
            ranked.len(),
            start.elapsed()
        );
        ranked
    }
}
