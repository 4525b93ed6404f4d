//! Score fusion for hybrid recommendations.
//!
//! This crate provides:
//! - Candidate merging (outer join of the two neighbor lists)
//! - Normalizer trait and min-max rescaling
//! - ScoreFusion for the weighted blend and final ranking
//! - FusionConfig for weights and limits
//!
//! ## Architecture
//! Fusion processes one query in stages:
//! 1. Neighbors from the content and collaborative spaces are merged by title
//! 2. Each signal is rescaled to [0, 1] over this query's candidates
//! 3. The weighted blend ranks the candidates
//!
//! ## Example Usage
//! ```ignore
//! use fusion::{FusionConfig, ScoreFusion};
//!
//! let fusion = ScoreFusion::new(FusionConfig::default())?;
//! let ranked = fusion.fuse(&content_neighbors, &collab_neighbors);
//! ```

pub mod traits;
pub mod config;
pub mod candidate;
pub mod min_max;
pub mod fuse;
pub mod summary;

// Re-export main types
pub use traits::Normalizer;
pub use config::{ConfigError, FusionConfig};
pub use candidate::{RecommendationCandidate, merge_candidates};
pub use min_max::MinMaxNormalizer;
pub use fuse::{RankedRecommendation, ScoreFusion, SignalBreakdown, fuse};
pub use summary::RecommendationSummary;
