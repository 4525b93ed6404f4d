//! Engine crate for the hybrid movie recommender.
//!
//! Holds the spaces built from one catalog snapshot and answers title
//! queries, synchronously through `HybridEngine` or concurrently through
//! the async `RecommendationService`.

pub mod hybrid;
pub mod service;

pub use hybrid::HybridEngine;
pub use service::RecommendationService;
