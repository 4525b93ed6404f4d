//! Nearest-neighbor retrieval within a vector space.
//!
//! ## Algorithm
//! 1. Canonicalize the query title and find its row
//! 2. Compute cosine similarity of that row against every row (one row of
//!    the pairwise matrix, never the whole matrix)
//! 3. Drop rows carrying the query title and scores <= 0
//! 4. Stable sort by score, highest first; ties keep row order
//! 5. Keep the first `k`
//!
//! An unknown title is a normal outcome and yields no neighbors.

use data_loader::canonical_title;
use rayon::prelude::*;
use tracing::{debug, instrument};

/// A row-addressable space of movie vectors.
///
/// `Sync` lets the row scan run on the rayon pool; spaces are read-only
/// after construction.
pub trait VectorSpace: Sync {
    /// Short name for logging ("content", "collaborative")
    fn name(&self) -> &str;

    /// Number of rows
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Canonical title stored at `row`
    fn title(&self, row: usize) -> &str;

    /// Row of a canonical title, if the space has one
    fn row_of(&self, canonical: &str) -> Option<usize>;

    /// Cosine similarity between two rows, in [-1, 1]
    fn cosine(&self, a: usize, b: usize) -> f32;
}

/// One retrieved neighbor
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub title: String,
    pub score: f32,
}

/// Top-`k` neighbors of `query_title` in `space`
#[instrument(skip(space), fields(space_name = space.name()))]
pub fn nearest<S>(space: &S, query_title: &str, k: usize) -> Vec<Neighbor>
where
    S: VectorSpace + ?Sized,
{
    let query = canonical_title(query_title);
    let Some(query_row) = space.row_of(&query) else {
        debug!("Title not found in {} space", space.name());
        return Vec::new();
    };
    if k == 0 {
        return Vec::new();
    }

    // Indexed parallel iterators keep row order through filter + collect
    let mut scored: Vec<(usize, f32)> = (0..space.len())
        .into_par_iter()
        .filter(|&row| space.title(row) != query)
        .map(|row| (row, space.cosine(query_row, row)))
        .filter(|&(_, score)| score > 0.0)
        .collect();

    // sort_by is stable, equal scores stay in row order
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(k);

    debug!(
        "Found {} neighbors in {} space",
        scored.len(),
        space.name()
    );

    scored
        .into_iter()
        .map(|(row, score)| Neighbor {
            title: space.title(row).to_string(),
            score,
        })
        .collect()
}
