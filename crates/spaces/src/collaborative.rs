//! Collaborative space - dense rating vectors per title
//!
//! "Users who rated this movie also rated..." expressed as geometry: each
//! title is a vector over every observed user, holding that user's rating
//! or 0 when they never rated it.
//!
//! ## Algorithm
//! 1. Join ratings to titles by movie id (ratings for unknown ids drop out)
//! 2. Columns = distinct users of the joined ratings, ascending id
//! 3. Rows = distinct titles, ascending; repeated (title, user) pairs average
//! 4. Zero-fill every missing cell
//!
//! The zero-fill treats "not rated" as neutral: two titles with disjoint
//! audiences have cosine 0 rather than an undefined similarity.

use crate::similarity::VectorSpace;
use crate::vector::{cosine_from_parts, dense_dot, dense_norm};
use data_loader::{Catalog, UserId};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info, instrument};

/// Dense rating vectors for every rated title
#[derive(Debug, Clone, Default)]
pub struct CollaborativeSpace {
    /// Canonical title per row, ascending
    titles: Vec<String>,
    /// User id per column, ascending
    users: Vec<UserId>,
    vectors: Vec<Vec<f32>>,
    norms: Vec<f64>,
    title_index: HashMap<String, usize>,
}

/// Running (sum, count) of one user's ratings of one title
type RatingCell = (f64, u32);

impl CollaborativeSpace {
    /// Build the space from the catalog's rating table
    #[instrument(skip(catalog))]
    pub fn build(catalog: &Catalog) -> Self {
        // Step 1: join ratings to titles
        let mut cells: BTreeMap<&str, BTreeMap<UserId, RatingCell>> = BTreeMap::new();
        let mut users: BTreeSet<UserId> = BTreeSet::new();
        let mut dropped = 0usize;

        for rating in catalog.ratings() {
            let Some(movie) = catalog.get_movie(rating.movie_id) else {
                dropped += 1;
                continue;
            };
            let cell = cells
                .entry(movie.title.as_str())
                .or_default()
                .entry(rating.user_id)
                .or_insert((0.0, 0));
            cell.0 += rating.rating as f64;
            cell.1 += 1;
            users.insert(rating.user_id);
        }

        if dropped > 0 {
            debug!("Dropped {} ratings with no matching movie", dropped);
        }

        // Step 2: user columns
        let users: Vec<UserId> = users.into_iter().collect();
        let column: HashMap<UserId, usize> = users
            .iter()
            .enumerate()
            .map(|(col, &user)| (user, col))
            .collect();

        // Step 3 + 4: one zero-filled row per title
        let rows: Vec<(&str, BTreeMap<UserId, RatingCell>)> = cells.into_iter().collect();
        let vectors: Vec<Vec<f32>> = rows
            .par_iter()
            .map(|(_, by_user)| {
                let mut vector = vec![0.0f32; users.len()];
                for (user, &(sum, count)) in by_user {
                    vector[column[user]] = (sum / count as f64) as f32;
                }
                vector
            })
            .collect();

        let norms = vectors.par_iter().map(|v| dense_norm(v)).collect();
        let titles: Vec<String> = rows.iter().map(|(title, _)| title.to_string()).collect();
        let title_index = titles
            .iter()
            .enumerate()
            .map(|(row, title)| (title.clone(), row))
            .collect();

        info!(
            "Collaborative space built: {} titles x {} users",
            titles.len(),
            users.len()
        );

        Self {
            titles,
            users,
            vectors,
            norms,
            title_index,
        }
    }

    /// User id of every column
    pub fn users(&self) -> &[UserId] {
        &self.users
    }

    pub fn vector(&self, row: usize) -> &[f32] {
        &self.vectors[row]
    }
}

impl VectorSpace for CollaborativeSpace {
    fn name(&self) -> &str {
        "collaborative"
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }

    fn title(&self, row: usize) -> &str {
        &self.titles[row]
    }

    fn row_of(&self, canonical: &str) -> Option<usize> {
        self.title_index.get(canonical).copied()
    }

    fn cosine(&self, a: usize, b: usize) -> f32 {
        cosine_from_parts(
            dense_dot(&self.vectors[a], &self.vectors[b]),
            self.norms[a],
            self.norms[b],
        )
    }
}
