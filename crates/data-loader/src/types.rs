//! Core domain types for the movie catalog and rating table.
//!
//! The catalog is a read-only snapshot once loaded. Both similarity spaces
//! are built from the same `Catalog` value, which keeps their title indices
//! consistent with each other.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user
pub type UserId = u32;

/// Unique identifier for a movie
pub type MovieId = u32;

/// Canonical form of a title used for every lookup.
///
/// Lowercasing only: whitespace and punctuation are left untouched, so
/// `" Heat (1995)"` and `"heat (1995)"` are different titles.
pub fn canonical_title(title: &str) -> String {
    title.to_lowercase()
}

// =============================================================================
// Movie
// =============================================================================

/// Represents a movie in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    /// Lowercased title, the public-facing key of a movie
    pub title: String,
    /// Genre tags in the order they appear in the source data
    pub genre_tags: Vec<String>,
}

impl Movie {
    /// Create a movie, canonicalizing its title
    pub fn new(id: MovieId, title: &str, genre_tags: Vec<String>) -> Self {
        Self {
            id,
            title: canonical_title(title),
            genre_tags,
        }
    }

    /// Create a movie from a pipe-separated genre string
    ///
    /// Example: `"Adventure|Sci-Fi"` -> `["Adventure", "Sci-Fi"]`
    pub fn with_genre_string(id: MovieId, title: &str, genres: &str) -> Self {
        Self::new(id, title, split_genres(genres))
    }
}

/// Split a pipe-separated genre string into ordered tags, skipping empty ones
pub fn split_genres(genres: &str) -> Vec<String> {
    genres
        .split('|')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Rating
// =============================================================================

/// A single rating from a user for a movie
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Rating value, 0.0 to 5.0
    pub rating: f32,
}

// =============================================================================
// Catalog - The In-Memory Snapshot
// =============================================================================

/// Movie catalog plus rating table.
///
/// Movies keep their load order, which is the row order of the content
/// space. Lookups by id and by canonical title are O(1).
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub(crate) movies: Vec<Movie>,
    pub(crate) ratings: Vec<Rating>,

    /// Movie id -> position in `movies`
    pub(crate) id_index: HashMap<MovieId, usize>,
    /// Canonical title -> position of the first movie carrying it
    pub(crate) title_index: HashMap<String, usize>,
    /// All ratings received by each movie
    pub(crate) movie_ratings: HashMap<MovieId, Vec<Rating>>,
}

impl Catalog {
    /// Creates a new, empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from in-memory tables
    pub fn from_parts(movies: Vec<Movie>, ratings: Vec<Rating>) -> Self {
        let mut catalog = Self::new();
        catalog.movies.reserve(movies.len());
        catalog.ratings.reserve(ratings.len());
        for movie in movies {
            catalog.insert_movie(movie);
        }
        for rating in ratings {
            catalog.insert_rating(rating);
        }
        catalog
    }

    /// Insert a movie; its title is canonicalized on the way in.
    ///
    /// A duplicate title keeps pointing at the first movie that used it.
    pub fn insert_movie(&mut self, mut movie: Movie) {
        movie.title = canonical_title(&movie.title);
        let position = self.movies.len();
        self.id_index.insert(movie.id, position);
        self.title_index
            .entry(movie.title.clone())
            .or_insert(position);
        self.movies.push(movie);
    }

    /// Insert a rating and update the per-movie index
    pub fn insert_rating(&mut self, rating: Rating) {
        self.movie_ratings
            .entry(rating.movie_id)
            .or_default()
            .push(rating);
        self.ratings.push(rating);
    }

    /// All movies in load order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// The full rating table
    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    /// Get a movie by ID
    pub fn get_movie(&self, id: MovieId) -> Option<&Movie> {
        self.id_index.get(&id).map(|&pos| &self.movies[pos])
    }

    /// Get a movie by title, case-insensitively
    pub fn get_movie_by_title(&self, title: &str) -> Option<&Movie> {
        self.title_index
            .get(&canonical_title(title))
            .map(|&pos| &self.movies[pos])
    }

    /// Get all ratings for a movie
    pub fn get_movie_ratings(&self, movie_id: MovieId) -> &[Rating] {
        self.movie_ratings
            .get(&movie_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Sorted, de-duplicated list of every title in the catalog
    pub fn titles(&self) -> Vec<&str> {
        let mut titles: Vec<&str> = self.title_index.keys().map(String::as_str).collect();
        titles.sort_unstable();
        titles
    }

    /// Movies whose title contains `fragment`, case-insensitively.
    ///
    /// Exact matches come first, the rest follow in title order.
    pub fn search_titles(&self, fragment: &str) -> Vec<&Movie> {
        let needle = canonical_title(fragment);
        let mut matches: Vec<&Movie> = self
            .movies
            .iter()
            .filter(|m| m.title.contains(&needle))
            .collect();
        matches.sort_by(|a, b| {
            (a.title != needle)
                .cmp(&(b.title != needle))
                .then_with(|| a.title.cmp(&b.title))
        });
        matches
    }

    /// Number of distinct users appearing in the rating table
    pub fn user_count(&self) -> usize {
        self.ratings
            .iter()
            .map(|r| r.user_id)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Get counts for debugging/validation: (movies, ratings, users)
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.movies.len(), self.ratings.len(), self.user_count())
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}
