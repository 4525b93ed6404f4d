//! # Data Loader Crate
//!
//! Loads the movie catalog and rating table that feed the similarity spaces.
//!
//! ## Main Components
//!
//! - **types**: Domain types (Movie, Rating, Catalog) and title canonicalization
//! - **parser**: Parse `movies.csv`/`ratings.csv` or MovieLens `.dat` files
//! - **index**: Load a `Catalog` snapshot from a dataset directory
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Catalog;
//! use std::path::Path;
//!
//! let catalog = Catalog::load_from_dir(Path::new("data/ml-latest-small"))?;
//!
//! let movie = catalog.get_movie_by_title("Toy Story (1995)").unwrap();
//! println!("{} has {} ratings", movie.title, catalog.get_movie_ratings(movie.id).len());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::DatasetFormat;
pub use types::{
    // Type aliases
    UserId,
    MovieId,
    // Core types
    Movie,
    Rating,
    Catalog,
    // Helpers
    canonical_title,
    split_genres,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> Catalog {
        Catalog::from_parts(
            vec![
                Movie::with_genre_string(1, "Toy Story (1995)", "Adventure|Animation|Comedy"),
                Movie::with_genre_string(2, "Jumanji (1995)", "Adventure|Children|Fantasy"),
                Movie::with_genre_string(3, "Toy Story 2 (1999)", "Adventure|Animation|Comedy"),
            ],
            vec![
                Rating { user_id: 1, movie_id: 1, rating: 4.0 },
                Rating { user_id: 2, movie_id: 1, rating: 5.0 },
                Rating { user_id: 1, movie_id: 3, rating: 3.5 },
            ],
        )
    }

    #[test]
    fn test_catalog_creation() {
        let catalog = Catalog::new();
        assert_eq!(catalog.counts(), (0, 0, 0));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_titles_are_lowercased() {
        let catalog = sample_catalog();
        assert_eq!(catalog.get_movie(1).unwrap().title, "toy story (1995)");
        assert_eq!(catalog.get_movie_by_title("TOY STORY (1995)").unwrap().id, 1);
    }

    #[test]
    fn test_canonicalization_is_lowercase_only() {
        let catalog = sample_catalog();
        assert!(catalog.get_movie_by_title(" toy story (1995)").is_none());
        assert!(catalog.get_movie_by_title("toy story 1995").is_none());
    }

    #[test]
    fn test_duplicate_title_keeps_first() {
        let mut catalog = sample_catalog();
        catalog.insert_movie(Movie::with_genre_string(9, "JUMANJI (1995)", "Drama"));

        assert_eq!(catalog.movies().len(), 4);
        assert_eq!(catalog.get_movie_by_title("jumanji (1995)").unwrap().id, 2);
        assert_eq!(catalog.titles().len(), 3);
    }

    #[test]
    fn test_movie_ratings() {
        let catalog = sample_catalog();
        assert_eq!(catalog.get_movie_ratings(1).len(), 2);
        assert!(catalog.get_movie_ratings(2).is_empty());
        assert_eq!(catalog.counts(), (3, 3, 2));
    }

    #[test]
    fn test_titles_sorted() {
        let catalog = sample_catalog();
        assert_eq!(
            catalog.titles(),
            vec!["jumanji (1995)", "toy story (1995)", "toy story 2 (1999)"]
        );
    }

    #[test]
    fn test_search_exact_match_first() {
        let catalog = sample_catalog();
        let hits: Vec<MovieId> = catalog.search_titles("Toy Story (1995)").iter().map(|m| m.id).collect();
        assert_eq!(hits, vec![1]);

        let hits: Vec<MovieId> = catalog.search_titles("toy").iter().map(|m| m.id).collect();
        assert_eq!(hits, vec![1, 3]);
    }

    #[test]
    fn test_split_genres() {
        assert_eq!(split_genres("Action|Sci-Fi"), vec!["Action", "Sci-Fi"]);
        assert!(split_genres("").is_empty());
    }
}
