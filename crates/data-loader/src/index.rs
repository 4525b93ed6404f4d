//! Loading a `Catalog` snapshot from a dataset directory.
//!
//! The directory holds either `movies.csv` + `ratings.csv` or the MovieLens
//! 1M `movies.dat` + `ratings.dat` pair. CSV wins when both are present.

use crate::error::Result;
use crate::parser;
use crate::types::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// On-disk layout of a dataset directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    MovieLensDat,
}

impl DatasetFormat {
    /// Pick the layout present in `data_dir`.
    ///
    /// Defaults to CSV when neither pair is complete, so the resulting
    /// `FileNotFound` names `movies.csv`.
    pub fn detect(data_dir: &Path) -> Self {
        let has = |name: &str| data_dir.join(name).is_file();
        if has("movies.csv") && has("ratings.csv") {
            DatasetFormat::Csv
        } else if has("movies.dat") && has("ratings.dat") {
            DatasetFormat::MovieLensDat
        } else {
            DatasetFormat::Csv
        }
    }

    fn file_paths(self, data_dir: &Path) -> (PathBuf, PathBuf) {
        match self {
            DatasetFormat::Csv => (data_dir.join("movies.csv"), data_dir.join("ratings.csv")),
            DatasetFormat::MovieLensDat => {
                (data_dir.join("movies.dat"), data_dir.join("ratings.dat"))
            }
        }
    }
}

impl Catalog {
    /// Load the movie catalog and rating table from a directory
    ///
    /// Steps:
    /// 1. Detect the file layout
    /// 2. Parse both files in parallel
    /// 3. Build the catalog indices
    /// 4. Report ratings that no movie will pick up
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        let format = DatasetFormat::detect(data_dir);
        info!("Loading catalog from {:?} ({:?})", data_dir, format);

        let (movies_path, ratings_path) = format.file_paths(data_dir);

        // Both files are independent, parse them side by side
        let (movies, ratings) = match format {
            DatasetFormat::Csv => rayon::join(
                || parser::parse_movies_csv(&movies_path),
                || parser::parse_ratings_csv(&ratings_path),
            ),
            DatasetFormat::MovieLensDat => rayon::join(
                || parser::parse_movies_dat(&movies_path),
                || parser::parse_ratings_dat(&ratings_path),
            ),
        };
        let movies = movies?;
        let ratings = ratings?;

        info!("Parsed {} movies, {} ratings", movies.len(), ratings.len());

        let catalog = Catalog::from_parts(movies, ratings);
        catalog.report_orphan_ratings();

        let (movies, ratings, users) = catalog.counts();
        info!(
            "Catalog ready: {} movies, {} ratings from {} users",
            movies, ratings, users
        );
        Ok(catalog)
    }

    /// Number of ratings whose movie id is not in the catalog.
    ///
    /// These stay in the rating table but never reach the collaborative
    /// space, which joins ratings to titles by movie id.
    pub fn orphan_rating_count(&self) -> usize {
        self.ratings
            .iter()
            .filter(|r| !self.id_index.contains_key(&r.movie_id))
            .count()
    }

    fn report_orphan_ratings(&self) {
        let orphans = self.orphan_rating_count();
        if orphans > 0 {
            warn!("{} ratings reference movies missing from the catalog", orphans);
        }

        let mut seen = HashSet::with_capacity(self.movies.len());
        let duplicates = self.movies.iter().filter(|m| !seen.insert(&m.title)).count();
        if duplicates > 0 {
            debug!("{} movies share a title with an earlier movie", duplicates);
        }
    }
}
