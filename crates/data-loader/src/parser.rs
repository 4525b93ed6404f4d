//! Parsers for the movie and rating tables.
//!
//! Two layouts are understood:
//! - CSV (`movies.csv`, `ratings.csv`, UTF-8): header row, columns located by
//!   name, RFC-4180 quoting via the `csv` crate so titles like
//!   `"American President, The (1995)"` parse
//! - MovieLens 1M `.dat` (`movies.dat`, `ratings.dat`): `::` separated,
//!   ISO-8859-1 encoded, no header
//!
//! Genres are pipe-separated in both: `"Animation|Children's|Comedy"`.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::collections::HashMap;
use std::fmt::Display;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::str::FromStr;

const MOVIE_ID: &str = "movieId";
const TITLE: &str = "title";
const GENRES: &str = "genres";
const USER_ID: &str = "userId";
const RATING: &str = "rating";

/// Open a file, reporting a missing file as `FileNotFound`
fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

/// Read a whole file
fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    let mut file = open_file(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Read a file with ISO-8859-1 encoding (Latin-1)
///
/// Each Latin-1 byte maps directly to the Unicode code point of the same value.
fn read_lines_latin1(path: &Path) -> Result<Vec<String>> {
    let bytes = read_bytes(path)?;
    let content: String = bytes.iter().map(|&b| b as char).collect();
    Ok(content.lines().map(|s| s.to_string()).collect())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn parse_field<T>(raw: &str, file: &str, line: usize, what: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim().parse().map_err(|e| DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Invalid {}: {}", what, e),
    })
}

/// Ratings must be finite and on the 0-5 scale
fn check_rating(value: f32) -> Result<f32> {
    if value.is_finite() && (0.0..=5.0).contains(&value) {
        Ok(value)
    } else {
        Err(DataLoadError::InvalidValue {
            field: "rating".to_string(),
            value: value.to_string(),
        })
    }
}

// =============================================================================
// CSV
// =============================================================================

/// Map a `csv` error onto the record position it was raised at
fn csv_error(file: &str, err: csv::Error) -> DataLoadError {
    let line = err.position().map(|p| p.line() as usize).unwrap_or(0);
    DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: err.to_string(),
    }
}

/// Open a CSV table. Rows may be ragged; `CsvTable::field` reports short rows.
fn csv_reader(path: &Path) -> Result<csv::Reader<File>> {
    let file = open_file(path)?;
    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file))
}

/// Column positions read from a CSV header row
struct CsvTable {
    file: String,
    columns: HashMap<String, usize>,
}

impl CsvTable {
    /// An empty file has no header at all, so every column lookup fails.
    fn from_reader(file: &str, reader: &mut csv::Reader<File>) -> Result<Self> {
        let headers = reader.headers().map_err(|e| csv_error(file, e))?;
        let columns = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.trim_start_matches('\u{feff}').trim().to_string(), idx))
            .collect();
        Ok(Self {
            file: file.to_string(),
            columns,
        })
    }

    fn position(&self, column: &str) -> Result<usize> {
        self.columns
            .get(column)
            .copied()
            .ok_or_else(|| DataLoadError::MissingColumn {
                file: self.file.clone(),
                column: column.to_string(),
            })
    }

    fn field<'r>(&self, record: &'r csv::StringRecord, idx: usize) -> Result<&'r str> {
        record.get(idx).ok_or_else(|| DataLoadError::FieldCountMismatch {
            file: self.file.clone(),
            expected: idx + 1,
            found: record.len(),
            line: record_line(record),
        })
    }
}

fn record_line(record: &csv::StringRecord) -> usize {
    record.position().map(|p| p.line() as usize).unwrap_or(0)
}

/// Parse a `movies.csv` file with columns `movieId,title,genres`
///
/// Quoted titles may contain commas, doubled quotes and line breaks.
pub fn parse_movies_csv(path: &Path) -> Result<Vec<Movie>> {
    let file = file_label(path);
    let mut reader = csv_reader(path)?;
    let table = CsvTable::from_reader(&file, &mut reader)?;
    let id_col = table.position(MOVIE_ID)?;
    let title_col = table.position(TITLE)?;
    let genres_col = table.position(GENRES)?;

    let mut movies = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(&file, e))?;
        let line_no = record_line(&record);
        let id: MovieId = parse_field(table.field(&record, id_col)?, &file, line_no, "movieId")?;
        movies.push(Movie::with_genre_string(
            id,
            table.field(&record, title_col)?,
            table.field(&record, genres_col)?,
        ));
    }
    Ok(movies)
}

/// Parse a `ratings.csv` file with columns `userId,movieId,rating[,timestamp]`
///
/// The timestamp column is not needed and is ignored if present.
pub fn parse_ratings_csv(path: &Path) -> Result<Vec<Rating>> {
    let file = file_label(path);
    let mut reader = csv_reader(path)?;
    let table = CsvTable::from_reader(&file, &mut reader)?;
    let user_col = table.position(USER_ID)?;
    let movie_col = table.position(MOVIE_ID)?;
    let rating_col = table.position(RATING)?;

    let mut ratings = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(&file, e))?;
        let line_no = record_line(&record);
        let value: f32 = parse_field(table.field(&record, rating_col)?, &file, line_no, "rating")?;
        ratings.push(Rating {
            user_id: parse_field(table.field(&record, user_col)?, &file, line_no, "userId")?,
            movie_id: parse_field(table.field(&record, movie_col)?, &file, line_no, "movieId")?,
            rating: check_rating(value)?,
        });
    }
    Ok(ratings)
}

// =============================================================================
// MovieLens .dat
// =============================================================================

/// Pull the next `::` separated field or report which one is missing
fn next_field<'a>(
    parts: &mut impl Iterator<Item = &'a str>,
    file: &str,
    line: usize,
    what: &str,
) -> Result<&'a str> {
    parts.next().ok_or_else(|| DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Missing {}", what),
    })
}

/// Parse the movies.dat file
///
/// Format: movieId::title::genres
pub fn parse_movies_dat(path: &Path) -> Result<Vec<Movie>> {
    let file = file_label(path);
    let lines = read_lines_latin1(path)?;
    let mut movies = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let mut parts = line_trimmed.split("::");
        let movie_id = next_field(&mut parts, &file, line_no, "movieId")?;
        let title = next_field(&mut parts, &file, line_no, "title")?;
        let genres = next_field(&mut parts, &file, line_no, "genres")?;

        movies.push(Movie::with_genre_string(
            parse_field(movie_id, &file, line_no, "movieId")?,
            title,
            genres,
        ));
    }
    Ok(movies)
}

/// Parse the ratings.dat file
///
/// Format: userId::movieId::rating::timestamp
pub fn parse_ratings_dat(path: &Path) -> Result<Vec<Rating>> {
    let file = file_label(path);
    let lines = read_lines_latin1(path)?;
    let mut ratings = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let mut parts = line_trimmed.split("::");
        let user_id = next_field(&mut parts, &file, line_no, "userId")?;
        let movie_id = next_field(&mut parts, &file, line_no, "movieId")?;
        let rating_value = next_field(&mut parts, &file, line_no, "rating")?;

        let value: f32 = parse_field(rating_value, &file, line_no, "rating")?;
        ratings.push(Rating {
            user_id: parse_field(user_id, &file, line_no, "userId")?,
            movie_id: parse_field(movie_id, &file, line_no, "movieId")?,
            rating: check_rating(value)?,
        });
    }
    Ok(ratings)
}
