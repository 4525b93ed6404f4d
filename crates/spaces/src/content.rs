//! Content space - TF-IDF vectors over genre terms
//!
//! Each movie's genre tags become one sparse vector, weighted so that terms
//! shared by most of the catalog count less than distinctive ones.
//!
//! ## Algorithm
//! 1. Tokenize the genre tags: lowercase, runs of 2+ word characters,
//!    English stop-words removed (`Sci-Fi` -> `sci`, `fi`)
//! 2. Vocabulary = every remaining term, sorted
//! 3. tf = term count in the movie, idf = ln((1 + n) / (1 + df)) + 1
//! 4. L2-normalize each row
//!
//! Rows follow catalog order, so the output is deterministic for a catalog.

use crate::similarity::VectorSpace;
use crate::vector::{SparseVector, cosine_from_parts};
use data_loader::Catalog;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info};

/// English stop-words excluded from the vocabulary (the 318-word list
/// used by scikit-learn's `TfidfVectorizer`)
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
    "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
    "amongst", "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone",
    "anything", "anyway", "anywhere", "are", "around", "as", "at", "back", "be", "became",
    "because", "become", "becomes", "becoming", "been", "before", "beforehand", "behind",
    "being", "below", "beside", "besides", "between", "beyond", "bill", "both", "bottom",
    "but", "by", "call", "can", "cannot", "cant", "co", "con", "could", "couldnt", "cry",
    "de", "describe", "detail", "do", "done", "down", "due", "during", "each", "eg",
    "eight", "either", "eleven", "else", "elsewhere", "empty", "enough", "etc", "even",
    "ever", "every", "everyone", "everything", "everywhere", "except", "few", "fifteen",
    "fifty", "fill", "find", "fire", "first", "five", "for", "former", "formerly", "forty",
    "found", "four", "from", "front", "full", "further", "get", "give", "go", "had", "has",
    "hasnt", "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein",
    "hereupon", "hers", "herself", "him", "himself", "his", "how", "however", "hundred",
    "i", "ie", "if", "in", "inc", "indeed", "interest", "into", "is", "it", "its", "itself",
    "keep", "last", "latter", "latterly", "least", "less", "ltd", "made", "many", "may",
    "me", "meanwhile", "might", "mill", "mine", "more", "moreover", "most", "mostly",
    "move", "much", "must", "my", "myself", "name", "namely", "neither", "never",
    "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
    "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own",
    "part", "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem",
    "seemed", "seeming", "seems", "serious", "several", "she", "should", "show", "side",
    "since", "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something",
    "sometime", "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than",
    "that", "the", "their", "them", "themselves", "then", "thence", "there", "thereafter",
    "thereby", "therefore", "therein", "thereupon", "these", "they", "thick", "thin",
    "third", "this", "those", "though", "three", "through", "throughout", "thru", "thus",
    "to", "together", "too", "top", "toward", "towards", "twelve", "twenty", "two", "un",
    "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were",
    "what", "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas",
    "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while", "whither",
    "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without",
    "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Split text into lowercase terms of two or more word characters,
/// dropping stop-words
fn tokenize(text: &str, stop_words: &HashSet<&str>) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !is_word_char(c))
        .filter(|t| t.chars().count() >= 2)
        .filter(|t| !stop_words.contains(t))
        .map(str::to_string)
        .collect()
}

/// TF-IDF vectors for every movie in the catalog
#[derive(Debug, Clone, Default)]
pub struct ContentSpace {
    /// Canonical title per row
    titles: Vec<String>,
    /// Sorted vocabulary; a term's position is its dimension
    vocabulary: Vec<String>,
    /// Inverse document frequency per dimension
    idf: Vec<f32>,
    vectors: Vec<SparseVector>,
    /// Precomputed L2 norm per row (1.0, or 0.0 for movies with no terms)
    norms: Vec<f64>,
    /// Canonical title -> first row carrying it
    title_index: HashMap<String, usize>,
}

impl ContentSpace {
    /// Build the space from the catalog's genre tags
    pub fn build(catalog: &Catalog) -> Self {
        let movies = catalog.movies();
        let n = movies.len();
        if n == 0 {
            info!("Content space built over an empty catalog");
            return Self::default();
        }

        let stop_words: HashSet<&str> = STOP_WORDS.iter().copied().collect();

        // Step 1: tokenize each movie's genres
        let documents: Vec<Vec<String>> = movies
            .par_iter()
            .map(|movie| tokenize(&movie.genre_tags.join("|"), &stop_words))
            .collect();

        // Step 2: document frequency; BTreeMap keeps the vocabulary sorted
        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for tokens in &documents {
            let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let vocabulary: Vec<String> = doc_freq.keys().map(|t| t.to_string()).collect();
        let term_index: HashMap<&str, usize> = doc_freq
            .keys()
            .enumerate()
            .map(|(dim, &term)| (term, dim))
            .collect();

        // Step 3: smoothed idf
        let idf: Vec<f32> = doc_freq
            .values()
            .map(|&df| ((1.0 + n as f64) / (1.0 + df as f64)).ln() as f32 + 1.0)
            .collect();

        // Step 4: weight and normalize each row
        let vectors: Vec<SparseVector> = documents
            .par_iter()
            .map(|tokens| {
                let mut counts: BTreeMap<usize, f32> = BTreeMap::new();
                for token in tokens {
                    *counts.entry(term_index[token.as_str()]).or_insert(0.0) += 1.0;
                }
                let weighted = counts
                    .into_iter()
                    .map(|(dim, tf)| (dim, tf * idf[dim]))
                    .collect();
                SparseVector::from_sorted(weighted).normalized()
            })
            .collect();

        let norms = vectors.iter().map(SparseVector::norm).collect();

        let titles: Vec<String> = movies.iter().map(|m| m.title.clone()).collect();
        let mut title_index = HashMap::with_capacity(n);
        for (row, title) in titles.iter().enumerate() {
            title_index.entry(title.clone()).or_insert(row);
        }

        debug!("Content vocabulary: {:?}", vocabulary);
        info!(
            "Content space built: {} movies, {} terms",
            titles.len(),
            vocabulary.len()
        );

        Self {
            titles,
            vocabulary,
            idf,
            vectors,
            norms,
            title_index,
        }
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn idf(&self) -> &[f32] {
        &self.idf
    }

    pub fn vector(&self, row: usize) -> &SparseVector {
        &self.vectors[row]
    }

    /// Dimension of a vocabulary term
    pub fn term_dimension(&self, term: &str) -> Option<usize> {
        self.vocabulary.binary_search_by(|t| t.as_str().cmp(term)).ok()
    }
}

impl VectorSpace for ContentSpace {
    fn name(&self) -> &str {
        "content"
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
            self.vectors[a].dot(&self.vectors[b]),
            self.norms[a],
            self.norms[b],
        )
    }
}
