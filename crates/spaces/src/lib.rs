//! # Spaces Crate
//!
//! The two similarity spaces a title can be queried in, and the
//! nearest-neighbor search that runs against either of them.
//!
//! ## Components
//!
//! ### Content Space
//! TF-IDF vectors over genre terms:
//! - "Movies that are described like this one"
//! - One sparse row per catalog movie
//!
//! ### Collaborative Space
//! Dense rating vectors over every observed user:
//! - "Movies rated like this one"
//! - One row per rated title, unrated cells zero-filled
//!
//! ### Similarity
//! `nearest(space, title, k)` scores the query row against every row on
//! demand. No pairwise matrix is ever materialized, so memory stays linear
//! in catalog size.
//!
//! ## Example Usage
//!
//! ```ignore
//! use spaces::{nearest, CollaborativeSpace, ContentSpace};
//!
//! let content = ContentSpace::build(&catalog);
//! let collaborative = CollaborativeSpace::build(&catalog);
//!
//! let by_genre = nearest(&content, "Toy Story (1995)", 10);
//! let by_ratings = nearest(&collaborative, "Toy Story (1995)", 10);
//! ```

// Public modules
pub mod vector;
pub mod similarity;
pub mod content;
pub mod collaborative;

// Re-export commonly used types
pub use collaborative::CollaborativeSpace;
pub use content::ContentSpace;
pub use similarity::{Neighbor, VectorSpace, nearest};
pub use vector::SparseVector;
