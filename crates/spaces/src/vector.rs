//! Vector representations and cosine similarity.
//!
//! Dot products accumulate in f64 and the result is clamped to [-1, 1], so
//! identical vectors score exactly 1.0 after rounding to f32.

/// Sparse vector as `(dimension, weight)` pairs sorted by dimension
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f32)>,
}

impl SparseVector {
    /// Build from pairs that are already sorted by dimension with no repeats
    pub fn from_sorted(entries: Vec<(usize, f32)>) -> Self {
        debug_assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
        Self { entries }
    }

    pub fn entries(&self) -> &[(usize, f32)] {
        &self.entries
    }

    /// Weight at `dim`, zero when the dimension is absent
    pub fn get(&self, dim: usize) -> f32 {
        self.entries
            .binary_search_by_key(&dim, |&(d, _)| d)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    pub fn is_zero(&self) -> bool {
        self.entries.iter().all(|&(_, w)| w == 0.0)
    }

    pub fn norm(&self) -> f64 {
        self.entries
            .iter()
            .map(|&(_, w)| (w as f64) * (w as f64))
            .sum::<f64>()
            .sqrt()
    }

    /// Dot product by merging the two sorted entry lists
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let (a, b) = (&self.entries, &other.entries);
        let mut sum = 0.0f64;
        while i < a.len() && j < b.len() {
            match a[i].0.cmp(&b[j].0) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a[i].1 as f64 * b[j].1 as f64;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// Scale to unit length; an all-zero vector is left as is
    pub fn normalized(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 {
            for entry in &mut self.entries {
                entry.1 = (entry.1 as f64 / norm) as f32;
            }
        }
        self
    }
}

pub fn dense_norm(v: &[f32]) -> f64 {
    v.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>().sqrt()
}

pub fn dense_dot(a: &[f32], b: &[f32]) -> f64 {
    a.iter().zip(b).map(|(&x, &y)| x as f64 * y as f64).sum()
}

/// Cosine from a dot product and the two norms.
///
/// A zero-norm side has no direction; its similarity to anything is 0.
pub fn cosine_from_parts(dot: f64, norm_a: f64, norm_b: f64) -> f32 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0) as f32
}

pub fn sparse_cosine(a: &SparseVector, b: &SparseVector) -> f32 {
    cosine_from_parts(a.dot(b), a.norm(), b.norm())
}

pub fn dense_cosine(a: &[f32], b: &[f32]) -> f32 {
    cosine_from_parts(dense_dot(a, b), dense_norm(a), dense_norm(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_dot_skips_disjoint_dims() {
        let a = SparseVector::from_sorted(vec![(0, 1.0), (2, 2.0), (5, 3.0)]);
        let b = SparseVector::from_sorted(vec![(1, 4.0), (2, 0.5), (5, 1.0)]);
        assert!((a.dot(&b) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalized_has_unit_norm() {
        let v = SparseVector::from_sorted(vec![(0, 3.0), (1, 4.0)]).normalized();
        assert!((v.norm() - 1.0).abs() < 1e-6);
        assert!((v.get(0) - 0.6).abs() < 1e-6);
        assert_eq!(v.get(7), 0.0);
    }

    #[test]
    fn test_zero_vector_cosine_is_zero() {
        let zero = SparseVector::default();
        let v = SparseVector::from_sorted(vec![(0, 1.0)]);
        assert_eq!(sparse_cosine(&zero, &v), 0.0);
        assert_eq!(dense_cosine(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_identical_dense_vectors_score_one() {
        let v = [4.0, 3.5, 0.0, 5.0];
        assert_eq!(dense_cosine(&v, &v), 1.0);
    }

    #[test]
    fn test_opposite_vectors_score_minus_one() {
        assert_eq!(dense_cosine(&[1.0, -2.0], &[-1.0, 2.0]), -1.0);
    }
}
