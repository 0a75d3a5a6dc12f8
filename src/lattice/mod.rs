//! Lattice bases and the reduction algorithms over them: Gram-Schmidt
//! orthogonalization, LLL reduction, Babai's nearest-plane CVP
//! approximation, and basis-quality metrics.
//!
//! All vector arithmetic runs in `BigFixed` at the basis's working
//! precision. A basis carries two status flags — `orthogonal` and
//! `reduced` — which every mutation clears and only the algorithms that
//! establish the corresponding invariant set.

mod cvp;
mod gram_schmidt;
mod lll;
mod metrics;

pub use cvp::{nearest_plane, shortest_vector, CvpSolution};
pub use gram_schmidt::{gram_schmidt, Orthogonalization};
pub use lll::lll_reduce;
pub use metrics::{determinant, hermite_factor, is_lll_reduced, orthogonality_defect};

use crate::error::{EngineError, Result};
use crate::fixed::{consts, BigFixed, Precision};

/// A lattice basis: `rank` vectors of `dimension` fixed-point coordinates.
#[derive(Clone, Debug)]
pub struct LatticeBasis {
    /// Row vectors; `vectors[i]` has `dimension` coordinates.
    vectors: Vec<Vec<BigFixed>>,
    /// Number of basis vectors.
    rank: usize,
    /// Coordinates per vector.
    dimension: usize,
    /// Working precision for all arithmetic on this basis.
    precision: Precision,
    /// All pairwise inner products of distinct vectors are zero
    /// (to working precision) while set.
    orthogonal: bool,
    /// The Lovász condition holds between every adjacent pair while set.
    reduced: bool,
}

impl LatticeBasis {
    /// Build a basis from row vectors, validating the shape.
    pub fn new(vectors: Vec<Vec<BigFixed>>, precision: Precision) -> Result<Self> {
        if vectors.is_empty() {
            return Err(EngineError::EmptyInput("lattice basis"));
        }
        let dimension = vectors[0].len();
        if dimension == 0 {
            return Err(EngineError::EmptyInput("basis vector"));
        }
        for v in &vectors {
            if v.len() != dimension {
                return Err(EngineError::DimensionMismatch {
                    expected: dimension,
                    actual: v.len(),
                });
            }
        }
        let rank = vectors.len();
        let w = precision.working();
        let vectors = vectors
            .into_iter()
            .map(|v| v.into_iter().map(|c| c.rescale(w)).collect())
            .collect();
        Ok(Self { vectors, rank, dimension, precision, orthogonal: false, reduced: false })
    }

    /// Convenience constructor from f64 rows.
    pub fn from_rows(rows: &[Vec<f64>], precision: Precision) -> Result<Self> {
        let w = precision.working();
        let mut vectors = Vec::with_capacity(rows.len());
        for row in rows {
            let mut v = Vec::with_capacity(row.len());
            for &c in row {
                v.push(BigFixed::from_f64(c, w)?);
            }
            vectors.push(v);
        }
        Self::new(vectors, precision)
    }

    /// Number of basis vectors.
    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Coordinates per vector.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Working precision of this basis.
    #[inline]
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Borrow one basis vector.
    pub fn vector(&self, i: usize) -> &[BigFixed] {
        &self.vectors[i]
    }

    /// Borrow all basis vectors.
    pub fn rows(&self) -> &[Vec<BigFixed>] {
        &self.vectors
    }

    /// True while the basis is known orthogonal.
    #[inline]
    pub fn is_orthogonal(&self) -> bool {
        self.orthogonal
    }

    /// True while the basis is known LLL-reduced.
    #[inline]
    pub fn is_reduced(&self) -> bool {
        self.reduced
    }

    /// Replace a row; clears both status flags.
    pub fn set_vector(&mut self, i: usize, v: Vec<BigFixed>) -> Result<()> {
        if v.len() != self.dimension {
            return Err(EngineError::DimensionMismatch {
                expected: self.dimension,
                actual: v.len(),
            });
        }
        let w = self.precision.working();
        self.vectors[i] = v.into_iter().map(|c| c.rescale(w)).collect();
        self.invalidate();
        Ok(())
    }

    /// Swap two rows; clears both status flags.
    pub(crate) fn swap_rows(&mut self, i: usize, j: usize) {
        self.vectors.swap(i, j);
        self.invalidate();
    }

    pub(crate) fn invalidate(&mut self) {
        self.orthogonal = false;
        self.reduced = false;
    }

    pub(crate) fn mark_reduced(&mut self) {
        self.reduced = true;
    }

    pub(crate) fn row_mut(&mut self, i: usize) -> &mut Vec<BigFixed> {
        &mut self.vectors[i]
    }
}

/// Inner product of two coordinate slices.
pub fn dot(a: &[BigFixed], b: &[BigFixed]) -> Result<BigFixed> {
    if a.len() != b.len() {
        return Err(EngineError::DimensionMismatch { expected: a.len(), actual: b.len() });
    }
    if a.is_empty() {
        return Err(EngineError::EmptyInput("vector"));
    }
    let mut sum = &a[0] * &b[0];
    for (x, y) in a.iter().zip(b.iter()).skip(1) {
        sum = &sum + &(x * y);
    }
    Ok(sum)
}

/// Squared Euclidean norm.
pub fn norm_sq(v: &[BigFixed]) -> Result<BigFixed> {
    dot(v, v)
}

/// Euclidean norm at the given precision.
pub fn norm(v: &[BigFixed], precision: Precision) -> Result<BigFixed> {
    consts::sqrt_fixed(&norm_sq(v)?, precision)
}

/// `v - c * w`, elementwise.
pub(crate) fn sub_scaled(v: &[BigFixed], w: &[BigFixed], c: &BigFixed) -> Vec<BigFixed> {
    v.iter().zip(w.iter()).map(|(a, b)| a - &(c * b)).collect()
}
