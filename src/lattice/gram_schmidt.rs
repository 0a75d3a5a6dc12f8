//! Classical Gram-Schmidt orthogonalization with retained projection
//! coefficients.
//!
//! For basis vectors b_1..b_n the orthogonal system is
//! b*_i = b_i - sum_{j<i} mu_ij * b*_j with
//! mu_ij = <b_i, b*_j> / <b*_j, b*_j>. The mu matrix and the squared
//! norms of the b* vectors are byproducts the LLL loop feeds on, so they
//! are returned alongside the vectors. Cost O(n^2 d) inner products.

use super::{dot, norm_sq, sub_scaled, LatticeBasis};
use crate::error::{EngineError, Result};
use crate::fixed::BigFixed;

/// Result of orthogonalizing a basis: a derived, recomputed artifact that
/// holds no reference back to the source basis.
#[derive(Clone, Debug)]
pub struct Orthogonalization {
    /// The orthogonal vectors b*_i.
    pub vectors: Vec<Vec<BigFixed>>,
    /// Projection coefficients; `mu[i][j]` is only meaningful for j < i.
    pub mu: Vec<Vec<BigFixed>>,
    /// Squared norms ||b*_i||^2.
    pub norms_sq: Vec<BigFixed>,
}

/// Orthogonalize a basis, retaining the mu coefficients.
///
/// Linearly dependent input produces a zero b* vector, which is reported
/// as [`EngineError::SingularBasis`] rather than dividing by it.
pub fn gram_schmidt(basis: &LatticeBasis) -> Result<Orthogonalization> {
    let n = basis.rank();
    let w = basis.precision().working();
    let zero = BigFixed::zero(w);

    let mut vectors: Vec<Vec<BigFixed>> = Vec::with_capacity(n);
    let mut mu = vec![vec![zero.clone(); n]; n];
    let mut norms_sq = Vec::with_capacity(n);

    for i in 0..n {
        let mut b_star = basis.vector(i).to_vec();
        for j in 0..i {
            // mu_ij = <b_i, b*_j> / ||b*_j||^2 (classical: against the
            // original b_i, not the partially reduced one).
            let mu_ij = dot(basis.vector(i), &vectors[j])?.div(&norms_sq[j])?;
            b_star = sub_scaled(&b_star, &vectors[j], &mu_ij);
            mu[i][j] = mu_ij;
        }
        let norm = norm_sq(&b_star)?;
        if norm.is_zero() {
            return Err(EngineError::SingularBasis);
        }
        vectors.push(b_star);
        norms_sq.push(norm);
    }

    Ok(Orthogonalization { vectors, mu, norms_sq })
}
