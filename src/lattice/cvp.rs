//! Closest- and shortest-vector approximations.
//!
//! Babai's nearest-plane algorithm walks the orthogonalized basis from the
//! last index to the first, rounding the projection coefficient at each
//! step and subtracting that multiple of the *original* basis vector from
//! the running target. Approximation factor 2^(n/2). Exact CVP/SVP by full
//! enumeration is out of scope.

use super::{dot, gram_schmidt, lll_reduce, norm, sub_scaled, LatticeBasis};
use crate::bigint::BigInt;
use crate::error::{EngineError, Result};
use crate::fixed::BigFixed;

/// A closest-vector approximation: the lattice point, the integer
/// combination that produces it, and the distance left over.
#[derive(Clone, Debug)]
pub struct CvpSolution {
    /// The lattice point closest to the target (within the approximation
    /// factor).
    pub point: Vec<BigFixed>,
    /// Integer coefficients of the point in the input basis.
    pub coefficients: Vec<BigInt>,
    /// Euclidean distance from the target to the point.
    pub distance: BigFixed,
}

/// Babai's nearest-plane approximation to the closest vector problem.
///
/// If the target is an exact integer combination of the basis vectors, the
/// exact combination is recovered with zero residual.
pub fn nearest_plane(basis: &LatticeBasis, target: &[BigFixed]) -> Result<CvpSolution> {
    if target.len() != basis.dimension() {
        return Err(EngineError::DimensionMismatch {
            expected: basis.dimension(),
            actual: target.len(),
        });
    }
    let n = basis.rank();
    let w = basis.precision().working();
    let gso = gram_schmidt(basis)?;

    let mut current: Vec<BigFixed> = target.iter().map(|c| c.rescale(w)).collect();
    let mut coefficients = vec![BigInt::zero(); n];

    for i in (0..n).rev() {
        // Project the running target on b*_i and round to the nearest
        // lattice plane.
        let c = dot(&current, &gso.vectors[i])?.div(&gso.norms_sq[i])?;
        let rounded = c.round();
        let q = BigFixed::from_bigint(&rounded, w);
        current = sub_scaled(&current, basis.vector(i), &q);
        coefficients[i] = rounded;
    }

    // Reconstruct the lattice point from the accumulated coefficients.
    let mut point = vec![BigFixed::zero(w); basis.dimension()];
    for (i, coeff) in coefficients.iter().enumerate() {
        let q = BigFixed::from_bigint(coeff, w);
        for (p, b) in point.iter_mut().zip(basis.vector(i).iter()) {
            let accumulated = &*p + &(&q * b);
            *p = accumulated;
        }
    }

    let distance = norm(&current, basis.precision())?;
    Ok(CvpSolution { point, coefficients, distance })
}

/// Approximate shortest vector: LLL-reduce, then return the first basis
/// vector. Approximation factor 2^((n-1)/2) for delta = 3/4.
pub fn shortest_vector(basis: &mut LatticeBasis, delta: f64) -> Result<Vec<BigFixed>> {
    lll_reduce(basis, delta)?;
    Ok(basis.vector(0).to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::Precision;
    use crate::lattice::norm_sq;

    fn basis(rows: &[Vec<f64>]) -> LatticeBasis {
        LatticeBasis::from_rows(rows, Precision::new(64)).unwrap()
    }

    fn fx(v: f64) -> BigFixed {
        BigFixed::from_f64(v, 64).unwrap()
    }

    #[test]
    fn test_exact_combination_recovered() {
        // target = 3*b0 - 2*b1 must come back exactly.
        let b = basis(&[vec![2.0, 1.0], vec![1.0, 3.0]]);
        let target = [fx(3.0 * 2.0 - 2.0 * 1.0), fx(3.0 * 1.0 - 2.0 * 3.0)];
        let sol = nearest_plane(&b, &target).unwrap();
        assert_eq!(sol.coefficients[0], BigInt::from_i64(3));
        assert_eq!(sol.coefficients[1], BigInt::from_i64(-2));
        assert!(sol.distance.to_f64() < 1e-12, "residual must be zero");
        assert!((sol.point[0].to_f64() - target[0].to_f64()).abs() < 1e-12);
    }

    #[test]
    fn test_nearby_target_snaps_to_lattice() {
        let b = basis(&[vec![1.0, 0.0], vec![0.0, 1.0]]);
        let sol = nearest_plane(&b, &[fx(2.3), fx(-1.4)]).unwrap();
        assert_eq!(sol.coefficients[0], BigInt::from_i64(2));
        assert_eq!(sol.coefficients[1], BigInt::from_i64(-1));
        assert_eq!(sol.point[0].to_f64(), 2.0);
        assert_eq!(sol.point[1].to_f64(), -1.0);
        let d = sol.distance.to_f64();
        assert!((d - (0.09f64 + 0.16).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_dimension_mismatch() {
        let b = basis(&[vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert!(matches!(
            nearest_plane(&b, &[fx(1.0)]),
            Err(EngineError::DimensionMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_shortest_vector() {
        // The lattice of {(12, 2), (13, 4)} contains (1, 2).
        let mut b = basis(&[vec![12.0, 2.0], vec![13.0, 4.0]]);
        let shortest = shortest_vector(&mut b, 0.75).unwrap();
        let len_sq = norm_sq(&shortest).unwrap().to_f64();
        assert!(len_sq <= 5.0 + 1e-9, "shortest vector should be (+-1, +-2)");
        assert!(b.is_reduced());
    }
}
