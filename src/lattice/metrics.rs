//! Basis quality metrics: orthogonality defect, Hermite factor,
//! determinant, and the LLL-reduction check.
//!
//! Defect and Hermite factor are diagnostics and come back as f64,
//! computed in log space so large products cannot overflow. The
//! determinant is exact-to-precision fixed point: closed form in
//! dimension 2, LU decomposition with partial pivoting above it.

use super::{gram_schmidt, norm_sq, LatticeBasis};
use crate::error::{EngineError, Result};
use crate::fixed::BigFixed;

/// Orthogonality defect: prod ||b_i|| / |det|, which is 1 exactly when the
/// basis is orthogonal and grows as vectors lean into each other.
/// |det| is taken as prod ||b*_i|| so any rank works.
pub fn orthogonality_defect(basis: &LatticeBasis) -> Result<f64> {
    let gso = gram_schmidt(basis)?;
    let mut log_product = 0.0f64;
    for i in 0..basis.rank() {
        log_product += norm_sq(basis.vector(i))?.to_f64().ln() / 2.0;
    }
    let mut log_det = 0.0f64;
    for n_sq in &gso.norms_sq {
        log_det += n_sq.to_f64().ln() / 2.0;
    }
    Ok((log_product - log_det).exp())
}

/// Hermite factor (||b_1|| / det^(1/n))^n; lower is better, 1 is optimal.
pub fn hermite_factor(basis: &LatticeBasis) -> Result<f64> {
    let gso = gram_schmidt(basis)?;
    let n = basis.rank() as f64;
    let log_b1 = norm_sq(basis.vector(0))?.to_f64().ln() / 2.0;
    let mut log_det = 0.0f64;
    for n_sq in &gso.norms_sq {
        log_det += n_sq.to_f64().ln() / 2.0;
    }
    Ok((n * log_b1 - log_det).exp())
}

/// Signed determinant of a square basis.
///
/// Dimension 2 uses the closed form; larger dimensions run LU
/// decomposition with partial pivoting in fixed point. A zero pivot means
/// the vectors are linearly dependent.
pub fn determinant(basis: &LatticeBasis) -> Result<BigFixed> {
    let n = basis.rank();
    if n != basis.dimension() {
        return Err(EngineError::DimensionMismatch {
            expected: n,
            actual: basis.dimension(),
        });
    }
    let w = basis.precision().working();

    if n == 1 {
        return Ok(basis.vector(0)[0].rescale(basis.precision().bits()));
    }
    if n == 2 {
        let r0 = basis.vector(0);
        let r1 = basis.vector(1);
        let det = &(&r0[0] * &r1[1]) - &(&r0[1] * &r1[0]);
        return Ok(det.rescale(basis.precision().bits()));
    }

    // LU with partial pivoting; det = +/- prod of pivots.
    let mut m: Vec<Vec<BigFixed>> = basis.rows().to_vec();
    let mut negate = false;
    for col in 0..n {
        let mut pivot = col;
        for row in col + 1..n {
            if m[row][col].abs() > m[pivot][col].abs() {
                pivot = row;
            }
        }
        if m[pivot][col].is_zero() {
            return Err(EngineError::SingularBasis);
        }
        if pivot != col {
            m.swap(pivot, col);
            negate = !negate;
        }
        for row in col + 1..n {
            let factor = m[row][col].div(&m[col][col])?;
            for c in col..n {
                let eliminated = &m[row][c] - &(&factor * &m[col][c]);
                m[row][c] = eliminated;
            }
        }
    }

    let mut det = BigFixed::from_i64(1, w);
    for (i, row) in m.iter().enumerate() {
        det = &det * &row[i];
    }
    if negate {
        det = det.neg();
    }
    Ok(det.rescale(basis.precision().bits()))
}

/// Verify the two LLL invariants at the given delta: size reduction
/// (|mu_ij| <= 1/2) and the Lovász condition for every adjacent pair.
pub fn is_lll_reduced(basis: &LatticeBasis, delta: f64) -> Result<bool> {
    if !(delta > 0.25 && delta < 1.0) {
        return Err(EngineError::InvalidDelta(delta));
    }
    let gso = gram_schmidt(basis)?;
    let tolerance = 1e-9;

    for i in 0..basis.rank() {
        for j in 0..i {
            if gso.mu[i][j].to_f64().abs() > 0.5 + tolerance {
                return Ok(false);
            }
        }
    }
    for k in 1..basis.rank() {
        let mu = gso.mu[k][k - 1].to_f64();
        let lhs = gso.norms_sq[k].to_f64();
        let rhs = (delta - mu * mu) * gso.norms_sq[k - 1].to_f64();
        if lhs < rhs - tolerance {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::Precision;
    use crate::lattice::lll_reduce;

    fn basis(rows: &[Vec<f64>]) -> LatticeBasis {
        LatticeBasis::from_rows(rows, Precision::new(64)).unwrap()
    }

    #[test]
    fn test_defect_of_orthogonal_basis() {
        let b = basis(&[vec![2.0, 0.0], vec![0.0, 5.0]]);
        assert!((orthogonality_defect(&b).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_defect_grows_with_skew() {
        let skewed = basis(&[vec![1.0, 0.0], vec![10.0, 1.0]]);
        let defect = orthogonality_defect(&skewed).unwrap();
        assert!(defect > 10.0, "skewed basis defect {} should be large", defect);
    }

    #[test]
    fn test_determinant_2d() {
        let b = basis(&[vec![3.0, 1.0], vec![2.0, 4.0]]);
        assert!((determinant(&b).unwrap().to_f64() - 10.0).abs() < 1e-9);
        // Swapped rows flip the sign.
        let swapped = basis(&[vec![2.0, 4.0], vec![3.0, 1.0]]);
        assert!((determinant(&swapped).unwrap().to_f64() + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_determinant_3d_lu() {
        // det = 1*(4*6 - 5*0) - 2*(0 - 5*1) + 3*(0 - 4) = 24 + 10 - 12 = 22.
        let b = basis(&[
            vec![1.0, 2.0, 3.0],
            vec![0.0, 4.0, 5.0],
            vec![1.0, 0.0, 6.0],
        ]);
        assert!((determinant(&b).unwrap().to_f64() - 22.0).abs() < 1e-8);
    }

    #[test]
    fn test_determinant_4d_lu() {
        // Block-diagonal: det = (1*2 - 0) * (3*4 - 2*5) = 2 * 2 = 4.
        let b = basis(&[
            vec![1.0, 0.0, 0.0, 0.0],
            vec![0.0, 2.0, 0.0, 0.0],
            vec![0.0, 0.0, 3.0, 5.0],
            vec![0.0, 0.0, 2.0, 4.0],
        ]);
        assert!((determinant(&b).unwrap().to_f64() - 4.0).abs() < 1e-8);
    }

    #[test]
    fn test_determinant_errors() {
        // Non-square.
        let rect = basis(&[vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]]);
        assert!(matches!(
            determinant(&rect),
            Err(EngineError::DimensionMismatch { .. })
        ));
        // Singular.
        let dep = basis(&[
            vec![1.0, 2.0, 3.0],
            vec![2.0, 4.0, 6.0],
            vec![0.0, 1.0, 1.0],
        ]);
        assert!(matches!(determinant(&dep), Err(EngineError::SingularBasis)));
    }

    #[test]
    fn test_hermite_factor_identity() {
        let b = basis(&[vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert!((hermite_factor(&b).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_is_lll_reduced() {
        let mut b = basis(&[vec![201.0, 37.0], vec![1648.0, 297.0]]);
        assert!(!is_lll_reduced(&b, 0.75).unwrap(), "raw basis is not reduced");
        lll_reduce(&mut b, 0.75).unwrap();
        assert!(is_lll_reduced(&b, 0.75).unwrap());
        assert!(is_lll_reduced(&b, 0.3).is_ok());
        assert!(is_lll_reduced(&b, 1.5).is_err());
    }
}
