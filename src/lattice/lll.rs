//! LLL (Lenstra-Lenstra-Lovász) lattice basis reduction.
//!
//! The loop keeps a working index k starting at 1: size-reduce b_k against
//! b_{k-1}..b_0, re-orthogonalize, then test the Lovász condition
//! ||b*_k||^2 >= (delta - mu_{k,k-1}^2) ||b*_{k-1}||^2. A failure swaps
//! b_k with b_{k-1} and steps back; success advances k. Terminates when k
//! reaches the rank, guaranteeing (for delta in (1/4, 1)) polynomial time
//! and a first vector within 2^((n-1)/2) of the shortest lattice vector.

use super::{gram_schmidt, sub_scaled, LatticeBasis};
use crate::error::{EngineError, Result};
use crate::fixed::BigFixed;

/// Reduce the basis in place; returns the number of swaps performed as a
/// diagnostic.
///
/// `delta` is the Lovász parameter and must lie in (0.25, 1.0);
/// 0.75 is the classical choice.
pub fn lll_reduce(basis: &mut LatticeBasis, delta: f64) -> Result<usize> {
    if !(delta > 0.25 && delta < 1.0) {
        return Err(EngineError::InvalidDelta(delta));
    }
    let n = basis.rank();
    if n < 2 {
        basis.mark_reduced();
        return Ok(0);
    }

    let w = basis.precision().working();
    let half = BigFixed::from_i64(1, w).shr(1);
    let delta_fixed = BigFixed::from_f64(delta, w)?;

    let mut swaps = 0usize;
    let mut k = 1usize;
    while k < n {
        // Size reduction: for j = k-1 down to 0, subtract the rounded
        // projection whenever |mu_kj| exceeds 1/2, updating the affected
        // mu entries in place (mu_jj is implicitly 1).
        let mut gso = gram_schmidt(basis)?;
        for j in (0..k).rev() {
            let mu_kj = gso.mu[k][j].clone();
            if mu_kj.abs() > half {
                let q = BigFixed::from_bigint(&mu_kj.round(), w);
                let reduced = sub_scaled(basis.vector(k), basis.vector(j), &q);
                *basis.row_mut(k) = reduced;
                basis.invalidate();
                let adjusted = &gso.mu[k][j] - &q;
                gso.mu[k][j] = adjusted;
                for i in 0..j {
                    let adjusted = &gso.mu[k][i] - &(&q * &gso.mu[j][i]);
                    gso.mu[k][i] = adjusted;
                }
            }
        }

        // Re-orthogonalize after the subtractions, then test Lovász.
        let gso = gram_schmidt(basis)?;
        let mu = &gso.mu[k][k - 1];
        let mu_sq = mu * mu;
        let lhs = &gso.norms_sq[k];
        let rhs = &(&delta_fixed - &mu_sq) * &gso.norms_sq[k - 1];

        if *lhs < rhs {
            basis.swap_rows(k, k - 1);
            swaps += 1;
            k = k.saturating_sub(1).max(1);
        } else {
            k += 1;
        }
    }

    basis.mark_reduced();
    Ok(swaps)
}
