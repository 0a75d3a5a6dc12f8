//! Fundamental constants and square roots at arbitrary precision.
//!
//! Everything here is computed at the guarded working scale and truncated
//! back to the requested precision on return.

use super::{BigFixed, Precision};
use crate::bigint::BigInt;
use crate::error::{EngineError, Result};

/// arctan(1/q) by the Gregory series, for the Machin formula. Converges one
/// factor of q^2 per term.
fn atan_inv(q: u32, scale: u32) -> Result<BigFixed> {
    let q_fixed = BigFixed::from_i64(q as i64, scale);
    let q_sq = BigFixed::from_i64((q as i64) * (q as i64), scale);
    let mut power = BigFixed::from_i64(1, scale).div(&q_fixed)?;
    let mut sum = power.clone();
    let mut k = 1u64;
    loop {
        power = power.div(&q_sq)?;
        let term = power.div(&BigFixed::from_i64(2 * k as i64 + 1, scale))?;
        if term.is_zero() {
            break;
        }
        if k % 2 == 1 {
            sum = &sum - &term;
        } else {
            sum = &sum + &term;
        }
        k += 1;
    }
    Ok(sum)
}

/// pi via Machin's formula: 16 atan(1/5) - 4 atan(1/239).
pub fn pi(precision: Precision) -> Result<BigFixed> {
    let w = precision.working();
    let a5 = atan_inv(5, w)?;
    let a239 = atan_inv(239, w)?;
    let sixteen = BigFixed::from_i64(16, w);
    let four = BigFixed::from_i64(4, w);
    let result = &(&sixteen * &a5) - &(&four * &a239);
    Ok(result.rescale(precision.bits()))
}

/// ln 2 = 2 atanh(1/3) = 2 sum_k 1 / ((2k+1) 3^(2k+1)).
pub fn ln2(precision: Precision) -> Result<BigFixed> {
    let w = precision.working();
    let three = BigFixed::from_i64(3, w);
    let nine = BigFixed::from_i64(9, w);
    let mut power = BigFixed::from_i64(1, w).div(&three)?;
    let mut sum = power.clone();
    let mut k = 1u64;
    loop {
        power = power.div(&nine)?;
        let term = power.div(&BigFixed::from_i64(2 * k as i64 + 1, w))?;
        if term.is_zero() {
            break;
        }
        sum = &sum + &term;
        k += 1;
    }
    let result = &sum + &sum;
    Ok(result.rescale(precision.bits()))
}

/// Euler's number as sum 1/k!.
pub fn e(precision: Precision) -> Result<BigFixed> {
    let w = precision.working();
    let mut sum = BigFixed::from_i64(2, w);
    let mut term = BigFixed::from_i64(1, w);
    let mut k = 2u64;
    loop {
        term = term.div(&BigFixed::from_i64(k as i64, w))?;
        if term.is_zero() {
            break;
        }
        sum = &sum + &term;
        k += 1;
    }
    Ok(sum.rescale(precision.bits()))
}

/// Golden ratio (1 + sqrt 5) / 2.
pub fn phi(precision: Precision) -> Result<BigFixed> {
    let w = Precision::with_guard(precision.working(), precision.guard());
    let root5 = sqrt(&BigInt::from_u64(5), w)?;
    let half_sum = (&BigFixed::from_i64(1, w.bits()) + &root5).shr(1);
    Ok(half_sum.rescale(precision.bits()))
}

/// Square root of a non-negative integer.
///
/// Newton iteration on the integer mantissa `n * 2^(2w)`; the iteration is
/// monotone from above, so it terminates without a tolerance check.
pub fn sqrt(n: &BigInt, precision: Precision) -> Result<BigFixed> {
    if n.is_negative() {
        return Err(EngineError::OutOfDomain { function: "sqrt", value: n.to_f64() });
    }
    let w = precision.working();
    let shifted = n.shl(2 * w as u64);
    let mantissa = shifted.nth_root(2)?;
    Ok(BigFixed::from_mantissa(&mantissa, w, false).rescale(precision.bits()))
}

/// Square root of a non-negative fixed-point value.
pub fn sqrt_fixed(x: &BigFixed, precision: Precision) -> Result<BigFixed> {
    if x.is_negative() {
        return Err(EngineError::OutOfDomain { function: "sqrt", value: x.to_f64() });
    }
    let w = precision.working();
    // Mantissa at scale 2w is (value * 2^w)^2-ready: isqrt halves the scale.
    let mantissa = x.rescale(2 * w).mantissa().nth_root(2)?;
    Ok(BigFixed::from_mantissa(&mantissa, w, false).rescale(precision.bits()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: Precision = Precision { bits: 96, guard: 64 };

    #[test]
    fn test_pi() {
        let pi_val = pi(P).unwrap();
        assert!((pi_val.to_f64() - core::f64::consts::PI).abs() < 1e-15);
        // 50 decimal digits of pi, checked textually.
        let digits = pi(Precision::new(256)).unwrap().to_decimal(25);
        assert!(digits.starts_with("3.1415926535897932384626433"));
    }

    #[test]
    fn test_ln2() {
        let l = ln2(P).unwrap();
        assert!((l.to_f64() - core::f64::consts::LN_2).abs() < 1e-15);
    }

    #[test]
    fn test_e() {
        let e_val = e(P).unwrap();
        assert!((e_val.to_f64() - core::f64::consts::E).abs() < 1e-15);
    }

    #[test]
    fn test_phi_fixed_point_identity() {
        // phi^2 = phi + 1.
        let phi_val = phi(P).unwrap();
        let lhs = &phi_val * &phi_val;
        let rhs = &phi_val + &BigFixed::from_i64(1, 96);
        let diff = (&lhs - &rhs).abs();
        assert!(diff < BigFixed::from_f64(1e-20, 96).unwrap());
    }

    #[test]
    fn test_sqrt_exact() {
        let r = sqrt(&BigInt::from_u64(144), P).unwrap();
        assert_eq!(r.to_f64(), 12.0);
    }

    #[test]
    fn test_sqrt_irrational() {
        let r = sqrt(&BigInt::from_u64(2), P).unwrap();
        assert!((r.to_f64() - core::f64::consts::SQRT_2).abs() < 1e-15);
        // r^2 should reproduce 2 to within the requested precision.
        let sq = &r * &r;
        let diff = (&sq - &BigFixed::from_i64(2, 96)).abs();
        assert!(diff < BigFixed::from_f64(1e-25, 96).unwrap());
    }

    #[test]
    fn test_sqrt_fixed() {
        let x = BigFixed::from_f64(6.25, 64).unwrap();
        let r = sqrt_fixed(&x, P).unwrap();
        assert!((r.to_f64() - 2.5).abs() < 1e-15);
    }

    #[test]
    fn test_sqrt_negative_is_domain_error() {
        assert!(sqrt(&BigInt::from_i64(-1), P).is_err());
    }
}
