//! Logarithms, exponentials, and trigonometry over `BigFixed`.
//!
//! Every function takes an explicit [`Precision`]: series run at
//! `bits + guard` and the result is truncated back to `bits` on return.
//! Domain violations are reported as errors, never as sentinel zeros.

use super::{consts, BigFixed, Precision};
use crate::bigint::BigInt;
use crate::error::{EngineError, Result};

/// Largest exponent magnitude accepted by [`exp`]. Beyond this the series
/// would need argument reduction to stay accurate, so the input is rejected
/// instead of silently degrading.
const EXP_MAX_ARG: i64 = 32;

/// Hard ceiling on series terms, proportional to working precision.
fn term_budget(working_bits: u32) -> usize {
    (working_bits as usize) * 4
}

/// Natural logarithm of a positive integer.
///
/// Argument reduction writes n = 2^k * m with m in [1, 2); ln(1 + x) is
/// then summed around x = m - 1 (with one extra halving when m is large
/// enough that the series would crawl), and k * ln 2 is added back.
pub fn ln(n: &BigInt, precision: Precision) -> Result<BigFixed> {
    if n.is_negative() || n.is_zero() {
        return Err(EngineError::NonPositiveLog);
    }
    let w = precision.working();
    if *n == BigInt::one() {
        return Ok(BigFixed::zero(precision.bits()));
    }

    // n = 2^k * m, m in [1, 2).
    let mut k = n.bit_length() - 1;
    let mut m = BigFixed::from_mantissa(&n.abs(), k as u32, false).rescale(w);

    // If m >= 1.5 step k once more so x = m - 1 lands in [-0.25, 0.5),
    // keeping the series convergent for every input.
    let threshold = &BigFixed::from_i64(3, w).shr(1);
    if &m >= threshold {
        k += 1;
        m = m.shr(1);
    }

    let one = BigFixed::from_i64(1, w);
    let x = &m - &one;

    // ln(1+x) = x - x^2/2 + x^3/3 - ...
    let mut sum = x.clone();
    let mut x_power = x.clone();
    for i in 2..term_budget(w) {
        x_power = &x_power * &x;
        let term = x_power.div(&BigFixed::from_i64(i as i64, w))?;
        if term.is_zero() {
            break;
        }
        if i % 2 == 0 {
            sum = &sum - &term;
        } else {
            sum = &sum + &term;
        }
    }

    let ln2 = consts::ln2(Precision::with_guard(w, precision.guard()))?;
    let k_fixed = BigFixed::from_i64(k as i64, w);
    let result = &(&k_fixed * &ln2) + &sum;
    Ok(result.rescale(precision.bits()))
}

/// Base-2 logarithm: ln(n) / ln(2).
pub fn log2(n: &BigInt, precision: Precision) -> Result<BigFixed> {
    let w = Precision::with_guard(precision.working(), precision.guard());
    let result = ln(n, w)?.div(&consts::ln2(w)?)?;
    Ok(result.rescale(precision.bits()))
}

/// Base-10 logarithm: ln(n) / ln(10).
pub fn log10(n: &BigInt, precision: Precision) -> Result<BigFixed> {
    log_base(n, &BigInt::from_u64(10), precision)
}

/// Arbitrary-base logarithm: ln(n) / ln(base).
pub fn log_base(n: &BigInt, base: &BigInt, precision: Precision) -> Result<BigFixed> {
    let w = Precision::with_guard(precision.working(), precision.guard());
    let ln_base = ln(base, w)?;
    if ln_base.is_zero() {
        // base == 1 has no logarithm.
        return Err(EngineError::OutOfDomain { function: "log_base", value: 1.0 });
    }
    let result = ln(n, w)?.div(&ln_base)?;
    Ok(result.rescale(precision.bits()))
}

/// Exponential e^x by Taylor series with early exit on term underflow.
///
/// Arguments with |x| > 32 are rejected: without argument reduction the
/// series cannot hold precision there, and a wrong answer is worse than a
/// refusal.
pub fn exp(x: &BigFixed, precision: Precision) -> Result<BigFixed> {
    let limit = BigFixed::from_i64(EXP_MAX_ARG, x.scale().max(1));
    if x.abs() > limit {
        return Err(EngineError::OutOfDomain { function: "exp", value: x.to_f64() });
    }
    let w = precision.working();
    if x.is_zero() {
        return Ok(BigFixed::from_i64(1, precision.bits()));
    }

    let x = x.rescale(w);
    let mut sum = BigFixed::from_i64(1, w);
    let mut term = BigFixed::from_i64(1, w);
    for i in 1..term_budget(w) {
        // term = x^i / i!
        term = (&term * &x).div(&BigFixed::from_i64(i as i64, w))?;
        if term.is_zero() {
            break;
        }
        sum = &sum + &term;
    }
    Ok(sum.rescale(precision.bits()))
}

/// Real power of a positive integer base: base^exponent = exp(exponent * ln base).
pub fn pow(base: &BigInt, exponent: &BigFixed, precision: Precision) -> Result<BigFixed> {
    let w = Precision::with_guard(precision.working(), precision.guard());
    let ln_base = ln(base, w)?;
    let product = exponent.rescale(w.bits()) * ln_base;
    let result = exp(&product, w)?;
    Ok(result.rescale(precision.bits()))
}

/// Sine by the fixed 5-term odd Taylor expansion about the unreduced
/// argument. Callers are responsible for prior range reduction; accuracy
/// degrades for large angles.
pub fn sin(theta: &BigFixed, precision: Precision) -> Result<BigFixed> {
    let w = precision.working();
    let x = theta.rescale(w);
    let x_sq = &x * &x;

    // 3!, 5!, 7!, 9!, 11!
    const FACTORIALS: [i64; 5] = [6, 120, 5040, 362_880, 39_916_800];
    let mut sum = x.clone();
    let mut x_power = x;
    for (i, &fact) in FACTORIALS.iter().enumerate() {
        x_power = &x_power * &x_sq;
        let term = x_power.div(&BigFixed::from_i64(fact, w))?;
        if i % 2 == 0 {
            sum = &sum - &term;
        } else {
            sum = &sum + &term;
        }
    }
    Ok(sum.rescale(precision.bits()))
}

/// Cosine by the fixed 5-term even Taylor expansion about the unreduced
/// argument. Callers are responsible for prior range reduction.
pub fn cos(theta: &BigFixed, precision: Precision) -> Result<BigFixed> {
    let w = precision.working();
    let x = theta.rescale(w);
    let x_sq = &x * &x;

    // 2!, 4!, 6!, 8!, 10!
    const FACTORIALS: [i64; 5] = [2, 24, 720, 40_320, 3_628_800];
    let mut sum = BigFixed::from_i64(1, w);
    let mut x_power = BigFixed::from_i64(1, w);
    for (i, &fact) in FACTORIALS.iter().enumerate() {
        x_power = &x_power * &x_sq;
        let term = x_power.div(&BigFixed::from_i64(fact, w))?;
        if i % 2 == 0 {
            sum = &sum - &term;
        } else {
            sum = &sum + &term;
        }
    }
    Ok(sum.rescale(precision.bits()))
}

/// Tangent: sin / cos. Fails near odd multiples of pi/2 where the cosine
/// underflows to zero.
pub fn tan(theta: &BigFixed, precision: Precision) -> Result<BigFixed> {
    let w = Precision::with_guard(precision.working(), precision.guard());
    let result = sin(theta, w)?.div(&cos(theta, w)?)?;
    Ok(result.rescale(precision.bits()))
}

/// Arctangent.
///
/// |x| <= 1 sums the Taylor series directly (after halving the argument
/// with atan(z) = 2 atan(z / (1 + sqrt(1 + z^2))) until it converges
/// briskly); |x| > 1 goes through atan(x) = +/- pi/2 - atan(1/x).
pub fn atan(x: &BigFixed, precision: Precision) -> Result<BigFixed> {
    let w = precision.working();
    let wp = Precision::with_guard(w, precision.guard());
    let one = BigFixed::from_i64(1, w);

    let use_reciprocal = x.abs() > one;
    let mut z = if use_reciprocal {
        one.div(&x.rescale(w))?
    } else {
        x.rescale(w)
    };

    // Halve until |z| <= 1/4; each step costs one square root.
    let quarter = BigFixed::from_i64(1, w).shr(2);
    let mut doublings = 0u32;
    while z.abs() > quarter {
        let z_sq = &z * &z;
        let root = consts::sqrt_fixed(&(&one + &z_sq), wp)?.rescale(w);
        z = z.div(&(&one + &root))?;
        doublings += 1;
    }

    // atan(z) = z - z^3/3 + z^5/5 - ...
    let z_sq = &z * &z;
    let mut sum = z.clone();
    let mut z_power = z;
    for n in 1..term_budget(w) {
        z_power = &z_power * &z_sq;
        let term = z_power.div(&BigFixed::from_i64(2 * n as i64 + 1, w))?;
        if term.is_zero() {
            break;
        }
        if n % 2 == 1 {
            sum = &sum - &term;
        } else {
            sum = &sum + &term;
        }
    }
    for _ in 0..doublings {
        sum = &sum + &sum;
    }

    let result = if use_reciprocal {
        // atan(x) = pi/2 - atan(1/x), sign following x.
        let mut half_pi = consts::pi(wp)?.rescale(w).shr(1);
        if x.is_negative() {
            half_pi = half_pi.neg();
        }
        &half_pi - &sum
    } else {
        sum
    };
    Ok(result.rescale(precision.bits()))
}

/// Two-argument arctangent with quadrant correction.
///
/// `atan2(0, 0)` returns zero by convention (matching libm) rather than
/// reporting an error.
pub fn atan2(y: &BigFixed, x: &BigFixed, precision: Precision) -> Result<BigFixed> {
    let w = precision.working();
    let wp = Precision::with_guard(w, precision.guard());

    if x.is_zero() {
        if y.is_zero() {
            return Ok(BigFixed::zero(precision.bits()));
        }
        let mut half_pi = consts::pi(wp)?.rescale(w).shr(1);
        if y.is_negative() {
            half_pi = half_pi.neg();
        }
        return Ok(half_pi.rescale(precision.bits()));
    }

    let ratio = y.rescale(w).div(&x.rescale(w))?;
    let mut result = atan(&ratio, wp)?.rescale(w);

    if x.is_negative() {
        let pi = consts::pi(wp)?.rescale(w);
        if y.is_negative() {
            result = &result - &pi;
        } else {
            result = &result + &pi;
        }
    }
    Ok(result.rescale(precision.bits()))
}
