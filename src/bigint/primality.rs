//! Primality testing, factorization, and congruence solving.
//!
//! Miller-Rabin gives probabilistic primality with error probability at
//! most 4^-k for k iterations; Pollard's rho finds factors in expected
//! O(n^(1/4)) via Floyd cycle detection on x -> x^2 + c mod n. "No factor
//! found" is a distinct outcome from "input is prime".

use std::collections::BTreeMap;

use rand::Rng;

use super::BigInt;
use crate::error::{EngineError, Result};

/// Iteration budget for one Pollard rho cycle hunt.
const RHO_MAX_ITERATIONS: usize = 100_000;

/// Number of x^2 + c polynomials tried before giving up.
const RHO_MAX_RESTARTS: u64 = 10;

/// Miller-Rabin iteration count used internally by the factorizer.
const FACTOR_MR_ROUNDS: u32 = 20;

/// `(a * b) mod n` for non-negative operands and a non-zero modulus.
fn mod_mul(a: &BigInt, b: &BigInt, n: &BigInt) -> BigInt {
    (a * b).div_rem_unchecked(n).1
}

/// `base^exp mod n` over non-negative values; `n` must be non-zero.
fn mod_exp_pos(base: &BigInt, exp: &BigInt, n: &BigInt) -> BigInt {
    let mut result = BigInt::one().div_rem_unchecked(n).1;
    let mut base = base.div_rem_unchecked(n).1;
    for i in 0..exp.bit_length() {
        if exp.bit(i) {
            result = mod_mul(&result, &base, n);
        }
        base = mod_mul(&base, &base, n);
    }
    result
}

/// Uniform-ish random value in `[0, bound)`; `bound` must be positive.
fn random_below(bound: &BigInt, rng: &mut impl Rng) -> BigInt {
    let bits = bound.bit_length();
    let limbs = bound.limbs.len();
    let top_bits = bits - (limbs as u64 - 1) * 32;
    let top_mask = if top_bits == 32 { u32::MAX } else { (1u32 << top_bits) - 1 };
    // Rejection sampling, falling back to a reduction after a few misses.
    for _ in 0..16 {
        let mut candidate: Vec<u32> = (0..limbs).map(|_| rng.gen::<u32>()).collect();
        if let Some(top) = candidate.last_mut() {
            *top &= top_mask;
        }
        let candidate = BigInt::from_limbs(candidate, false);
        if candidate.cmp_magnitude(bound) == core::cmp::Ordering::Less {
            return candidate;
        }
    }
    let candidate: Vec<u32> = (0..limbs).map(|_| rng.gen::<u32>()).collect();
    BigInt::from_limbs(candidate, false).div_rem_unchecked(bound).1
}

impl BigInt {
    /// Miller-Rabin probabilistic primality test.
    ///
    /// Returns true if the value is probably prime; a composite slips
    /// through with probability at most 4^-iterations. Values below 2,
    /// negatives, and even values are handled deterministically.
    pub fn is_prime(&self, iterations: u32) -> bool {
        let two = BigInt::from_u64(2);
        let three = BigInt::from_u64(3);
        if self.is_negative() || self < &two {
            return false;
        }
        if self == &two || self == &three {
            return true;
        }
        if self.is_even() {
            return false;
        }

        // Write n - 1 = 2^r * d with d odd.
        let n_minus_1 = self - &BigInt::one();
        let r = n_minus_1.trailing_zeros();
        let d = n_minus_1.shr(r);

        let n_minus_3 = self - &three;
        let mut rng = rand::thread_rng();

        'witness: for _ in 0..iterations {
            // a uniform in [2, n-2].
            let a = &random_below(&n_minus_3, &mut rng) + &two;
            let mut x = mod_exp_pos(&a, &d, self);
            if x == BigInt::one() || x == n_minus_1 {
                continue;
            }
            for _ in 0..r.saturating_sub(1) {
                x = mod_mul(&x, &x, self);
                if x == n_minus_1 {
                    continue 'witness;
                }
            }
            return false;
        }
        true
    }

    /// Complete prime factorization as sorted `(prime, exponent)` pairs.
    ///
    /// Small primes are stripped by trial division, the remainder is split
    /// recursively with Pollard rho. Fails with a domain error for values
    /// below 1, and with a convergence error in the (astronomically rare)
    /// case that every rho restart stalls on a composite cofactor.
    pub fn factor(&self) -> Result<Vec<(BigInt, u32)>> {
        if self.is_negative() || self.is_zero() {
            return Err(EngineError::OutOfDomain {
                function: "factor",
                value: self.to_f64(),
            });
        }
        let mut factors: BTreeMap<BigInt, u32> = BTreeMap::new();
        let mut n = self.clone();

        // Strip small primes first so rho only sees hard cofactors.
        let mut small = 2u64;
        while small < 1000 && !n.is_zero() {
            let p = BigInt::from_u64(small);
            loop {
                let (q, r) = n.div_rem_unchecked(&p);
                if !r.is_zero() {
                    break;
                }
                *factors.entry(p.clone()).or_insert(0) += 1;
                n = q;
            }
            small = if small == 2 { 3 } else { small + 2 };
        }

        let mut pending = vec![n];
        while let Some(m) = pending.pop() {
            if m == BigInt::one() {
                continue;
            }
            if m.is_prime(FACTOR_MR_ROUNDS) {
                *factors.entry(m).or_insert(0) += 1;
                continue;
            }
            match pollard_rho(&m) {
                Some(d) => {
                    let (q, _) = m.div_rem_unchecked(&d);
                    pending.push(d);
                    pending.push(q);
                }
                None => {
                    return Err(EngineError::Convergence {
                        algorithm: "pollard_rho",
                        iterations: RHO_MAX_ITERATIONS,
                    });
                }
            }
        }
        Ok(factors.into_iter().collect())
    }

    /// Euler's totient via complete factorization:
    /// phi(n) = prod p^(k-1) * (p - 1).
    pub fn euler_phi(&self) -> Result<BigInt> {
        let factors = self.factor()?;
        let mut phi = BigInt::one();
        for (p, k) in &factors {
            let pk1 = p.pow(*k as u64 - 1);
            phi = &phi * &(&pk1 * &(p - &BigInt::one()));
        }
        Ok(phi)
    }

    /// Carmichael function: the least m with a^m = 1 mod n for every a
    /// coprime to n. lambda(2^k) halves phi for k >= 3; elsewhere it
    /// matches phi on prime powers; the total is the lcm over prime powers.
    pub fn carmichael(&self) -> Result<BigInt> {
        let factors = self.factor()?;
        let two = BigInt::from_u64(2);
        let mut lambda = BigInt::one();
        for (p, k) in &factors {
            let component = if *p == two {
                match *k {
                    1 => BigInt::one(),
                    2 => two.clone(),
                    k => BigInt::one().shl(k as u64 - 2),
                }
            } else {
                &p.pow(*k as u64 - 1) * &(p - &BigInt::one())
            };
            lambda = lambda.lcm(&component);
        }
        Ok(lambda)
    }
}

/// Pollard's rho with Floyd cycle detection on `x -> x^2 + c mod n`.
///
/// Returns a non-trivial factor, or `None` when every restart exhausts its
/// budget — which is the expected outcome for prime input, and distinct
/// from it: callers decide primality with [`BigInt::is_prime`].
pub fn pollard_rho(n: &BigInt) -> Option<BigInt> {
    let two = BigInt::from_u64(2);
    if n <= &BigInt::from_u64(3) {
        return None;
    }
    if n.is_even() {
        return Some(two);
    }

    for c in 1..=RHO_MAX_RESTARTS {
        let c = BigInt::from_u64(c);
        let step = |x: &BigInt| -> BigInt { (&mod_mul(x, x, n) + &c).div_rem_unchecked(n).1 };

        let mut x = two.clone();
        let mut y = two.clone();
        let mut d = BigInt::one();
        let mut iterations = 0usize;
        while d == BigInt::one() && iterations < RHO_MAX_ITERATIONS {
            x = step(&x);
            y = step(&step(&y));
            let diff = if x > y { &x - &y } else { &y - &x };
            d = diff.gcd(n);
            iterations += 1;
        }
        if d > BigInt::one() && &d < n {
            return Some(d);
        }
        // d == n means the cycle collapsed; retry with the next polynomial.
    }
    None
}

/// Chinese Remainder Theorem: solve `x = residues[i] mod moduli[i]` for
/// pairwise-coprime moduli.
///
/// Returns the unique solution in `[0, prod moduli)`. Fails with
/// [`EngineError::ModuliNotCoprime`] when any pair shares a factor.
pub fn crt(residues: &[BigInt], moduli: &[BigInt]) -> Result<BigInt> {
    if residues.is_empty() {
        return Err(EngineError::EmptyInput("crt congruence system"));
    }
    if residues.len() != moduli.len() {
        return Err(EngineError::DimensionMismatch {
            expected: residues.len(),
            actual: moduli.len(),
        });
    }
    let mut m_total = BigInt::one();
    for m in moduli {
        if m.is_zero() {
            return Err(EngineError::DivisionByZero);
        }
        m_total = &m_total * &m.abs();
    }

    let mut sum = BigInt::zero();
    for (a, m) in residues.iter().zip(moduli.iter()) {
        let (mi, _) = m_total.div_rem_unchecked(m);
        let yi = mi
            .mod_inverse(m)
            .map_err(|_| EngineError::ModuliNotCoprime)?;
        sum = &sum + &(&(a * &mi) * &yi);
    }
    sum.rem_euclid(&m_total)
}
