//! Modular arithmetic and the Euclidean family: gcd, Bézout coefficients,
//! modular exponentiation and inversion, Jacobi and Legendre symbols.

use core::mem;

use super::BigInt;
use crate::error::{EngineError, Result};

impl BigInt {
    /// Greatest common divisor of the magnitudes (always non-negative).
    pub fn gcd(&self, other: &BigInt) -> BigInt {
        let mut a = self.abs();
        let mut b = other.abs();
        while !b.is_zero() {
            let (_, r) = a.div_rem_unchecked(&b);
            a = b;
            b = r.abs();
        }
        a
    }

    /// Extended Euclidean algorithm.
    ///
    /// Returns `(g, x, y)` with `self * x + other * y == g` and
    /// `g == gcd(self, other) >= 0`.
    pub fn extended_gcd(&self, other: &BigInt) -> (BigInt, BigInt, BigInt) {
        let mut r0 = self.clone();
        let mut r1 = other.clone();
        let mut s0 = BigInt::one();
        let mut s1 = BigInt::zero();
        let mut t0 = BigInt::zero();
        let mut t1 = BigInt::one();

        while !r1.is_zero() {
            let (q, r2) = r0.div_rem_unchecked(&r1);
            r0 = mem::replace(&mut r1, r2);
            let s2 = &s0 - &(&q * &s1);
            s0 = mem::replace(&mut s1, s2);
            let t2 = &t0 - &(&q * &t1);
            t0 = mem::replace(&mut t1, t2);
        }

        // Normalize the gcd to be non-negative.
        if r0.is_negative() {
            (r0.neg(), s0.neg(), t0.neg())
        } else {
            (r0, s0, t0)
        }
    }

    /// Least common multiple; `lcm(0, x) == 0`.
    pub fn lcm(&self, other: &BigInt) -> BigInt {
        if self.is_zero() || other.is_zero() {
            return BigInt::zero();
        }
        let g = self.gcd(other);
        let (q, _) = self.abs().div_rem_unchecked(&g);
        &q * &other.abs()
    }

    /// Modular exponentiation `self^exp mod modulus` by binary
    /// square-and-multiply, O(log exp * log^2 modulus).
    ///
    /// The exponent must be non-negative; the base is reduced into
    /// `[0, modulus)` first.
    pub fn mod_exp(&self, exp: &BigInt, modulus: &BigInt) -> Result<BigInt> {
        if modulus.is_zero() {
            return Err(EngineError::DivisionByZero);
        }
        if exp.is_negative() {
            return Err(EngineError::OutOfDomain {
                function: "mod_exp",
                value: exp.to_f64(),
            });
        }
        let modulus = modulus.abs();
        let mut base = self.rem_euclid(&modulus)?;
        let mut result = BigInt::one().rem_euclid(&modulus)?;
        let bits = exp.bit_length();
        for i in 0..bits {
            if exp.bit(i) {
                result = (&result * &base).rem_euclid(&modulus)?;
            }
            base = (&base * &base).rem_euclid(&modulus)?;
        }
        Ok(result)
    }

    /// Modular inverse via the extended Euclidean algorithm.
    ///
    /// Fails with [`EngineError::NotInvertible`] when the operand and the
    /// modulus are not coprime.
    pub fn mod_inverse(&self, modulus: &BigInt) -> Result<BigInt> {
        if modulus.is_zero() {
            return Err(EngineError::DivisionByZero);
        }
        let (g, x, _) = self.extended_gcd(modulus);
        if g != BigInt::one() {
            return Err(EngineError::NotInvertible { gcd: g.to_string() });
        }
        x.rem_euclid(modulus)
    }

    /// Jacobi symbol `(self / n)` for odd positive `n`, by the binary
    /// algorithm in O(log^2 n).
    pub fn jacobi(&self, n: &BigInt) -> Result<i32> {
        if n.is_negative() || n.is_zero() || n.is_even() {
            return Err(EngineError::OutOfDomain {
                function: "jacobi",
                value: n.to_f64(),
            });
        }
        let mut a = self.rem_euclid(n)?;
        let mut n = n.clone();
        let mut result = 1i32;
        while !a.is_zero() {
            while a.is_even() {
                a = a.shr(1);
                // (2/n) = -1 iff n = ±3 mod 8.
                let n_mod8 = n.low_u64() & 7;
                if n_mod8 == 3 || n_mod8 == 5 {
                    result = -result;
                }
            }
            mem::swap(&mut a, &mut n);
            // Quadratic reciprocity flip.
            if a.low_u64() & 3 == 3 && n.low_u64() & 3 == 3 {
                result = -result;
            }
            a = a.rem_euclid(&n)?;
        }
        Ok(if n == BigInt::one() { result } else { 0 })
    }

    /// Legendre symbol `(self / p)` for odd prime `p`, by Euler's criterion
    /// `a^((p-1)/2) mod p`.
    pub fn legendre(&self, p: &BigInt) -> Result<i32> {
        let two = BigInt::from_u64(2);
        if p.is_negative() || p <= &two || p.is_even() {
            return Err(EngineError::OutOfDomain {
                function: "legendre",
                value: p.to_f64(),
            });
        }
        let exp = (p - &BigInt::one()).shr(1);
        let t = self.mod_exp(&exp, p)?;
        if t.is_zero() {
            Ok(0)
        } else if t == BigInt::one() {
            Ok(1)
        } else if t == p - &BigInt::one() {
            Ok(-1)
        } else {
            // Euler's criterion produced a value impossible for a prime.
            Err(EngineError::OutOfDomain { function: "legendre", value: p.to_f64() })
        }
    }
}
