//! Arbitrary-precision signed fixed-point numbers.
//!
//! A `BigFixed` is an integer-part magnitude, a fractional-part magnitude
//! interpreted as a numerator over 2^scale, a binary scale, and a sign.
//! The fractional part always stays in `[0, 2^scale)`; carries and borrows
//! across the integer/fractional boundary are resolved on every operation
//! by routing arithmetic through a single combined mantissa
//! (`int * 2^scale + frac`) and splitting the result back.
//!
//! Multi-step algorithms widen to `bits + guard` working precision
//! (see [`Precision`]) and truncate the result back to the caller's
//! requested scale, so rounding dust accumulated along the way never
//! reaches the final value.

pub mod consts;
pub mod special;
pub mod transcendental;

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

use num_traits::{One, Zero};

use crate::bigint::BigInt;
use crate::error::{EngineError, Result};

/// Default fractional precision in bits.
pub const SCALE_BITS_DEFAULT: u32 = 64;

/// Smallest admissible precision guard.
pub const GUARD_BITS_MIN: u32 = 32;

/// Default precision guard.
pub const GUARD_BITS_DEFAULT: u32 = 64;

/// Largest admissible precision guard.
pub const GUARD_BITS_MAX: u32 = 128;

/// Per-call precision configuration for transcendental evaluation.
///
/// `bits` is the scale of the returned value; `guard` extra bits are
/// carried internally to absorb rounding drift and are truncated away
/// before returning. The guard is clamped to
/// [`GUARD_BITS_MIN`, `GUARD_BITS_MAX`]. There is no process-wide state:
/// two threads using different guards cannot interfere.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Precision {
    bits: u32,
    guard: u32,
}

impl Precision {
    /// Requested precision with the default guard.
    pub const fn new(bits: u32) -> Self {
        Self { bits: if bits == 0 { 1 } else { bits }, guard: GUARD_BITS_DEFAULT }
    }

    /// Requested precision with an explicit guard (clamped).
    pub const fn with_guard(bits: u32, guard: u32) -> Self {
        let guard = if guard < GUARD_BITS_MIN {
            GUARD_BITS_MIN
        } else if guard > GUARD_BITS_MAX {
            GUARD_BITS_MAX
        } else {
            guard
        };
        Self { bits: if bits == 0 { 1 } else { bits }, guard }
    }

    /// Scale of returned values.
    #[inline]
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Guard width.
    #[inline]
    pub fn guard(&self) -> u32 {
        self.guard
    }

    /// Internal working scale (`bits + guard`).
    #[inline]
    pub fn working(&self) -> u32 {
        self.bits + self.guard
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::new(SCALE_BITS_DEFAULT)
    }
}

/// Arbitrary-precision signed fixed-point number.
#[derive(Clone, Debug)]
pub struct BigFixed {
    /// Sign flag; canonical zero is non-negative.
    negative: bool,
    /// Integer-part magnitude.
    int_part: BigInt,
    /// Fractional numerator over 2^scale, always in [0, 2^scale).
    frac_part: BigInt,
    /// Fractional precision in bits.
    scale: u32,
}

impl BigFixed {
    /// Zero at the given scale.
    pub fn zero(scale: u32) -> Self {
        Self {
            negative: false,
            int_part: BigInt::zero(),
            frac_part: BigInt::zero(),
            scale,
        }
    }

    /// Construct from a big integer (exact).
    pub fn from_bigint(n: &BigInt, scale: u32) -> Self {
        Self {
            negative: n.is_negative(),
            int_part: n.abs(),
            frac_part: BigInt::zero(),
            scale,
        }
    }

    /// Construct from a native signed integer (exact).
    pub fn from_i64(val: i64, scale: u32) -> Self {
        Self::from_bigint(&BigInt::from_i64(val), scale)
    }

    /// Construct from an f64 (exact: the double's mantissa and exponent
    /// are taken apart bit by bit). Non-finite input is a domain error.
    pub fn from_f64(value: f64, scale: u32) -> Result<Self> {
        if !value.is_finite() {
            return Err(EngineError::OutOfDomain { function: "BigFixed::from_f64", value });
        }
        if value == 0.0 {
            return Ok(Self::zero(scale));
        }
        let negative = value < 0.0;
        let bits = value.abs().to_bits();
        let raw_exp = ((bits >> 52) & 0x7ff) as i64;
        let raw_mant = bits & ((1u64 << 52) - 1);
        // exponent of the integer mantissa; subnormals lack the hidden bit.
        let (mantissa, exp) = if raw_exp == 0 {
            (raw_mant, -1074i64)
        } else {
            (raw_mant | (1u64 << 52), raw_exp - 1075)
        };
        let m = BigInt::from_u64(mantissa);
        let shift = exp + scale as i64;
        let mantissa_scaled =
            if shift >= 0 { m.shl(shift as u64) } else { m.shr((-shift) as u64) };
        Ok(Self::from_mantissa(&mantissa_scaled, scale, negative))
    }

    /// Rebuild from a combined mantissa magnitude (`value * 2^scale`).
    pub(crate) fn from_mantissa(mantissa: &BigInt, scale: u32, negative: bool) -> Self {
        let mag = mantissa.abs();
        let int_part = mag.shr(scale as u64);
        let frac_part = &mag - &int_part.shl(scale as u64);
        let is_zero = int_part.is_zero() && frac_part.is_zero();
        Self {
            negative: (negative != mantissa.is_negative()) && !is_zero,
            int_part,
            frac_part,
            scale,
        }
    }

    /// Combined magnitude mantissa: `|value| * 2^scale`.
    pub(crate) fn mantissa(&self) -> BigInt {
        &self.int_part.shl(self.scale as u64) + &self.frac_part
    }

    /// Fractional precision in bits.
    #[inline]
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// True if the value is zero.
    pub fn is_zero(&self) -> bool {
        self.int_part.is_zero() && self.frac_part.is_zero()
    }

    /// True if strictly negative.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.negative && !self.is_zero()
    }

    /// Magnitude.
    pub fn abs(&self) -> Self {
        let mut out = self.clone();
        out.negative = false;
        out
    }

    /// Additive inverse.
    pub fn neg(&self) -> Self {
        let mut out = self.clone();
        out.negative = !self.negative && !self.is_zero();
        out
    }

    /// Same value re-expressed at `new_scale` bits of fractional precision
    /// (truncates toward zero when narrowing).
    pub fn rescale(&self, new_scale: u32) -> Self {
        if new_scale == self.scale {
            return self.clone();
        }
        let m = self.mantissa();
        let m = if new_scale > self.scale {
            m.shl((new_scale - self.scale) as u64)
        } else {
            m.shr((self.scale - new_scale) as u64)
        };
        Self::from_mantissa(&m, new_scale, self.negative)
    }

    /// Multiply by 2^bits (exact).
    pub fn shl(&self, bits: u32) -> Self {
        Self::from_mantissa(&self.mantissa().shl(bits as u64), self.scale, self.negative)
    }

    /// Divide by 2^bits (truncating below the scale).
    pub fn shr(&self, bits: u32) -> Self {
        Self::from_mantissa(&self.mantissa().shr(bits as u64), self.scale, self.negative)
    }

    /// Fallible division; `DivisionByZero` on a zero divisor.
    pub fn div(&self, rhs: &Self) -> Result<Self> {
        if rhs.is_zero() {
            return Err(EngineError::DivisionByZero);
        }
        let target = self.scale.max(rhs.scale);
        // value = ma * 2^(sb - sa) / mb; scaled by 2^target.
        let shift = (rhs.scale as u64 + target as u64) - self.scale as u64;
        let num = self.mantissa().shl(shift);
        let (q, _) = num.div_rem(&rhs.mantissa())?;
        Ok(Self::from_mantissa(&q, target, self.negative != rhs.negative))
    }

    /// Truncate toward zero to an integer.
    pub fn trunc(&self) -> BigInt {
        let mut out = self.int_part.clone();
        if self.negative && !out.is_zero() {
            out = out.neg();
        }
        out
    }

    /// Largest integer not above the value.
    pub fn floor(&self) -> BigInt {
        if self.negative && !self.frac_part.is_zero() {
            (&self.int_part + &BigInt::one()).neg()
        } else {
            self.trunc()
        }
    }

    /// Smallest integer not below the value.
    pub fn ceil(&self) -> BigInt {
        if !self.negative && !self.frac_part.is_zero() {
            &self.int_part + &BigInt::one()
        } else {
            self.trunc()
        }
    }

    /// Round to nearest, ties away from zero.
    pub fn round(&self) -> BigInt {
        if self.scale == 0 {
            return self.trunc();
        }
        let half = BigInt::one().shl(self.scale as u64 - 1);
        let mut mag = self.int_part.clone();
        if self.frac_part.cmp_magnitude(&half) != Ordering::Less {
            mag = &mag + &BigInt::one();
        }
        if self.negative && !mag.is_zero() {
            mag.neg()
        } else {
            mag
        }
    }

    /// Fractional component with the value's sign, integer part zeroed.
    pub fn fract(&self) -> Self {
        Self {
            negative: self.negative && !self.frac_part.is_zero(),
            int_part: BigInt::zero(),
            frac_part: self.frac_part.clone(),
            scale: self.scale,
        }
    }

    /// Lossy conversion to f64 (the top 64 fractional bits contribute).
    pub fn to_f64(&self) -> f64 {
        let int_f = self.int_part.to_f64();
        let s = self.scale.min(64);
        let top = self.frac_part.shr((self.scale - s) as u64);
        let frac_f = top.to_f64() * (2.0f64).powi(-(s as i32));
        let val = int_f + frac_f;
        if self.negative { -val } else { val }
    }

    /// Decimal rendering with the requested number of places
    /// (`frac * 10^places / 2^scale`, zero-padded).
    pub fn to_decimal(&self, places: usize) -> String {
        let mut out = String::new();
        if self.is_negative() {
            out.push('-');
        }
        out.push_str(&self.int_part.to_string());
        if places == 0 {
            return out;
        }
        out.push('.');
        let scaled = &self.frac_part * &BigInt::from_u64(10).pow(places as u64);
        let digits = scaled.shr(self.scale as u64).to_string();
        for _ in digits.len()..places {
            out.push('0');
        }
        out.push_str(&digits);
        out
    }
}

impl Add for &BigFixed {
    type Output = BigFixed;

    fn add(self, rhs: &BigFixed) -> BigFixed {
        let target = self.scale.max(rhs.scale);
        let a = self.rescale(target);
        let b = rhs.rescale(target);
        let ma = if a.negative { a.mantissa().neg() } else { a.mantissa() };
        let mb = if b.negative { b.mantissa().neg() } else { b.mantissa() };
        let m = &ma + &mb;
        BigFixed::from_mantissa(&m, target, false)
    }
}

impl Sub for &BigFixed {
    type Output = BigFixed;

    fn sub(self, rhs: &BigFixed) -> BigFixed {
        self + &rhs.neg()
    }
}

impl Mul for &BigFixed {
    type Output = BigFixed;

    fn mul(self, rhs: &BigFixed) -> BigFixed {
        let target = self.scale.max(rhs.scale);
        let m = &self.mantissa() * &rhs.mantissa();
        // Drop the doubled scale back down to the target.
        let m = m.shr((self.scale as u64 + rhs.scale as u64) - target as u64);
        BigFixed::from_mantissa(&m, target, self.negative != rhs.negative)
    }
}

impl Add for BigFixed {
    type Output = BigFixed;
    fn add(self, rhs: BigFixed) -> BigFixed {
        &self + &rhs
    }
}

impl Sub for BigFixed {
    type Output = BigFixed;
    fn sub(self, rhs: BigFixed) -> BigFixed {
        &self - &rhs
    }
}

impl Mul for BigFixed {
    type Output = BigFixed;
    fn mul(self, rhs: BigFixed) -> BigFixed {
        &self * &rhs
    }
}

impl Neg for BigFixed {
    type Output = BigFixed;
    fn neg(self) -> BigFixed {
        BigFixed::neg(&self)
    }
}

impl PartialEq for BigFixed {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BigFixed {}

impl PartialOrd for BigFixed {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigFixed {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_negative(), other.is_negative()) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (neg, _) => {
                let target = self.scale.max(other.scale);
                let ord = self
                    .rescale(target)
                    .mantissa()
                    .cmp_magnitude(&other.rescale(target).mantissa());
                if neg { ord.reverse() } else { ord }
            }
        }
    }
}

impl Zero for BigFixed {
    fn zero() -> Self {
        BigFixed::zero(SCALE_BITS_DEFAULT)
    }
    fn is_zero(&self) -> bool {
        BigFixed::is_zero(self)
    }
}

impl One for BigFixed {
    fn one() -> Self {
        BigFixed::from_i64(1, SCALE_BITS_DEFAULT)
    }
}

impl fmt::Display for BigFixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal(12))
    }
}
