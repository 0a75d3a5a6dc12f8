//! Arbitrary-precision signed integers.
//!
//! `BigInt` stores a sign flag plus little-endian base-2^32 limbs. The
//! most-significant stored limb is always non-zero; zero is canonically an
//! empty limb vector with a non-negative sign. Every operation works on
//! sign and magnitude only — there is no cached numeric value to go stale.
//!
//! Multiplication picks its algorithm by operand size: schoolbook for small
//! inputs, Karatsuba in the mid range, and FFT convolution once both
//! operands reach 128 limbs (see `transform::fft`).

mod arith;
mod modular;
mod primality;

pub use primality::{crt, pollard_rho};

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use num_traits::{One, Zero};

use crate::error::{EngineError, Result};

/// Arbitrary-precision signed integer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BigInt {
    /// Sign flag; canonical zero is never negative.
    pub(crate) negative: bool,
    /// Little-endian base-2^32 magnitude, no leading zero limbs.
    pub(crate) limbs: Vec<u32>,
}

impl BigInt {
    /// The number of value bits per limb.
    pub const LIMB_BITS: u32 = 32;

    /// Canonical zero.
    #[inline]
    pub fn zero() -> Self {
        Self { negative: false, limbs: Vec::new() }
    }

    /// Canonical one.
    #[inline]
    pub fn one() -> Self {
        Self::from_u64(1)
    }

    /// Construct from an unsigned native integer.
    pub fn from_u64(val: u64) -> Self {
        let mut limbs = Vec::with_capacity(2);
        if val != 0 {
            limbs.push(val as u32);
            if val > u32::MAX as u64 {
                limbs.push((val >> 32) as u32);
            }
        }
        Self { negative: false, limbs }
    }

    /// Construct from a signed native integer.
    pub fn from_i64(val: i64) -> Self {
        let mut n = Self::from_u64(val.unsigned_abs());
        n.negative = val < 0 && !n.limbs.is_empty();
        n
    }

    /// Construct a magnitude directly from limbs (little-endian); trims
    /// leading zeros and canonicalizes zero.
    pub(crate) fn from_limbs(mut limbs: Vec<u32>, negative: bool) -> Self {
        while limbs.last() == Some(&0) {
            limbs.pop();
        }
        let negative = negative && !limbs.is_empty();
        Self { negative, limbs }
    }

    /// True if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.limbs.is_empty()
    }

    /// True if the value is strictly negative.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// True if the low bit is clear (zero counts as even).
    #[inline]
    pub fn is_even(&self) -> bool {
        self.limbs.first().map_or(true, |l| l & 1 == 0)
    }

    /// Magnitude of this value.
    pub fn abs(&self) -> Self {
        Self { negative: false, limbs: self.limbs.clone() }
    }

    /// Additive inverse.
    pub fn neg(&self) -> Self {
        Self::from_limbs(self.limbs.clone(), !self.negative)
    }

    /// Bit at position `i` of the magnitude (LSB = 0).
    #[inline]
    pub fn bit(&self, i: u64) -> bool {
        let limb = (i / Self::LIMB_BITS as u64) as usize;
        let bit = (i % Self::LIMB_BITS as u64) as u32;
        self.limbs.get(limb).map_or(false, |l| (l >> bit) & 1 == 1)
    }

    /// Position of the highest set bit plus one; zero for zero.
    pub fn bit_length(&self) -> u64 {
        match self.limbs.last() {
            None => 0,
            Some(&top) => {
                (self.limbs.len() as u64 - 1) * Self::LIMB_BITS as u64
                    + (Self::LIMB_BITS - top.leading_zeros()) as u64
            }
        }
    }

    /// Number of trailing zero bits of the magnitude; zero input yields 0.
    pub fn trailing_zeros(&self) -> u64 {
        for (i, &limb) in self.limbs.iter().enumerate() {
            if limb != 0 {
                return i as u64 * Self::LIMB_BITS as u64 + limb.trailing_zeros() as u64;
            }
        }
        0
    }

    /// True if the magnitude is an exact power of two.
    pub fn is_power_of_two(&self) -> bool {
        !self.is_zero() && self.bit_length() == self.trailing_zeros() + 1
    }

    /// Little-endian base-2^32 limbs of the magnitude.
    pub(crate) fn limbs(&self) -> &[u32] {
        &self.limbs
    }

    /// Compare magnitudes, ignoring sign.
    pub fn cmp_magnitude(&self, other: &Self) -> Ordering {
        arith::mag_cmp(&self.limbs, &other.limbs)
    }

    /// Lossy conversion to f64 (magnitudes beyond 2^53 round).
    pub fn to_f64(&self) -> f64 {
        let mut val = 0.0f64;
        for &limb in self.limbs.iter().rev() {
            val = val * 4294967296.0 + limb as f64;
        }
        if self.negative { -val } else { val }
    }

    /// Low 64 bits of the magnitude.
    pub(crate) fn low_u64(&self) -> u64 {
        let lo = self.limbs.first().copied().unwrap_or(0) as u64;
        let hi = self.limbs.get(1).copied().unwrap_or(0) as u64;
        (hi << 32) | lo
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => self.cmp_magnitude(other),
            (true, true) => other.cmp_magnitude(self),
        }
    }
}

impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Default for BigInt {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<u64> for BigInt {
    fn from(val: u64) -> Self {
        Self::from_u64(val)
    }
}

impl From<i64> for BigInt {
    fn from(val: i64) -> Self {
        Self::from_i64(val)
    }
}

impl Zero for BigInt {
    fn zero() -> Self {
        BigInt::zero()
    }
    fn is_zero(&self) -> bool {
        BigInt::is_zero(self)
    }
}

impl One for BigInt {
    fn one() -> Self {
        BigInt::one()
    }
}

/// Decimal digits are emitted in base-10^9 chunks off the binary magnitude.
impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        const CHUNK: u32 = 1_000_000_000;
        let mut mag = self.limbs.clone();
        let mut chunks = Vec::new();
        while !mag.is_empty() {
            let rem = arith::mag_div_rem_small(&mut mag, CHUNK);
            chunks.push(rem);
        }
        let mut s = String::new();
        if self.negative {
            s.push('-');
        }
        // Highest chunk unpadded, the rest zero-padded to 9 digits.
        for (i, chunk) in chunks.iter().rev().enumerate() {
            if i == 0 {
                s.push_str(&chunk.to_string());
            } else {
                s.push_str(&format!("{:09}", chunk));
            }
        }
        f.write_str(&s)
    }
}

impl FromStr for BigInt {
    type Err = EngineError;

    /// Parse a decimal string with an optional leading `-`.
    fn from_str(s: &str) -> Result<Self> {
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        if digits.is_empty() {
            return Err(EngineError::EmptyInput("integer string"));
        }
        let mut mag: Vec<u32> = Vec::new();
        for (i, ch) in digits.char_indices() {
            let d = ch.to_digit(10).ok_or(EngineError::InvalidDigit {
                found: ch,
                position: if negative { i + 1 } else { i },
            })?;
            arith::mag_mul_add_small(&mut mag, 10, d);
        }
        Ok(Self::from_limbs(mag, negative))
    }
}
