//! Iterative radix-2 Cooley-Tukey FFT over complex doubles, and the
//! FFT-based large-integer multiplication built on top of it.
//!
//! The transform length must be an exact power of two; anything else is a
//! shape error, not a silent fallback. Forward and inverse share one
//! butterfly network — the inverse conjugates the twiddle angle and scales
//! by 1/N at the end.

use core::f64::consts::PI;
use core::ops::{Add, Mul, Sub};

use super::{bit_reverse_permute, carry_digits16, is_power_of_two, next_power_of_two,
            split_digits16};
use crate::bigint::BigInt;
use crate::error::{EngineError, Result};

/// A complex number over f64 components.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Complex {
    /// Real component.
    pub re: f64,
    /// Imaginary component.
    pub im: f64,
}

impl Complex {
    /// Construct from components.
    #[inline]
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Unit magnitude at the given angle: e^(i * angle).
    #[inline]
    pub fn from_polar(angle: f64) -> Self {
        Self { re: angle.cos(), im: angle.sin() }
    }

    /// Scale both components.
    #[inline]
    pub fn scale(&self, s: f64) -> Self {
        Self { re: self.re * s, im: self.im * s }
    }
}

impl Add for Complex {
    type Output = Complex;
    #[inline]
    fn add(self, rhs: Complex) -> Complex {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Complex;
    #[inline]
    fn sub(self, rhs: Complex) -> Complex {
        Complex::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex {
    type Output = Complex;
    #[inline]
    fn mul(self, rhs: Complex) -> Complex {
        Complex::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

/// Transform direction; the inverse additionally scales by 1/N.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Time to frequency domain (negative twiddle angle).
    Forward,
    /// Frequency to time domain (positive twiddle angle, scaled by 1/N).
    Inverse,
}

/// In-place FFT. The length must be a power of two.
pub fn fft(data: &mut [Complex], direction: Direction) -> Result<()> {
    if data.is_empty() {
        return Err(EngineError::EmptyInput("fft input"));
    }
    if !is_power_of_two(data.len()) {
        return Err(EngineError::NonPowerOfTwoLength(data.len()));
    }
    fft_unchecked(data, direction);
    Ok(())
}

/// Butterfly core; callers guarantee a power-of-two length.
fn fft_unchecked(data: &mut [Complex], direction: Direction) {
    let n = data.len();
    if n == 1 {
        return;
    }
    bit_reverse_permute(data);

    let sign = match direction {
        Direction::Forward => -1.0,
        Direction::Inverse => 1.0,
    };

    let mut len = 2;
    while len <= n {
        let half = len / 2;
        let wlen = Complex::from_polar(sign * 2.0 * PI / len as f64);
        for start in (0..n).step_by(len) {
            let mut w = Complex::new(1.0, 0.0);
            for j in start..start + half {
                let u = data[j];
                let v = data[j + half] * w;
                data[j] = u + v;
                data[j + half] = u - v;
                w = w * wlen;
            }
        }
        len *= 2;
    }

    if direction == Direction::Inverse {
        let scale = 1.0 / n as f64;
        for value in data.iter_mut() {
            *value = value.scale(scale);
        }
    }
}

/// Multiply two limb magnitudes by FFT convolution.
///
/// Limbs are split into 16-bit digits first: the largest convolution
/// coefficient is then below N * 2^32, which a double carries exactly for
/// every supported length, so the rounded inverse transform reproduces the
/// schoolbook product bit for bit.
pub(crate) fn fft_mul_magnitudes(a: &[u32], b: &[u32]) -> Vec<u32> {
    let da = split_digits16(a);
    let db = split_digits16(b);
    if da.is_empty() || db.is_empty() {
        return Vec::new();
    }
    let n = next_power_of_two(da.len() + db.len());

    let mut fa = vec![Complex::default(); n];
    let mut fb = vec![Complex::default(); n];
    for (slot, &d) in fa.iter_mut().zip(da.iter()) {
        slot.re = d as f64;
    }
    for (slot, &d) in fb.iter_mut().zip(db.iter()) {
        slot.re = d as f64;
    }

    fft_unchecked(&mut fa, Direction::Forward);
    fft_unchecked(&mut fb, Direction::Forward);
    for (x, y) in fa.iter_mut().zip(fb.iter()) {
        *x = *x * *y;
    }
    fft_unchecked(&mut fa, Direction::Inverse);

    let coefficients: Vec<u64> = fa[..da.len() + db.len() - 1]
        .iter()
        .map(|c| c.re.round().max(0.0) as u64)
        .collect();
    carry_digits16(&coefficients)
}

/// Multiply two big integers through the FFT path regardless of size.
///
/// `BigInt` multiplication switches to this automatically above its size
/// threshold; the standalone entry point exists so the transform can be
/// exercised (and verified against schoolbook) directly.
pub fn fft_multiply(a: &BigInt, b: &BigInt) -> BigInt {
    if a.is_zero() || b.is_zero() {
        return BigInt::zero();
    }
    let negative = a.is_negative() != b.is_negative();
    BigInt::from_limbs(fft_mul_magnitudes(a.limbs(), b.limbs()), negative)
}

/// Linear convolution of two real signals via the FFT,
/// `result[k] = sum a[i] * b[k - i]`, length `a.len() + b.len() - 1`.
pub fn fft_convolve(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    if a.is_empty() || b.is_empty() {
        return Err(EngineError::EmptyInput("convolution input"));
    }
    let out_len = a.len() + b.len() - 1;
    let n = next_power_of_two(out_len);

    let mut fa = vec![Complex::default(); n];
    let mut fb = vec![Complex::default(); n];
    for (slot, &v) in fa.iter_mut().zip(a.iter()) {
        slot.re = v;
    }
    for (slot, &v) in fb.iter_mut().zip(b.iter()) {
        slot.re = v;
    }

    fft_unchecked(&mut fa, Direction::Forward);
    fft_unchecked(&mut fb, Direction::Forward);
    for (x, y) in fa.iter_mut().zip(fb.iter()) {
        *x = *x * *y;
    }
    fft_unchecked(&mut fa, Direction::Inverse);

    Ok(fa[..out_len].iter().map(|c| c.re).collect())
}
