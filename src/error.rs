//! Error type shared by every engine.
//!
//! The taxonomy is deliberate: *domain* errors (mathematically undefined
//! input), *shape* errors (wrong sizes), and *convergence* failures
//! (iteration budgets exhausted). A legitimate zero result is never used to
//! signal failure — every fallible entry point returns `Result`.

use thiserror::Error;

/// Errors produced by the integer, fixed-point, transform, and lattice
/// engines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Division or modulus with a zero divisor.
    #[error("division by zero")]
    DivisionByZero,

    /// Modular inverse requested for an operand that shares a factor with
    /// the modulus.
    #[error("no modular inverse: gcd(operand, modulus) = {gcd} != 1")]
    NotInvertible {
        /// The offending gcd (decimal).
        gcd: String,
    },

    /// CRT moduli are not pairwise coprime.
    #[error("crt moduli are not pairwise coprime")]
    ModuliNotCoprime,

    /// Logarithm of zero or a negative value.
    #[error("logarithm of non-positive value")]
    NonPositiveLog,

    /// Argument outside the domain of a transcendental or special function.
    #[error("argument {value} is outside the domain of {function}")]
    OutOfDomain {
        /// Function that rejected the argument.
        function: &'static str,
        /// The rejected argument (lossy f64 rendering).
        value: f64,
    },

    /// A character in a numeric string that is not a decimal digit.
    #[error("invalid digit {found:?} at position {position}")]
    InvalidDigit {
        /// The offending character.
        found: char,
        /// Byte position within the input.
        position: usize,
    },

    /// Empty input where at least one element is required.
    #[error("{0} must not be empty")]
    EmptyInput(&'static str),

    /// Transform length that is not a power of two.
    #[error("transform length {0} is not a power of two")]
    NonPowerOfTwoLength(usize),

    /// Vector or basis dimensions do not agree.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected length.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// Lovász parameter outside (1/4, 1).
    #[error("delta {0} is outside (0.25, 1.0)")]
    InvalidDelta(f64),

    /// Basis vectors are linearly dependent (zero Gram-Schmidt vector or
    /// zero pivot during elimination).
    #[error("basis is singular: vectors are linearly dependent")]
    SingularBasis,

    /// An iterative algorithm exhausted its budget without converging.
    #[error("{algorithm} did not converge within {iterations} iterations")]
    Convergence {
        /// Name of the iteration that failed.
        algorithm: &'static str,
        /// Budget that was exhausted.
        iterations: usize,
    },

    /// No suitable NTT prime of the form k*2^m + 1 was found.
    #[error("no ntt prime of the form k*2^{0} + 1 found in search range")]
    NoNttPrime(u32),
}

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, EngineError>;
