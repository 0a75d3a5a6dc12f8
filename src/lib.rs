//! # ap_engine Quickstart
//!
//! ```rust
//! use ap_engine::prelude::*;
//!
//! // Reduce a skewed 2-D lattice basis
//! let mut basis = LatticeBasis::from_rows(
//!     &[vec![12.0, 2.0], vec![13.0, 4.0]],
//!     Precision::new(64),
//! ).unwrap();
//! lll_reduce(&mut basis, 0.75).unwrap();
//! assert!(basis.is_reduced());
//!
//! // The reduced basis starts with a short vector: (1, 2) here
//! let first = basis.vector(0);
//! let len_sq = first[0].to_f64().powi(2) + first[1].to_f64().powi(2);
//! assert!(len_sq <= 5.0 + 1e-9);
//! ```
//!
#![doc = include_str!("../README.md")]

// Core engines
pub mod bigint; // Arbitrary-precision integers and number theory
pub mod error;
pub mod fixed; // Fixed-point arithmetic and transcendental functions
pub mod lattice; // Gram-Schmidt, LLL, CVP/SVP, quality metrics
pub mod transform; // Complex FFT and modular NTT

// --- Public API exports ---

pub use bigint::{crt, pollard_rho, BigInt};
pub use error::{EngineError, Result};
pub use fixed::{BigFixed, Precision};
pub use lattice::{
    gram_schmidt, lll_reduce, nearest_plane, shortest_vector, CvpSolution, LatticeBasis,
    Orthogonalization,
};
pub use transform::fft::{fft_multiply, Complex};
pub use transform::ntt::{ntt_multiply, NttContext};

pub mod prelude {
    //! The "everything" import for ap_engine.
    //!
    //! Brings the most commonly used types and functions in with one glob:
    //! ```rust
    //! use ap_engine::prelude::*;
    //! ```

    // core data types
    pub use crate::bigint::BigInt;
    pub use crate::error::{EngineError, Result};
    pub use crate::fixed::{BigFixed, Precision};
    pub use crate::lattice::LatticeBasis;

    // number theory
    pub use crate::bigint::{crt, pollard_rho};

    // transforms
    pub use crate::transform::fft::{fft_multiply, Complex};
    pub use crate::transform::ntt::{ntt_multiply, NttContext};

    // lattice algorithms
    pub use crate::lattice::{
        gram_schmidt, lll_reduce, nearest_plane, shortest_vector, CvpSolution,
    };

    // transcendental layer
    pub use crate::fixed::consts::{e, ln2, phi, pi, sqrt};
    pub use crate::fixed::transcendental::{atan, atan2, cos, exp, ln, log2, pow, sin};
}
