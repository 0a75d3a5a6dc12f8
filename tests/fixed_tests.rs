use ap_engine::fixed::consts::{e, ln2, phi, pi, sqrt};
use ap_engine::fixed::transcendental::{atan, atan2, cos, exp, ln, log2, pow, sin, tan};
use ap_engine::{BigFixed, BigInt, EngineError, Precision};
use proptest::prelude::*;

const P: Precision = Precision::with_guard(96, 64);

fn fx(v: f64) -> BigFixed {
    BigFixed::from_f64(v, 96).unwrap()
}

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() < tol
}

proptest! {
    #[test]
    fn f64_round_trip(v in -1e12f64..1e12) {
        let x = BigFixed::from_f64(v, 96).unwrap();
        prop_assert_eq!(x.to_f64(), v, "from_f64/to_f64 must be exact for doubles");
    }

    #[test]
    fn add_sub_identity(a in -1e9f64..1e9, b in -1e9f64..1e9) {
        let a = BigFixed::from_f64(a, 64).unwrap();
        let b = BigFixed::from_f64(b, 64).unwrap();
        let back = &(&a + &b) - &b;
        prop_assert_eq!(back, a);
    }

    #[test]
    fn scale_round_trip(v in -1e9f64..1e9) {
        // to_integer(f * 2^p) back to fixed point reproduces f within one
        // unit in the last place.
        let f = BigFixed::from_f64(v, 64).unwrap();
        let as_int = f.shl(64).trunc();
        let back = BigFixed::from_bigint(&as_int, 64).shr(64);
        let diff = (&back - &f).abs();
        let ulp = BigFixed::from_f64(1.0, 64).unwrap().shr(63);
        prop_assert!(diff <= ulp, "round trip drifted by more than one ulp");
    }
}

#[test]
fn rounding_family_against_reference() {
    for v in [2.5f64, -2.5, 0.4, -0.4, 7.0, -7.0, 0.5, -0.5] {
        let x = fx(v);
        assert_eq!(x.floor().to_f64(), v.floor(), "floor({})", v);
        assert_eq!(x.ceil().to_f64(), v.ceil(), "ceil({})", v);
        assert_eq!(x.trunc().to_f64(), v.trunc(), "trunc({})", v);
        // round: ties away from zero, same as f64::round
        assert_eq!(x.round().to_f64(), v.round(), "round({})", v);
    }
}

#[test]
fn constants_match_references() {
    assert!(close(pi(P).unwrap().to_f64(), std::f64::consts::PI, 1e-15));
    assert!(close(e(P).unwrap().to_f64(), std::f64::consts::E, 1e-15));
    assert!(close(ln2(P).unwrap().to_f64(), std::f64::consts::LN_2, 1e-15));
    // phi is the positive root of x^2 = x + 1.
    assert!(close(phi(P).unwrap().to_f64(), 1.618033988749895, 1e-15));
}

#[test]
fn sqrt_squares_back() {
    for n in [2u64, 3, 5, 10, 12345, 1 << 40] {
        let r = sqrt(&BigInt::from_u64(n), P).unwrap();
        let sq = &r * &r;
        assert!(
            close(sq.to_f64(), n as f64, 1e-9),
            "sqrt({})^2 = {}",
            n,
            sq.to_f64()
        );
    }
}

#[test]
fn ln_exp_inverse_pair() {
    for n in [2u64, 10, 100, 65537] {
        let l = ln(&BigInt::from_u64(n), P).unwrap();
        let back = exp(&l, P).unwrap();
        assert!(
            close(back.to_f64(), n as f64, 1e-8),
            "exp(ln({})) = {}",
            n,
            back.to_f64()
        );
    }
}

#[test]
fn ln_respects_multiplicativity() {
    // ln(6) = ln(2) + ln(3).
    let l6 = ln(&BigInt::from_u64(6), P).unwrap();
    let l2 = ln(&BigInt::from_u64(2), P).unwrap();
    let l3 = ln(&BigInt::from_u64(3), P).unwrap();
    let sum = &l2 + &l3;
    assert!(close(l6.to_f64(), sum.to_f64(), 1e-14));
}

#[test]
fn log2_of_powers() {
    let l = log2(&BigInt::from_u64(1 << 20), P).unwrap();
    assert!(close(l.to_f64(), 20.0, 1e-12));
}

#[test]
fn domain_errors_are_errors_not_zeros() {
    assert_eq!(ln(&BigInt::zero(), P), Err(EngineError::NonPositiveLog));
    assert_eq!(ln(&BigInt::from_i64(-5), P), Err(EngineError::NonPositiveLog));
    assert!(sqrt(&BigInt::from_i64(-1), P).is_err());
    assert!(fx(1.0).div(&BigFixed::zero(96)).is_err());
}

#[test]
fn guard_width_does_not_change_the_answer() {
    // Different guards must agree to the requested precision; the guard
    // only absorbs internal dust.
    let narrow = Precision::with_guard(96, 32);
    let wide = Precision::with_guard(96, 128);
    let a = ln(&BigInt::from_u64(777), narrow).unwrap();
    let b = ln(&BigInt::from_u64(777), wide).unwrap();
    let diff = (&a - &b).abs();
    assert!(diff < BigFixed::from_f64(1e-25, 96).unwrap());
}

#[test]
fn trig_identities() {
    let theta = fx(0.6);
    let s = sin(&theta, P).unwrap();
    let c = cos(&theta, P).unwrap();
    let t = tan(&theta, P).unwrap();
    assert!(close((&(&s * &s) + &(&c * &c)).to_f64(), 1.0, 1e-10));
    let ratio = s.div(&c).unwrap();
    assert!(close(t.to_f64(), ratio.to_f64(), 1e-12));
}

#[test]
fn atan_and_atan2_reference_values() {
    let a1 = atan(&fx(1.0), P).unwrap();
    assert!(close(a1.to_f64(), std::f64::consts::FRAC_PI_4, 1e-12));
    let a2 = atan2(&fx(1.0), &fx(-1.0), P).unwrap();
    assert!(close(a2.to_f64(), 3.0 * std::f64::consts::FRAC_PI_4, 1e-12));
    // The origin returns zero by convention.
    assert!(atan2(&BigFixed::zero(96), &BigFixed::zero(96), P).unwrap().is_zero());
}

#[test]
fn pow_agrees_with_integer_powers() {
    let r = pow(&BigInt::from_u64(3), &fx(4.0), P).unwrap();
    assert!(close(r.to_f64(), 81.0, 1e-7));
}
