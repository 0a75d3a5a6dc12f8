use ap_engine::lattice::{
    determinant, dot, gram_schmidt, hermite_factor, is_lll_reduced, lll_reduce, nearest_plane,
    norm_sq, orthogonality_defect, shortest_vector,
};
use ap_engine::{BigFixed, BigInt, LatticeBasis, Precision};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const DELTA: f64 = 0.75; // Lovász parameter

fn p() -> Precision {
    Precision::new(64)
}

fn basis(rows: &[Vec<f64>]) -> LatticeBasis {
    LatticeBasis::from_rows(rows, p()).unwrap()
}

fn fx(v: f64) -> BigFixed {
    BigFixed::from_f64(v, 64).unwrap()
}

/// A basis with large, nearly dependent vectors that needs real work.
fn generate_bad_basis(dim: usize, rng: &mut ChaCha8Rng) -> Vec<Vec<f64>> {
    let mut rows = Vec::with_capacity(dim);
    for i in 0..dim {
        let mut coords = vec![0.0; dim];
        for (j, c) in coords.iter_mut().enumerate() {
            *c = if i == j {
                rng.gen_range(100.0..1000.0_f64).round()
            } else {
                rng.gen_range(-10.0..10.0_f64).round()
            };
        }
        rows.push(coords);
    }
    rows
}

#[test]
fn lll_on_the_orthogonal_2d_basis() {
    // {(1,1),(1,-1)} is already orthogonal: defect 1.0 and at most one
    // swap (norm reordering).
    let mut b = basis(&[vec![1.0, 1.0], vec![1.0, -1.0]]);
    let swaps = lll_reduce(&mut b, DELTA).unwrap();
    assert!(swaps <= 1, "expected zero or one swap, got {}", swaps);
    let defect = orthogonality_defect(&b).unwrap();
    assert!((defect - 1.0).abs() < 1e-9, "defect {} must be 1.0", defect);
}

#[test]
fn lovasz_condition_holds_after_reduction() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    for dim in [2usize, 3, 4, 6] {
        let mut b = basis(&generate_bad_basis(dim, &mut rng));
        lll_reduce(&mut b, DELTA).unwrap();
        assert!(
            is_lll_reduced(&b, DELTA).unwrap(),
            "Lovász must hold for every adjacent pair at dim {}",
            dim
        );
    }
}

#[test]
fn lll_shortens_the_first_vector() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for dim in [3usize, 5] {
        let rows = generate_bad_basis(dim, &mut rng);
        let original_first = norm_sq(
            &rows[0].iter().map(|&c| fx(c)).collect::<Vec<_>>(),
        )
        .unwrap()
        .to_f64();
        let mut b = basis(&rows);
        lll_reduce(&mut b, DELTA).unwrap();
        let reduced_first = norm_sq(b.vector(0)).unwrap().to_f64();
        assert!(
            reduced_first <= original_first + 1e-9,
            "reduction must not lengthen b_0 (dim {})",
            dim
        );
    }
}

#[test]
fn babai_recovers_exact_integer_combinations() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let rows = vec![
        vec![3.0, 1.0, 0.0],
        vec![1.0, 4.0, 1.0],
        vec![0.0, 1.0, 5.0],
    ];
    let b = basis(&rows);
    for _ in 0..10 {
        let coeffs: Vec<i64> = (0..3).map(|_| rng.gen_range(-20..20)).collect();
        let mut target = vec![0.0f64; 3];
        for (i, &c) in coeffs.iter().enumerate() {
            for (t, &r) in target.iter_mut().zip(rows[i].iter()) {
                *t += c as f64 * r;
            }
        }
        let target_fx: Vec<BigFixed> = target.iter().map(|&t| fx(t)).collect();
        let sol = nearest_plane(&b, &target_fx).unwrap();
        for (got, want) in sol.coefficients.iter().zip(coeffs.iter()) {
            assert_eq!(got, &BigInt::from_i64(*want), "coefficients must match");
        }
        assert!(
            sol.distance.to_f64() < 1e-9,
            "lattice point must be recovered with zero residual"
        );
    }
}

#[test]
fn babai_snaps_perturbed_targets() {
    // Perturbing an exact combination by less than half the shortest
    // orthogonal direction still snaps back to it.
    let b = basis(&[vec![10.0, 0.0], vec![0.0, 10.0]]);
    let sol = nearest_plane(&b, &[fx(19.7), fx(-30.2)]).unwrap();
    assert_eq!(sol.coefficients[0], BigInt::from_i64(2));
    assert_eq!(sol.coefficients[1], BigInt::from_i64(-3));
}

#[test]
fn shortest_vector_on_a_known_lattice() {
    // The lattice of {(12, 2), (13, 4)} contains (1, 2).
    let mut b = basis(&[vec![12.0, 2.0], vec![13.0, 4.0]]);
    let v = shortest_vector(&mut b, DELTA).unwrap();
    let len_sq = norm_sq(&v).unwrap().to_f64();
    assert!((len_sq - 5.0).abs() < 1e-9, "shortest vector must be (+-1, +-2)");
}

#[test]
fn gram_schmidt_orthogonality_and_mu_bound() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut b = basis(&generate_bad_basis(4, &mut rng));
    lll_reduce(&mut b, DELTA).unwrap();
    let gso = gram_schmidt(&b).unwrap();
    for i in 0..4 {
        for j in 0..i {
            let ip = dot(&gso.vectors[i], &gso.vectors[j]).unwrap().to_f64();
            assert!(ip.abs() < 1e-8, "<b*_{}, b*_{}> = {}", i, j, ip);
            assert!(
                gso.mu[i][j].to_f64().abs() <= 0.5 + 1e-9,
                "size reduction bound violated at ({}, {})",
                i,
                j
            );
        }
    }
}

#[test]
fn determinant_is_invariant_under_reduction() {
    let rows = vec![
        vec![5.0, 1.0, 0.0],
        vec![2.0, 6.0, 1.0],
        vec![0.0, 2.0, 7.0],
    ];
    let mut b = basis(&rows);
    let det_before = determinant(&b).unwrap().to_f64();
    lll_reduce(&mut b, DELTA).unwrap();
    let det_after = determinant(&b).unwrap().to_f64();
    assert!(
        (det_before.abs() - det_after.abs()).abs() < 1e-6,
        "lattice volume must survive reduction: {} vs {}",
        det_before,
        det_after
    );
}

#[test]
fn hermite_factor_improves_with_reduction() {
    let mut rng = ChaCha8Rng::seed_from_u64(31);
    let rows = generate_bad_basis(4, &mut rng);
    let raw = basis(&rows);
    let before = hermite_factor(&raw).unwrap();
    let mut reduced = basis(&rows);
    lll_reduce(&mut reduced, DELTA).unwrap();
    let after = hermite_factor(&reduced).unwrap();
    assert!(
        after <= before + 1e-9,
        "reduction must not worsen the Hermite factor ({} -> {})",
        before,
        after
    );
}

#[test]
fn status_flags_track_mutation() {
    let mut b = basis(&[vec![4.0, 1.0], vec![1.0, 3.0]]);
    assert!(!b.is_reduced());
    lll_reduce(&mut b, DELTA).unwrap();
    assert!(b.is_reduced());
    b.set_vector(0, vec![fx(9.0), fx(2.0)]).unwrap();
    assert!(!b.is_reduced(), "mutation must clear the reduced flag");
}
