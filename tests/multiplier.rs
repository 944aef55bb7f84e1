use qmatmul::{derive_multiplier, FixedPointMultiplier, QMatmulError};

const TWO_POW_30: i32 = 1 << 30;

fn assert_close(s: f64) {
    let m = derive_multiplier(s).unwrap();
    assert!(
        m.mantissa() >= TWO_POW_30,
        "{}: mantissa {} below 2^30",
        s,
        m.mantissa()
    );
    let rel = (m.to_f64() - s).abs() / s;
    assert!(rel < 2f64.powi(-29), "{}: relative error {} too large", s, rel);
}

#[test]
fn test_mantissa_range_and_precision() {
    let scales = [
        1.0,
        0.5,
        0.125,
        0.1,
        0.3333333333333333,
        0.0003,
        1e-9,
        7.5,
        123456.789,
        2f64.powi(-40),
        0.999_999_999_9,
    ];
    for s in scales {
        assert_close(s);
    }
}

#[test]
fn test_sweep_precision() {
    let mut s = 1e-6;
    while s < 1e6 {
        assert_close(s);
        s *= 1.37;
    }
}

#[test]
fn test_exact_powers_of_two() {
    let m = derive_multiplier(0.125).unwrap();
    assert_eq!((m.mantissa(), m.exponent()), (TWO_POW_30, -2));

    let m = derive_multiplier(1.0).unwrap();
    assert_eq!((m.mantissa(), m.exponent()), (TWO_POW_30, 1));

    let m = derive_multiplier(0.75).unwrap();
    assert_eq!((m.mantissa(), m.exponent()), (3 << 29, 0));
}

#[test]
fn test_renormalizes_when_mantissa_rounds_up() {
    // q just below 1.0 rounds to 2^31, which must become 2^30 with exponent + 1
    let s = 1.0 - 2f64.powi(-40);
    let m = derive_multiplier(s).unwrap();
    assert_eq!((m.mantissa(), m.exponent()), (TWO_POW_30, 1));
}

#[test]
fn test_subnormal_ratio() {
    let s = f64::from_bits(1);
    let m = derive_multiplier(s).unwrap();
    assert_eq!((m.mantissa(), m.exponent()), (TWO_POW_30, -1073));
}

#[test]
fn test_non_positive_is_domain_error() {
    for s in [0.0, -0.0, -1.0, -1e-30, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        assert!(
            matches!(derive_multiplier(s), Err(QMatmulError::DomainError(_))),
            "{} should be rejected",
            s
        );
    }
}

#[test]
fn test_apply_matches_real_multiplication() {
    for s in [0.001, 0.0371, 0.5, 0.9, 1.7, 33.0] {
        let m = FixedPointMultiplier::derive(s).unwrap();
        for acc in [-100_000, -4097, -3, -1, 0, 1, 2, 77, 1000, 65_535] {
            let expected = (acc as f64 * s).round();
            let got = m.apply(acc) as f64;
            assert!(
                (expected - got).abs() <= 1.0,
                "s={} acc={}: expected {}, got {}",
                s,
                acc,
                expected,
                got
            );
        }
    }
}

#[test]
fn test_apply_ties_round_away_from_zero() {
    let m = derive_multiplier(0.5).unwrap();
    assert_eq!(m.apply(1), 1);
    assert_eq!(m.apply(-1), -1);
    assert_eq!(m.apply(3), 2);
    assert_eq!(m.apply(-3), -2);
    assert_eq!(m.apply(4), 2);
}

#[test]
fn test_apply_saturates() {
    let m = derive_multiplier(1e12).unwrap();
    assert_eq!(m.apply(5), i32::MAX);
    assert_eq!(m.apply(-5), i32::MIN);
    assert_eq!(m.apply(0), 0);
}
