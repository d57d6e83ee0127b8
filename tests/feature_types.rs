use genespace::{FloatType, Gene, IntegerType};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_sample_size_equals_type_size() {
    let mut rng = StdRng::seed_from_u64(1);
    let float_type = FloatType::new(-1.0, 1.0).unwrap();
    let int_type = IntegerType::new(1, 5000).unwrap();

    assert_eq!(float_type.sample_random(&mut rng).len(), 1);
    assert_eq!(int_type.sample_random(&mut rng).len(), 1);
}

#[test]
fn test_sample_float_type_in_range() {
    let mut rng = StdRng::seed_from_u64(2);
    let ranges = [
        (-1.0, 1.0),
        (0.0, 2.0),
        (1.0, 10.0),
        (-10.0, -1.0),
        (-5.0, 2.5),
        (-3.4, 12.1),
    ];

    for (lower, upper) in ranges {
        let float_type = FloatType::new(lower, upper).unwrap();
        for _ in 0..50 {
            let code = float_type.sample_random(&mut rng);
            let value = code[0].as_f64();
            assert!(lower <= value && value <= upper);
            assert!(float_type.fits(&code));
        }
    }
}

#[test]
fn test_sample_integer_type_in_range() {
    let mut rng = StdRng::seed_from_u64(3);
    let ranges = [(-1, 1), (0, 2), (1, 10), (-10, -1)];

    for (lower, upper) in ranges {
        let int_type = IntegerType::new(lower, upper).unwrap();
        for _ in 0..50 {
            let code = int_type.sample_random(&mut rng);
            let value = code[0].as_int().unwrap();
            assert!(lower <= value && value <= upper);
            assert!(int_type.fits(&code));
        }
    }
}

#[test]
fn test_mutate_integer_type_stays_bounded() {
    let mut rng = StdRng::seed_from_u64(4);
    let limits = [(-1, 1), (0, 2), (1, 10), (-10, -1)];

    for (lower, upper) in limits {
        let range_diff = (upper - lower) as f64;
        let int_type = IntegerType::new(lower, upper).unwrap();
        let original = int_type.sample_random(&mut rng);

        for _ in 0..100 {
            let mut mutated = original.clone();
            int_type.mutate_random(&mut mutated, &mut rng).unwrap();
            let value = mutated[0].as_int().unwrap();
            assert!(lower <= value && value <= upper);
            let difference = (value - original[0].as_int().unwrap()).abs() as f64;
            assert!(
                difference <= 0.35 * range_diff,
                "mutation moved {} on a range of {}",
                difference,
                range_diff
            );
        }
    }
}

#[test]
fn test_mutate_float_type_stays_bounded() {
    let mut rng = StdRng::seed_from_u64(5);
    let limits = [(-1.0, 1.0), (0.0, 2.0), (1.0, 10.0), (-10.0, -1.0), (-5.0, 2.5)];

    for (lower, upper) in limits {
        let range_diff = upper - lower;
        let float_type = FloatType::new(lower, upper).unwrap();
        let original = float_type.sample_random(&mut rng);

        let mut total_difference = 0.0;
        for _ in 0..100 {
            let mut mutated = original.clone();
            float_type.mutate_random(&mut mutated, &mut rng).unwrap();
            let value = mutated[0].as_f64();
            assert!(lower <= value && value <= upper);
            assert_ne!(value, original[0].as_f64());
            total_difference += (value - original[0].as_f64()).abs();
        }
        // Sigma is 10% of the range, so the average move sits far below the
        // 35% bound even though single draws have unbounded tails.
        assert!(total_difference / 100.0 <= 0.35 * range_diff);
    }
}

#[test]
fn test_code_fits_integer_type() {
    let cases = [
        ((-1, 1), -1, true),
        ((0, 2), 0, true),
        ((1, 10), 10, true),
        ((-10, -1), -1, true),
        ((-10, -1), 0, false),
        ((-5, 2), 3, false),
    ];

    for ((lower, upper), value, expected) in cases {
        let int_type = IntegerType::new(lower, upper).unwrap();
        assert_eq!(int_type.fits(&[Gene::Int(value)]), expected);
    }
}

#[test]
fn test_code_fits_float_type() {
    let cases = [
        ((-1.0, 1.5), Gene::Int(-1), true),
        ((0.0, 2.0), Gene::Float(0.1), true),
        ((1.0, 10.0), Gene::Float(9.9), true),
        ((-10.6, -1.0), Gene::Float(-1.91), true),
        ((-5.0, 2.3), Gene::Float(0.0), true),
        ((-3.9, 12.5), Gene::Float(12.6), false),
    ];

    for ((lower, upper), gene, expected) in cases {
        let float_type = FloatType::new(lower, upper).unwrap();
        assert_eq!(float_type.fits(&[gene]), expected);
    }
}

#[test]
fn test_fits_rejects_wrong_shape() {
    let int_type = IntegerType::new(0, 5).unwrap();
    assert!(!int_type.fits(&[]));
    assert!(!int_type.fits(&[Gene::Int(1), Gene::Int(2)]));
}
