//! Lives in its own test binary: the process-wide RNG is shared, and a
//! sibling test sampling concurrently would break the determinism check.

use genespace::{FloatType, GeneticEncoding, IntegerType};

#[test]
fn test_reseed_makes_sampling_reproducible() {
    let mut space = GeneticEncoding::new("test", "0.1.0").unwrap();
    space
        .add_feature("a", IntegerType::new(1, 5000).unwrap())
        .unwrap();
    space
        .add_feature("b", FloatType::new(0.0, 1.0).unwrap())
        .unwrap();

    genespace::rng::reseed(346466);
    let first = space.sample_code();
    genespace::rng::reseed(346466);
    let second = space.sample_code();
    assert_eq!(first, second);
}
