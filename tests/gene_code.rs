use genespace::{
    FeatureBundle, FeatureOption, FeatureType, FloatType, Gene, GeneCode, GenespaceError,
    GeneticEncoding, IntegerType, MappedValue,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

fn natint() -> FeatureType {
    IntegerType::new(1, 5000).unwrap().into()
}

fn natfloat() -> FeatureType {
    FloatType::new(1.0, 100.0).unwrap().into()
}

#[test]
fn test_init_fail() {
    // An empty space cannot contain a three-dimensional code.
    let space = Arc::new(GeneticEncoding::new("test", "1.2.0").unwrap());
    let result = GeneCode::new(vec![Gene::Int(1), Gene::Int(2), Gene::Int(3)], space);
    assert!(matches!(result, Err(GenespaceError::Validation(_))));
}

#[test]
fn test_init_fail_names_offending_feature() {
    let mut space = GeneticEncoding::new("test", "1.2.0").unwrap();
    space.add_feature("first", natint()).unwrap();
    space.add_feature("second", natint()).unwrap();
    let space = Arc::new(space);

    // Correct length, but 'second' cannot hold a float gene.
    let result = GeneCode::new(vec![Gene::Int(1), Gene::Float(0.5)], space);
    match result {
        Err(GenespaceError::Validation(message)) => {
            assert!(message.contains("second"), "unhelpful message: {}", message)
        }
        other => panic!("expected a validation error, got {:?}", other),
    }
}

#[test]
fn test_init_success() {
    let mut space = GeneticEncoding::new("test", "1.2.0").unwrap();
    space.add_feature("first", natint()).unwrap();
    space.add_feature("second", natint()).unwrap();
    let space = Arc::new(space);

    let code = GeneCode::new(vec![Gene::Int(1), Gene::Int(2)], Arc::clone(&space)).unwrap();
    assert!(space.contains(&code));
}

#[test]
fn test_index_access() {
    let mut space = GeneticEncoding::new("test", "1.2.0").unwrap();
    space.add_feature("first", natint()).unwrap();
    space.add_feature("second", natint()).unwrap();
    let space = Arc::new(space);

    let code = GeneCode::new(vec![Gene::Int(10), Gene::Int(12)], space).unwrap();
    assert_eq!(
        code.feature(0).unwrap(),
        MappedValue::Scalar(Gene::Int(10))
    );
    assert_eq!(
        code.feature(1).unwrap(),
        MappedValue::Scalar(Gene::Int(12))
    );
    assert!(matches!(
        code.feature(2),
        Err(GenespaceError::Lookup(_))
    ));
}

#[test]
fn test_feature_access_by_name() {
    let mut space = GeneticEncoding::new("test", "1.2.0").unwrap();
    space
        .add_feature(
            "outer",
            FeatureBundle::new(vec![("inner1", natint()), ("inner2", natfloat())]).unwrap(),
        )
        .unwrap();
    let space = Arc::new(space);

    let raw = vec![Gene::Int(10), Gene::Float(3.4)];
    let code = GeneCode::new(raw.clone(), space).unwrap();

    assert_eq!(code.feature_slice("outer").unwrap(), raw.as_slice());
    assert_eq!(
        code.feature("inner1").unwrap(),
        MappedValue::Scalar(Gene::Int(10))
    );
    assert_eq!(
        code.feature("inner2").unwrap(),
        MappedValue::Scalar(Gene::Float(3.4))
    );
    assert!(matches!(
        code.feature("unknown"),
        Err(GenespaceError::Lookup(_))
    ));
}

#[test]
fn test_named_access_through_selected_branch() {
    let mut space = GeneticEncoding::new("test", "1.2.0").unwrap();
    space
        .add_feature(
            "opts",
            FeatureOption::new(vec![
                FeatureBundle::new(vec![("x1", natint()), ("x2", natint())])
                    .unwrap()
                    .into(),
                FeatureBundle::new(vec![("y1", natfloat())]).unwrap().into(),
            ])
            .unwrap(),
        )
        .unwrap();
    let space = Arc::new(space);

    let code = GeneCode::new(
        vec![Gene::Int(0), Gene::Int(7), Gene::Int(9)],
        Arc::clone(&space),
    )
    .unwrap();
    assert_eq!(
        code.feature("x2").unwrap(),
        MappedValue::Scalar(Gene::Int(9))
    );
    // The unselected branch is not addressable on this vector.
    assert!(matches!(code.feature("y1"), Err(GenespaceError::Lookup(_))));
}

#[test]
fn test_mutation_preserves_membership_fixed_space() {
    let mut rng = StdRng::seed_from_u64(59);
    let mut space = GeneticEncoding::new("test", "1.2.0").unwrap();
    space.add_feature("a", IntegerType::new(0, 100).unwrap()).unwrap();
    space
        .add_feature("b", FloatType::new(-1.0, 1.0).unwrap())
        .unwrap();
    let space = Arc::new(space);

    let mut code = GeneCode::sample_random_with(&space, &mut rng);
    for _ in 0..100 {
        code.mutate_random_with(&mut rng).unwrap();
        assert!(space.contains(&code));
        assert_eq!(code.len(), 2);
    }
}

#[test]
fn test_mutation_of_dynamic_feature_may_change_length() {
    let mut rng = StdRng::seed_from_u64(61);
    let mut space = GeneticEncoding::new("test", "1.2.0").unwrap();
    space
        .add_feature(
            "opts",
            FeatureOption::new(vec![
                natint(),
                FeatureBundle::new(vec![("x1", natint()), ("x2", natint())])
                    .unwrap()
                    .into(),
            ])
            .unwrap(),
        )
        .unwrap();
    space.add_feature("tail", natint()).unwrap();
    let space = Arc::new(space);

    let mut code = GeneCode::sample_random_with(&space, &mut rng);
    let mut seen_lengths = std::collections::HashSet::new();
    for _ in 0..100 {
        code.mutate_random_with(&mut rng).unwrap();
        // Offsets are not stable across mutations of a dynamic space, but
        // membership always holds.
        assert!(space.contains(&code));
        seen_lengths.insert(code.len());
    }
    // Both branch widths show up over a hundred re-samples.
    assert_eq!(seen_lengths, [3, 4].into_iter().collect());
}

#[test]
fn test_canonical_key_distinguishes_codes() {
    let mut space = GeneticEncoding::new("test", "1.2.0").unwrap();
    space.add_feature("a", natint()).unwrap();
    let space = Arc::new(space);

    let first = GeneCode::new(vec![Gene::Int(1)], Arc::clone(&space)).unwrap();
    let second = GeneCode::new(vec![Gene::Int(2)], Arc::clone(&space)).unwrap();
    let copy = GeneCode::new(vec![Gene::Int(1)], space).unwrap();

    assert_ne!(first.canonical_key(), second.canonical_key());
    assert_eq!(first.canonical_key(), copy.canonical_key());
}
