use genespace::{FeatureBundle, FeatureOption, FeatureType, FloatType, Gene, IntegerType};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn natint() -> FeatureType {
    IntegerType::new(1, 5000).unwrap().into()
}

fn natfloat() -> FeatureType {
    FloatType::new(1.0, 100.0).unwrap().into()
}

fn unitfloat() -> FeatureType {
    FloatType::new(0.0, 1.0).unwrap().into()
}

#[test]
fn test_sample_feature_option() {
    let mut rng = StdRng::seed_from_u64(23);
    let options = FeatureOption::new(vec![
        FeatureBundle::new(vec![("x1", natint()), ("x2", natint())])
            .unwrap()
            .into(),
        FeatureBundle::new(vec![("x3", natfloat()), ("x4", natint()), ("x5", natfloat())])
            .unwrap()
            .into(),
    ])
    .unwrap();

    for _ in 0..30 {
        let code = options.sample_random(&mut rng);
        // Selector plus a two- or three-slot branch.
        assert!(code.len() >= 3);
        assert!(code.len() <= 4);
        assert!(options.fits(&code));
    }
}

#[test]
fn test_code_fits_feature_option() {
    let options = FeatureOption::new(vec![
        FeatureBundle::new(vec![("a", unitfloat()), ("b", natint()), ("c", unitfloat())])
            .unwrap()
            .into(),
        FeatureBundle::new(vec![("a", natint()), ("b", natint())])
            .unwrap()
            .into(),
    ])
    .unwrap();

    let code = [
        Gene::Int(0),
        Gene::Float(0.1),
        Gene::Int(10),
        Gene::Float(0.1),
    ];
    assert!(options.fits(&code));

    // The selector picks branch 1, which needs two slots, not three.
    let code = [
        Gene::Int(1),
        Gene::Float(0.1),
        Gene::Int(10),
        Gene::Float(0.1),
    ];
    assert!(!options.fits(&code));
}

#[test]
fn test_selector_must_be_integral_and_in_range() {
    let options = FeatureOption::new(vec![natint(), natfloat()]).unwrap();
    assert!(options.fits(&[Gene::Int(0), Gene::Int(12)]));
    assert!(!options.fits(&[Gene::Int(2), Gene::Int(12)]));
    assert!(!options.fits(&[Gene::Int(-1), Gene::Int(12)]));
    assert!(!options.fits(&[Gene::Float(0.0), Gene::Int(12)]));
}

#[test]
fn test_mutation_keeps_selected_branch() {
    let mut rng = StdRng::seed_from_u64(29);
    let options = FeatureOption::new(vec![
        IntegerType::new(0, 10).unwrap().into(),
        FloatType::new(-1.0, 1.0).unwrap().into(),
    ])
    .unwrap();

    for _ in 0..30 {
        let mut code = options.sample_random(&mut rng);
        let selector = code[0];
        options.mutate_random(&mut code, &mut rng).unwrap();
        assert_eq!(code[0], selector);
        assert!(options.fits(&code));
    }
}

#[test]
fn test_nested_option_lists() {
    let mut rng = StdRng::seed_from_u64(31);
    let inner = FeatureOption::new(vec![natint(), natfloat()]).unwrap();
    let outer = FeatureOption::new(vec![inner.into(), unitfloat()]).unwrap();

    // Outer selector + (inner selector + leaf | leaf).
    assert_eq!(FeatureType::from(outer.clone()).len(), 3);
    for _ in 0..30 {
        let code = outer.sample_random(&mut rng);
        assert!(outer.fits(&code));
    }
}
