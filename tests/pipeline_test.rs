mod common;

use ticket_classifier::{
    Category, ClassifierError, FeatureExtractor, FeatureConfig, InferenceService, TextColumn, TextNormalizer,
    Trainer, WeakLabeler,
};

#[test]
fn test_end_to_end_login_ticket() {
    let text = "I forgot my password and cannot log into my account";
    assert_eq!(WeakLabeler::english().label(text), Category::Login);

    let service = InferenceService::new(common::artifact(), TextNormalizer::english());
    let result = service.classify(text).unwrap();
    assert_eq!(result.category, Category::Login);
    assert!(result.probability > 1.0 / 3.0);
}

#[test]
fn test_each_category_is_recognized() {
    let service = InferenceService::new(common::artifact(), TextNormalizer::english());
    let cases = [
        ("Please reset my account password", Category::Login),
        ("I want a refund for this invoice", Category::Billing),
        ("The software crashes with an error", Category::Technical),
    ];
    for (text, expected) in cases {
        assert_eq!(service.classify(text).unwrap().category, expected, "text: {}", text);
    }
}

#[test]
fn test_metrics_are_stable_and_in_range() {
    let service = InferenceService::new(common::artifact(), TextNormalizer::english());
    let first = service.metrics();
    let second = service.metrics();
    assert_eq!(first, second);
    for value in [first.accuracy, first.precision, first.recall, first.f1_score] {
        assert!((0.0..=1.0).contains(&value));
    }
    // The synthetic corpus is separable
    assert!(first.accuracy > 0.9);
}

#[test]
fn test_training_is_deterministic() {
    let sample = common::sample();
    let trainer = Trainer::builder().with_max_iter(300).build().unwrap();
    let first = trainer.train(&sample).unwrap();
    let second = trainer.train(&sample).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_raw_text_training() {
    let artifact = Trainer::builder()
        .with_text_column(TextColumn::Raw)
        .build()
        .unwrap()
        .train(&common::sample())
        .unwrap();
    assert_eq!(artifact.feature_space().text_column(), TextColumn::Raw);

    let service = InferenceService::new(artifact, TextNormalizer::english());
    let result = service.classify("Please refund my payment").unwrap();
    assert_eq!(result.category, Category::Billing);
}

#[test]
fn test_vocabulary_is_bounded() {
    let sample = common::sample();
    let texts: Vec<&str> = sample.records().iter().map(|r| r.text(TextColumn::Cleaned)).collect();
    let space = FeatureExtractor::new(FeatureConfig { max_features: 10 })
        .fit(&texts, TextColumn::Cleaned)
        .unwrap();
    assert_eq!(space.dim(), 10);
}

#[test]
fn test_invalid_training_config() {
    assert!(matches!(
        Trainer::builder().with_test_fraction(1.5).build(),
        Err(ClassifierError::DataError(_))
    ));
    assert!(matches!(
        Trainer::builder().with_c(0.0).build(),
        Err(ClassifierError::TrainingError(_))
    ));
}
