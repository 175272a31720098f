mod common;

use std::sync::Arc;
use std::thread;

use ticket_classifier::{Category, ClassifierError, InferenceService, ServiceConfig, TextNormalizer};

fn service() -> InferenceService {
    InferenceService::new(common::artifact(), TextNormalizer::english())
}

#[test]
fn test_empty_input_is_rejected() {
    let service = service();
    for text in ["", "   ", "\n\t "] {
        match service.classify(text) {
            Err(err @ ClassifierError::RequestError(_)) => assert!(err.is_client_error()),
            other => panic!("expected RequestError for {:?}, got {:?}", text, other),
        }
    }
}

#[test]
fn test_unknown_terms_still_classify() {
    let service = service();
    for text in ["!!!", "zebra giraffe", "12345"] {
        let result = service.classify_detailed(text).unwrap();
        let total: f64 = result.probabilities.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-6);
        assert!(result.probabilities.iter().all(|(_, p)| (0.0..=1.0).contains(p)));
        assert!(result.category.is_target());
        // No evidence, so no class dominates
        assert!(result.probability < 0.9);
    }
}

#[test]
fn test_probability_matches_distribution() {
    let result = service().classify_detailed("Refund the double charge on my invoice").unwrap();
    assert_eq!(result.category, Category::Billing);
    let max = result.probabilities.iter().map(|(_, p)| *p).fold(f64::MIN, f64::max);
    assert_eq!(result.probability, max);
    assert_eq!(
        result.probabilities.iter().map(|(c, _)| *c).collect::<Vec<_>>(),
        Category::TARGETS.to_vec()
    );
}

#[test]
fn test_long_input_is_truncated() {
    let service = service().with_max_input_chars(52);
    // The first 52 characters are the Login sentence
    let mut text = String::from("I forgot my password and cannot log into my account ");
    text.push_str(&"refund invoice payment ".repeat(500));
    let result = service.classify(&text).unwrap();
    assert_eq!(result.category, Category::Login);

    // Truncation must not split a multi-byte character
    let text = "ü".repeat(200);
    assert!(service.classify(&text).is_ok());
}

#[test]
fn test_info() {
    let info = service().with_max_input_chars(128).info();
    assert_eq!(info.classes, Category::TARGETS.to_vec());
    assert!(info.vocabulary_size > 0);
    assert_eq!(info.max_input_chars, 128);
}

#[test]
fn test_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.bin");
    common::artifact().save(&path).unwrap();

    let mut config = ServiceConfig::new(&path);
    config.max_input_chars = 500;
    let service = InferenceService::from_config(&config).unwrap();
    assert_eq!(service.info().max_input_chars, 500);

    let missing = ServiceConfig::new(dir.path().join("missing.bin"));
    assert!(matches!(
        InferenceService::from_config(&missing),
        Err(ClassifierError::ArtifactError(_))
    ));
}

#[test]
fn test_concurrent_classification() {
    let service = Arc::new(service());
    let expected = service.classify("Please refund my payment").unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                for _ in 0..20 {
                    assert_eq!(service.classify("Please refund my payment").unwrap(), expected);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
