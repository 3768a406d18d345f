/// Integration tests for evaluation and cross-validation

use incident_triage::{
    corpus,
    ml::{
        cross_validate, cross_validate_detailed, evaluate, Classifier, ClassifierFactory,
        FeatureExtractor, KnnClassifier, ModelType, NaiveBayesClassifier,
        SetSimilarityClassifier,
    },
    models::{LabeledExample, Priority},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use strum::IntoEnumIterator;

fn scenario() -> Vec<LabeledExample> {
    vec![
        LabeledExample::new("bomb threat", Priority::Critical),
        LabeledExample::new("lost wallet", Priority::Low),
        LabeledExample::new("theft of bike", Priority::Medium),
    ]
}

#[test]
fn test_evaluate_on_training_scenario_is_perfect() {
    let mut classifier = SetSimilarityClassifier::default();
    classifier.fit(&scenario()).unwrap();

    let evaluation = evaluate(&classifier, &scenario()).unwrap();
    assert_eq!(evaluation.accuracy, 1.0);
    assert_eq!(evaluation.n_samples, 3);
    assert!(evaluation.confusion_matrix.is_diagonal());
    for priority in Priority::all() {
        assert_eq!(evaluation.confusion_matrix.get(priority, priority), 1);
    }
}

#[test]
fn test_one_nearest_neighbor_memorizes_default_corpus() {
    let examples = corpus::default_corpus();
    let mut classifier = KnnClassifier::new(1, FeatureExtractor::default()).unwrap();
    classifier.fit(&examples).unwrap();

    let evaluation = evaluate(&classifier, &examples).unwrap();
    assert_eq!(evaluation.accuracy, 1.0);
    assert_eq!(evaluation.confusion_matrix.total(), 30);
}

#[test]
fn test_evaluate_through_boxed_classifier() {
    let examples = corpus::default_corpus();
    for model_type in ModelType::iter() {
        let classifier = ClassifierFactory::new(model_type, FeatureExtractor::default())
            .train(&examples)
            .unwrap();
        let evaluation = evaluate(&classifier, &examples).unwrap();

        assert!((0.0..=1.0).contains(&evaluation.accuracy));
        assert_eq!(evaluation.confusion_matrix.total(), examples.len());
        assert_eq!(
            evaluation.confusion_matrix.correct() as f64 / examples.len() as f64,
            evaluation.accuracy
        );
    }
}

#[test]
fn test_training_accuracy_is_not_below_held_out_accuracy() {
    // every third example held out keeps the class balance close
    let (held_out, training): (Vec<_>, Vec<_>) = corpus::default_corpus()
        .into_iter()
        .enumerate()
        .partition(|(i, _)| i % 3 == 0);
    let training: Vec<LabeledExample> = training.into_iter().map(|(_, e)| e).collect();
    let held_out: Vec<LabeledExample> = held_out.into_iter().map(|(_, e)| e).collect();
    assert_eq!((training.len(), held_out.len()), (20, 10));

    for model_type in ModelType::iter() {
        let classifier = ClassifierFactory::new(model_type, FeatureExtractor::default())
            .with_k(1)
            .unwrap()
            .train(&training)
            .unwrap();

        let seen = evaluate(&classifier, &training).unwrap();
        let unseen = evaluate(&classifier, &held_out).unwrap();
        assert!(
            seen.accuracy >= unseen.accuracy,
            "{model_type}: training {} < held-out {}",
            seen.accuracy,
            unseen.accuracy
        );
    }
}

#[test]
fn test_evaluate_errors() {
    let untrained = NaiveBayesClassifier::default();
    assert!(evaluate(&untrained, &scenario()).unwrap_err().is_not_trained());

    let mut trained = NaiveBayesClassifier::default();
    trained.fit(&scenario()).unwrap();
    assert!(evaluate(&trained, &[]).unwrap_err().is_invalid_configuration());
}

#[test]
fn test_cross_validation_is_reproducible_with_seed() {
    let examples = corpus::default_corpus();
    let factory = ClassifierFactory::new(ModelType::NaiveBayes, FeatureExtractor::default());

    let first = cross_validate_detailed(
        || factory.build(),
        &examples,
        5,
        &mut StdRng::seed_from_u64(42),
    )
    .unwrap();
    let second = cross_validate_detailed(
        || factory.build(),
        &examples,
        5,
        &mut StdRng::seed_from_u64(42),
    )
    .unwrap();

    assert_eq!(first.fold_accuracies, second.fold_accuracies);
    assert_eq!(first.folds, 5);
    assert_eq!(first.fold_size, 6);
    assert!((0.0..=1.0).contains(&first.mean_accuracy));
}

#[test]
fn test_cross_validation_with_remainder() {
    // 30 examples, 7 folds: 4 held out per fold, 2 always trained on
    let examples = corpus::default_corpus();
    let result = cross_validate_detailed(
        SetSimilarityClassifier::default,
        &examples,
        7,
        &mut StdRng::seed_from_u64(7),
    )
    .unwrap();

    assert_eq!(result.fold_size, 4);
    assert_eq!(result.fold_accuracies.len(), 7);
    for accuracy in &result.fold_accuracies {
        // every fold holds out 4 examples
        assert_eq!((accuracy * 4.0).fract(), 0.0);
    }
}

#[test]
fn test_leave_one_out() {
    let examples = corpus::default_corpus();
    let mean = cross_validate(
        SetSimilarityClassifier::default,
        &examples,
        examples.len(),
        &mut StdRng::seed_from_u64(1),
    )
    .unwrap();
    assert!((0.0..=1.0).contains(&mean));
}

#[test]
fn test_cross_validation_rejects_bad_fold_counts() {
    let examples = scenario();
    let mut rng = StdRng::seed_from_u64(0);

    for folds in [0, 1, 4] {
        let err = cross_validate(SetSimilarityClassifier::default, &examples, folds, &mut rng)
            .unwrap_err();
        assert!(err.is_invalid_configuration(), "folds={folds}");
    }
}
