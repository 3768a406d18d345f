/// Integration tests for the classifiers
///
/// These tests exercise the public API end to end:
/// - Fitting each strategy through the factory
/// - Predictions on the built-in corpus
/// - Injected stopwords and corpus files
/// - Untrained and degenerate-input behavior

use incident_triage::{
    corpus,
    ml::{
        Classifier, ClassifierFactory, FeatureExtractor, KnnClassifier, ModelType,
        NaiveBayesClassifier, SetSimilarityClassifier, Stopwords,
    },
    models::{LabeledExample, Priority},
};
use std::io::Write;
use std::sync::Arc;
use strum::IntoEnumIterator;

fn scenario() -> Vec<LabeledExample> {
    vec![
        LabeledExample::new("bomb threat", Priority::Critical),
        LabeledExample::new("lost wallet", Priority::Low),
        LabeledExample::new("theft of bike", Priority::Medium),
    ]
}

#[test]
fn test_set_similarity_scenario() {
    let mut classifier = SetSimilarityClassifier::default();
    classifier.fit(&scenario()).unwrap();

    assert_eq!(classifier.predict("bomb threat").unwrap(), Priority::Critical);
    assert_eq!(classifier.predict("wallet missing").unwrap(), Priority::Low);
}

#[test]
fn test_every_strategy_learns_the_scenario() {
    for model_type in ModelType::iter() {
        let factory = ClassifierFactory::new(model_type, FeatureExtractor::default())
            .with_k(1)
            .unwrap();
        let classifier = factory.train(&scenario()).unwrap();

        assert_eq!(classifier.model_type(), model_type);
        assert!(classifier.is_trained());
        for example in scenario() {
            assert_eq!(
                classifier.predict(example.description()).unwrap(),
                example.priority(),
                "{model_type} mispredicted {:?}",
                example.description()
            );
        }
    }
}

#[test]
fn test_untrained_classifiers_report_not_trained() {
    assert!(NaiveBayesClassifier::default()
        .predict("bomb threat")
        .unwrap_err()
        .is_not_trained());
    assert!(KnnClassifier::default()
        .predict("bomb threat")
        .unwrap_err()
        .is_not_trained());

    for model_type in ModelType::iter() {
        let classifier = ClassifierFactory::new(model_type, FeatureExtractor::default()).build();
        assert!(!classifier.is_trained());
        assert!(classifier.predict("anything").unwrap_err().is_not_trained());
    }
}

#[test]
fn test_fit_rejects_empty_training_set() {
    for model_type in ModelType::iter() {
        let mut classifier =
            ClassifierFactory::new(model_type, FeatureExtractor::default()).build();
        let err = classifier.fit(&[]).unwrap_err();
        assert!(err.is_invalid_configuration());
        assert!(!classifier.is_trained());
    }
}

#[test]
fn test_default_corpus_predictions() {
    let examples = corpus::default_corpus();
    let factory = ClassifierFactory::new(ModelType::NaiveBayes, FeatureExtractor::default());
    let classifier = factory.train(&examples).unwrap();

    assert_eq!(
        classifier.predict("hostage situation at the bank").unwrap(),
        Priority::Critical
    );
    assert_eq!(classifier.predict("noise complaint").unwrap(), Priority::Low);
}

#[test]
fn test_predict_batch_preserves_order() {
    let mut classifier = SetSimilarityClassifier::default();
    classifier.fit(&scenario()).unwrap();

    let inputs = vec![
        "wallet missing".to_string(),
        "bomb threat".to_string(),
        "bike theft".to_string(),
    ];
    let predictions = classifier.predict_batch(&inputs).unwrap();
    assert_eq!(
        predictions,
        vec![Priority::Low, Priority::Critical, Priority::Medium]
    );
}

#[test]
fn test_stopword_only_input_is_not_an_error() {
    for model_type in ModelType::iter() {
        let classifier = ClassifierFactory::new(model_type, FeatureExtractor::default())
            .train(&corpus::default_corpus())
            .unwrap();
        assert!(classifier.predict("the of and was").is_ok());
    }
}

#[test]
fn test_injected_stopwords_change_features() {
    let stopwords = Arc::new(Stopwords::from_words(["bomb"]));
    let mut classifier = SetSimilarityClassifier::new(FeatureExtractor::new(stopwords, false));
    classifier.fit(&scenario()).unwrap();

    // "bomb" is filtered, "threat" still matches the Critical vocabulary
    let vocabulary = classifier.label_vocabulary(Priority::Critical).unwrap();
    assert!(!vocabulary.contains("bomb"));
    assert!(vocabulary.contains("threat"));
    // "the" is no longer a stopword
    assert_eq!(classifier.predict("the").unwrap(), Priority::Critical);
}

#[test]
fn test_corpus_and_stopwords_from_files() {
    let mut corpus_file = tempfile::NamedTempFile::new().unwrap();
    write!(
        corpus_file,
        r#"[
            {{"description": "Armed robbery in progress", "priority": 1}},
            {{"description": "Stolen bicycle", "priority": 2}},
            {{"description": "Loud music next door", "priority": 3}}
        ]"#
    )
    .unwrap();

    let mut stopwords_file = tempfile::NamedTempFile::new().unwrap();
    writeln!(stopwords_file, "# custom list").unwrap();
    writeln!(stopwords_file, "in").unwrap();
    writeln!(stopwords_file, "next").unwrap();

    let examples = corpus::load(corpus_file.path()).unwrap();
    let stopwords = Arc::new(Stopwords::load(stopwords_file.path()).unwrap());
    assert_eq!(stopwords.len(), 2);

    let factory = ClassifierFactory::new(ModelType::Knn, FeatureExtractor::new(stopwords, false))
        .with_k(1)
        .unwrap();
    let classifier = factory.train(&examples).unwrap();

    assert_eq!(classifier.predict("robbery reported").unwrap(), Priority::Critical);
    assert_eq!(classifier.predict("loud party").unwrap(), Priority::Low);
}

#[test]
fn test_metadata_reflects_training() {
    let factory = ClassifierFactory::new(ModelType::Knn, FeatureExtractor::default())
        .with_k(5)
        .unwrap();
    let classifier = factory.train(&corpus::default_corpus()).unwrap();

    let metadata = classifier.metadata();
    assert_eq!(metadata.model_type, ModelType::Knn);
    assert_eq!(metadata.n_training_samples, 30);
    assert_eq!(metadata.n_labels, 3);
    assert!(metadata.trained_at.is_some());
    assert_eq!(metadata.hyperparameters.get("k").map(String::as_str), Some("5"));
}
