use crate::error::{Result, TriageError};
use crate::ml::classifier::Classifier;
use crate::ml::models::ClassMetrics;
use crate::models::{LabeledExample, Priority};
use ndarray::Array2;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

/// Counts of (true priority, predicted priority) pairs.
///
/// Rows are true labels, columns are predictions, both most severe first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    counts: Array2<usize>,
}

impl ConfusionMatrix {
    pub fn new() -> Self {
        Self {
            counts: Array2::zeros((Priority::COUNT, Priority::COUNT)),
        }
    }

    pub fn record(&mut self, actual: Priority, predicted: Priority) {
        self.counts[[actual.index(), predicted.index()]] += 1;
    }

    pub fn get(&self, actual: Priority, predicted: Priority) -> usize {
        self.counts[[actual.index(), predicted.index()]]
    }

    /// Predicted label → count for one true label
    pub fn row(&self, actual: Priority) -> BTreeMap<Priority, usize> {
        Priority::all()
            .map(|predicted| (predicted, self.get(actual, predicted)))
            .collect()
    }

    /// Number of examples predicted as `predicted`
    pub fn column_total(&self, predicted: Priority) -> usize {
        self.counts.column(predicted.index()).sum()
    }

    /// Number of examples whose true label is `actual`
    pub fn row_total(&self, actual: Priority) -> usize {
        self.counts.row(actual.index()).sum()
    }

    pub fn total(&self) -> usize {
        self.counts.sum()
    }

    /// Sum of the diagonal
    pub fn correct(&self) -> usize {
        self.counts.diag().sum()
    }

    pub fn is_diagonal(&self) -> bool {
        self.correct() == self.total()
    }
}

impl Default for ConfusionMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\t")?;
        let header: Vec<String> = Priority::all().map(|p| p.code().to_string()).collect();
        writeln!(f, "{}", header.join("\t"))?;

        for actual in Priority::all() {
            let row: Vec<String> = Priority::all()
                .map(|predicted| self.get(actual, predicted).to_string())
                .collect();
            writeln!(f, "{}\t{}", actual.code(), row.join("\t"))?;
        }
        Ok(())
    }
}

/// Holdout evaluation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    /// Correct predictions / examples
    pub accuracy: f64,

    /// Macro-averaged precision
    pub precision: f64,

    /// Macro-averaged recall
    pub recall: f64,

    /// Macro-averaged F1 score
    pub f1_score: f64,

    pub confusion_matrix: ConfusionMatrix,

    pub per_class: BTreeMap<Priority, ClassMetrics>,

    pub n_samples: usize,
}

impl Evaluation {
    fn from_confusion_matrix(confusion_matrix: ConfusionMatrix) -> Self {
        let n_samples = confusion_matrix.total();
        let accuracy = confusion_matrix.correct() as f64 / n_samples as f64;

        let per_class: BTreeMap<Priority, ClassMetrics> = Priority::all()
            .map(|class| {
                let tp = confusion_matrix.get(class, class);
                let fp = confusion_matrix.column_total(class) - tp;
                let fn_count = confusion_matrix.row_total(class) - tp;
                (class, ClassMetrics::from_counts(tp, fp, fn_count))
            })
            .collect();

        let n_classes = Priority::COUNT as f64;
        let precision = per_class.values().map(|m| m.precision).sum::<f64>() / n_classes;
        let recall = per_class.values().map(|m| m.recall).sum::<f64>() / n_classes;
        let f1_score = per_class.values().map(|m| m.f1_score).sum::<f64>() / n_classes;

        Self {
            accuracy,
            precision,
            recall,
            f1_score,
            confusion_matrix,
            per_class,
            n_samples,
        }
    }
}

/// Predict every example once and score the predictions against the true labels.
pub fn evaluate<C>(classifier: &C, examples: &[LabeledExample]) -> Result<Evaluation>
where
    C: Classifier + ?Sized,
{
    if !classifier.is_trained() {
        return Err(TriageError::NotTrained);
    }
    if examples.is_empty() {
        return Err(TriageError::invalid("cannot evaluate on an empty example set"));
    }

    let mut matrix = ConfusionMatrix::new();
    for example in examples {
        let predicted = classifier.predict(example.description())?;
        matrix.record(example.priority(), predicted);
    }

    let evaluation = Evaluation::from_confusion_matrix(matrix);
    info!(
        model = %classifier.model_type(),
        samples = evaluation.n_samples,
        accuracy = evaluation.accuracy,
        "Evaluation completed"
    );
    Ok(evaluation)
}

/// Per-fold cross-validation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossValidation {
    pub folds: usize,

    /// Held-out examples per fold
    pub fold_size: usize,

    pub fold_accuracies: Vec<f64>,

    pub mean_accuracy: f64,
}

/// K-fold cross-validation returning per-fold detail.
///
/// The examples are shuffled with `rng` (callers seed it for reproducible
/// runs), then cut into `folds` contiguous slices of `len / folds` examples.
/// Leftover examples past the last slice are never held out; they always stay
/// in the training portion. Each fold trains a fresh classifier from
/// `factory`.
pub fn cross_validate_detailed<F, C, R>(
    factory: F,
    examples: &[LabeledExample],
    folds: usize,
    rng: &mut R,
) -> Result<CrossValidation>
where
    F: Fn() -> C,
    C: Classifier,
    R: Rng + ?Sized,
{
    if folds == 0 {
        return Err(TriageError::invalid("folds must be at least 1"));
    }
    if folds == 1 {
        return Err(TriageError::invalid(
            "folds=1 holds out every example and leaves no training data",
        ));
    }
    if folds > examples.len() {
        return Err(TriageError::invalid(format!(
            "folds ({folds}) exceeds the number of examples ({})",
            examples.len()
        )));
    }
    let fold_size = examples.len() / folds;
    if fold_size == 0 {
        return Err(TriageError::invalid("fold size is zero"));
    }

    let mut shuffled = examples.to_vec();
    shuffled.shuffle(rng);

    let mut fold_accuracies = Vec::with_capacity(folds);
    for fold in 0..folds {
        let start = fold * fold_size;
        let end = start + fold_size;

        let held_out = &shuffled[start..end];
        let training: Vec<LabeledExample> = shuffled[..start]
            .iter()
            .chain(shuffled[end..].iter())
            .cloned()
            .collect();

        let mut classifier = factory();
        classifier.fit(&training)?;
        let accuracy = evaluate(&classifier, held_out)?.accuracy;

        debug!(fold, train = training.len(), test = held_out.len(), accuracy, "Fold evaluated");
        fold_accuracies.push(accuracy);
    }

    let mean_accuracy = fold_accuracies.iter().sum::<f64>() / folds as f64;
    info!(folds, fold_size, mean_accuracy, "Cross-validation completed");

    Ok(CrossValidation {
        folds,
        fold_size,
        fold_accuracies,
        mean_accuracy,
    })
}

/// K-fold cross-validation returning the mean held-out accuracy.
pub fn cross_validate<F, C, R>(
    factory: F,
    examples: &[LabeledExample],
    folds: usize,
    rng: &mut R,
) -> Result<f64>
where
    F: Fn() -> C,
    C: Classifier,
    R: Rng + ?Sized,
{
    cross_validate_detailed(factory, examples, folds, rng).map(|cv| cv.mean_accuracy)
}
