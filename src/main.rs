use anyhow::Context;
use clap::{Parser, Subcommand};
use incident_triage::{
    config::Config,
    corpus,
    ml::{cross_validate_detailed, evaluate, ClassifierFactory, ModelType},
    models::Priority,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "incident-triage")]
#[command(about = "Classify incident reports by priority", long_about = None)]
struct Cli {
    /// Classifier: jaccard, naive_bayes or knn
    #[arg(short, long, global = true)]
    model: Option<ModelType>,

    /// Neighbour count for knn
    #[arg(short, long, global = true)]
    k: Option<usize>,

    /// Add bigram and trigram features
    #[arg(long, global = true)]
    ngrams: bool,

    /// JSON training corpus
    #[arg(long, global = true)]
    corpus: Option<PathBuf>,

    /// Stopword file, one word per line
    #[arg(long, global = true)]
    stopwords: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the priority of one description
    Predict {
        #[arg(value_name = "DESCRIPTION", required = true)]
        words: Vec<String>,
    },

    /// Predict every line of a file
    Batch {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Evaluate on the training corpus
    Eval,

    /// K-fold cross-validation on the training corpus
    Cv {
        #[arg(short, long)]
        folds: Option<usize>,

        /// Shuffle seed for reproducible folds
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().context("Failed to load configuration")?;
    apply_overrides(&mut config, &cli);

    init_tracing(&config);
    tracing::debug!(?config, "Configuration loaded");

    let stopwords = Arc::new(config.data.load_stopwords()?);
    let examples = config.data.load_corpus()?;
    let factory = ClassifierFactory::from_config(&config.classifier, stopwords)?;

    match cli.command {
        Commands::Predict { words } => {
            let classifier = factory.train(&examples)?;
            let priority = classifier.predict(&words.join(" "))?;
            println!("Predicted Priority: {}", describe(priority));
        }

        Commands::Batch { file } => {
            let lines = corpus::read_descriptions(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let classifier = factory.train(&examples)?;
            let predictions = classifier.predict_batch(&lines)?;
            for (line, priority) in lines.iter().zip(predictions) {
                println!("{} => {}", line, describe(priority));
            }
        }

        Commands::Eval => {
            let classifier = factory.train(&examples)?;
            let evaluation = evaluate(&classifier, &examples)?;
            println!("Model: {}", factory.model_type());
            println!("Accuracy: {:.2}", evaluation.accuracy);
            println!("Confusion Matrix:");
            print!("{}", evaluation.confusion_matrix);
        }

        Commands::Cv { folds, seed } => {
            let folds = folds.unwrap_or(config.evaluation.folds);
            let mut rng = match seed.or(config.evaluation.seed) {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };

            let result = cross_validate_detailed(|| factory.build(), &examples, folds, &mut rng)?;
            println!("Model: {}", factory.model_type());
            println!("Cross-validated accuracy: {:.2}", result.mean_accuracy);
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(model) = cli.model {
        config.classifier.model = model;
    }
    if let Some(k) = cli.k {
        config.classifier.k = k;
    }
    if cli.ngrams {
        config.classifier.use_ngrams = true;
    }
    if let Some(path) = &cli.corpus {
        config.data.corpus_path = Some(path.clone());
    }
    if let Some(path) = &cli.stopwords {
        config.data.stopwords_path = Some(path.clone());
    }
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("incident_triage={}", config.observability.log_level).into()
    });

    // Logs go to stderr so stdout carries only results
    let registry = tracing_subscriber::registry().with(filter);
    if config.observability.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn describe(priority: Priority) -> String {
    format!("{} ({})", priority.code(), priority.name())
}
