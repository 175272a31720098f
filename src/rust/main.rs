use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use log::info;
use ticket_classifier::{
    dataset, server, ApiClient, ArtifactStore, CurationConfig, DatasetCurator, InferenceService, ServiceConfig,
    TextColumn, Trainer,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Data directory holding `data/` and `models/`
    #[arg(long, global = true, env = "TICKET_CLASSIFIER_HOME")]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Label raw tickets and write a balanced training sample
    Curate {
        /// Raw ticket CSV (defaults to data/all_tickets.csv)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Curated sample CSV (defaults to data/sample_tickets.csv)
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long, default_value = "body")]
        text_column: String,
        #[arg(long, default_value_t = 500)]
        max_samples: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Fit the classifier on a curated sample and save the artifact
    Train {
        #[arg(long)]
        sample: Option<PathBuf>,
        #[arg(long)]
        artifact: Option<PathBuf>,
        #[arg(long, default_value_t = 5000)]
        max_features: usize,
        #[arg(long, default_value_t = 1000)]
        max_iter: usize,
        #[arg(long, default_value_t = 1.0)]
        c: f64,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Fit on the raw ticket body instead of the cleaned text
        #[arg(long)]
        raw_text: bool,
    },
    /// Serve the HTTP API
    Serve {
        #[arg(long)]
        artifact: Option<PathBuf>,
        #[arg(long, default_value = "0.0.0.0:8000", env = "TICKET_CLASSIFIER_BIND")]
        bind: SocketAddr,
        #[arg(long, default_value_t = ServiceConfig::DEFAULT_MAX_INPUT_CHARS)]
        max_input_chars: usize,
    },
    /// Classify one text against a local artifact
    Classify {
        text: String,
        #[arg(long)]
        artifact: Option<PathBuf>,
    },
    /// Print the held-out metrics stored in a local artifact
    Metrics {
        #[arg(long)]
        artifact: Option<PathBuf>,
    },
    /// Query a running server
    Query {
        #[arg(long, default_value = "http://127.0.0.1:8000", env = "TICKET_CLASSIFIER_URL")]
        url: String,
        /// Text to classify; prints the server's metrics when omitted
        text: Option<String>,
    },
}

/// Opens the data directory, creating `data/` and `models/` if needed.
fn open_store(home: Option<&Path>) -> anyhow::Result<ArtifactStore> {
    let store = match home {
        Some(root) => ArtifactStore::new(root),
        None => ArtifactStore::new_default(),
    }
    .context("Failed to prepare data directory")?;
    info!("Using data directory {:?}", store.root());
    Ok(store)
}

fn load_service(home: Option<&Path>, artifact: Option<PathBuf>) -> anyhow::Result<InferenceService> {
    let path = match artifact {
        Some(path) => path,
        None => open_store(home)?.artifact_path(),
    };
    let config = ServiceConfig::new(&path);
    InferenceService::from_config(&config).with_context(|| format!("Failed to load model from {:?}", path))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ticket_classifier::init_logger();
    let args = Args::parse();
    let home = args.home.as_deref();

    match args.command {
        Command::Curate { input, output, text_column, max_samples, seed } => {
            let store = open_store(home)?;
            let input = input.unwrap_or_else(|| store.raw_tickets_path());
            let output = output.unwrap_or_else(|| store.sample_path());
            let config = CurationConfig { max_sample_size: max_samples, seed, text_column };

            let start_time = Instant::now();
            let tickets = dataset::read_tickets(&input, &config.text_column)?;
            let sample = DatasetCurator::english().curate_with(&tickets, &config)?;
            dataset::write_sample(&output, &sample)?;
            info!("=== Curation finished in {:.2?} ===", start_time.elapsed());
            println!("Wrote {} tickets to {}", sample.len(), output.display());
            for (category, count) in sample.category_counts() {
                println!("  {:<10} {}", category, count);
            }
        }
        Command::Train { sample, artifact, max_features, max_iter, c, seed, raw_text } => {
            let store = open_store(home)?;
            let sample_path = sample.unwrap_or_else(|| store.sample_path());
            let artifact_path = artifact.unwrap_or_else(|| store.artifact_path());
            let text_column = if raw_text { TextColumn::Raw } else { TextColumn::Cleaned };

            let start_time = Instant::now();
            let sample = dataset::read_sample(&sample_path)?;
            let trainer = Trainer::builder()
                .with_max_features(max_features)
                .with_max_iter(max_iter)
                .with_c(c)
                .with_seed(seed)
                .with_text_column(text_column)
                .build()?;
            let model = trainer.train(&sample)?;
            model.save(&artifact_path)?;
            info!("=== Training finished in {:.2?} ===", start_time.elapsed());

            let metrics = model.metrics();
            println!("Saved model to {}", artifact_path.display());
            println!("Accuracy:  {:.4}", metrics.accuracy);
            println!("Precision: {:.4}", metrics.precision);
            println!("Recall:    {:.4}", metrics.recall);
            println!("F1 Score:  {:.4}", metrics.f1_score);
        }
        Command::Serve { artifact, bind, max_input_chars } => {
            let service = load_service(home, artifact)?.with_max_input_chars(max_input_chars);
            server::serve(Arc::new(service), bind)
                .await
                .with_context(|| format!("Server on {} failed", bind))?;
        }
        Command::Classify { text, artifact } => {
            let service = load_service(home, artifact)?;
            let result = service.classify_detailed(&text)?;
            println!("Predicted category: {} ({:.4})", result.category, result.probability);
            for (category, probability) in result.probabilities {
                println!("  {:<10} {:.4}", category, probability);
            }
        }
        Command::Metrics { artifact } => {
            let service = load_service(home, artifact)?;
            println!("{}", serde_json::to_string_pretty(&service.metrics())?);
        }
        Command::Query { url, text } => {
            let client = ApiClient::new(url);
            let health = client.health().await?;
            if health.status != "ok" {
                bail!("Server at {} reports status '{}'", client.base_url(), health.status);
            }
            match text {
                Some(text) => {
                    let result = client.classify(&text).await?;
                    println!("{}", serde_json::to_string_pretty(&result)?);
                }
                None => {
                    let metrics = client.metrics().await?;
                    println!("{}", serde_json::to_string_pretty(&metrics)?);
                }
            }
        }
    }

    Ok(())
}
