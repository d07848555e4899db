//! `fairhire` -- train, evaluate and query the hiring classifier.
//!
//! - `fairhire train '<json>'` -- train on the dataset, print metrics, persist the model.
//! - `fairhire predict '<json>'` -- predict one applicant with the persisted model.
//! - `fairhire generate` -- write a seeded synthetic dataset.
//!
//! Responses are single JSON lines on stdout; the exit status is 0 even when
//! the payload is an error.

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};

use fairhire::common::config::AppCfg;
use fairhire::common::log;
use fairhire::data::repo_fs::FsDataRepo;
use fairhire::training::repo_fs::FsModelRepo;
use fairhire::api::handler::usage_error;
use fairhire::{handle_generate, handle_predict, handle_train};

#[derive(Parser)]
#[command(name = "fairhire", about = "Fairness-aware hiring classifier", version)]
struct Cli {
    /// Directory holding the dataset and the `models/` folder.
    #[arg(long, global = true)]
    data_root: Option<PathBuf>,

    /// Dataset CSV path (defaults to `<data-root>/dataset.csv`).
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train and evaluate a model from a JSON request.
    Train {
        /// `{"features": [...], "model_type": "...", "threshold": 0.5}`
        #[arg(default_value = "{}")]
        request: String,
    },

    /// Predict one applicant from a JSON request.
    Predict {
        /// `{"age": 30, "gender": "M", ...}`
        #[arg(default_value = "{}")]
        request: String,
    },

    /// Generate a synthetic, label-balanced dataset.
    Generate {
        #[arg(long, default_value_t = 2500)]
        rows: usize,

        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            println!("{}", usage_error(err.to_string()));
            return;
        }
    };

    let mut cfg = AppCfg::load();
    if let Some(root) = cli.data_root {
        let relative = cfg
            .dataset_path
            .strip_prefix(&cfg.data_root)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("dataset.csv"));
        cfg.dataset_path = root.join(relative);
        cfg.data_root = root;
    }
    if let Some(dataset) = cli.dataset {
        cfg.dataset_path = dataset;
    }
    log::init(&cfg);

    let response = match cli.command {
        Commands::Train { request } => handle_train(
            &request,
            &cfg,
            &FsDataRepo::new(&cfg),
            &FsModelRepo::new(&cfg),
        ),
        Commands::Predict { request } => handle_predict(&request, &FsModelRepo::new(&cfg)),
        Commands::Generate { rows, seed } => {
            handle_generate(&cfg.dataset_path, rows, seed.unwrap_or(cfg.seed))
        }
    };
    println!("{response}");
}
