use clap::{Parser, Subcommand};
use ibm1::persistence::{load_from_disk, save_to_disk};
use ibm1::report::{render_json, render_metadata, render_table};
use ibm1::{Ibm1Model, TrainConfig, Translation};
use std::error::Error;
use std::io::{stdout, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "IBM Model 1 translation tables from sentence-aligned text")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Trains a model and saves a snapshot.
    Train {
        /// Source-language (F) sentences, one per line.
        source: PathBuf,
        /// Target-language (E) sentences, aligned line by line with `source`.
        target: PathBuf,
        /// JSON file with training options. Flags below override it.
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,
        /// Number of EM iterations (default 3).
        #[arg(short = 'i', long = "iternb")]
        iterations: Option<usize>,
        /// Maximum sentence length on either side (default 30).
        #[arg(short = 'l', long = "maxlength")]
        max_length: Option<usize>,
        /// Stop loading once more than this many sentence pairs are kept, 0 for no limit (default 0).
        #[arg(short = 'n', long = "maxnbsent")]
        max_pairs: Option<usize>,
        /// Where to write the trained snapshot.
        #[arg(short = 'o', long, default_value = "ibm1.bin")]
        output: PathBuf,
    },
    /// Prints the most probable translations stored in a snapshot.
    Inspect {
        snapshot: PathBuf,
        /// Number of target words to show.
        #[arg(long, default_value_t = 100)]
        limit: usize,
        /// Hide rows whose best source word has at most this many characters.
        #[arg(long, default_value_t = 3)]
        min_len: usize,
        /// Cells per line in the table.
        #[arg(long, default_value_t = 5)]
        columns: usize,
        /// Only show the best translations of these target words, normalized like the corpus.
        #[arg(short = 'w', long)]
        word: Option<String>,
        /// Print JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Loads a corpus and prints one stored sentence pair.
    ShowPair {
        source: PathBuf,
        target: PathBuf,
        index: usize,
        #[arg(short = 'l', long = "maxlength", default_value_t = 30)]
        max_length: usize,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match args.command {
        Command::Train {
            source,
            target,
            config,
            iterations,
            max_length,
            max_pairs,
            output,
        } => {
            let mut train_config = match config {
                Some(path) => TrainConfig::from_json_file(&path)?,
                None => TrainConfig::default(),
            };
            if let Some(n) = iterations {
                train_config.iteration_count = n;
            }
            if let Some(n) = max_length {
                train_config.max_sentence_length = n;
            }
            if let Some(n) = max_pairs {
                train_config.max_pairs = n;
            }

            let mut model = Ibm1Model::from_files(&source, &target, train_config)?;
            model.train()?;
            let snapshot = model.into_snapshot();
            save_to_disk(&snapshot, &output)?;
            render_metadata(&mut stdout(), &snapshot.metadata)?;
        }
        Command::Inspect {
            snapshot,
            limit,
            min_len,
            columns,
            word,
            json,
        } => {
            let model = load_from_disk(&snapshot)?;
            let rows: Vec<Translation> = match word {
                Some(w) => model.translate_query(&w)?,
                None => model.top_translations(limit, min_len)?,
            };
            let mut out = stdout().lock();
            if json {
                render_json(&mut out, &rows)?;
            } else {
                render_metadata(&mut out, &model.metadata)?;
                render_table(&mut out, &rows, columns)?;
            }
        }
        Command::ShowPair {
            source,
            target,
            index,
            max_length,
        } => {
            let config = TrainConfig {
                max_sentence_length: max_length,
                ..TrainConfig::default()
            };
            let model = Ibm1Model::from_files(&source, &target, config)?;
            let (e, f) = model.sentence_words(index)?;
            let mut out = stdout().lock();
            writeln!(out, "E: {}", e.join(" "))?;
            writeln!(out, "F: {}", f.join(" "))?;
        }
    }
    Ok(())
}
