//! wnquery CLI tool
//!
//! Command-line interface for querying VisDic XML wordnets with wnxml.
//!
//! ## Commands
//!
//! - `console <wn.xml>`: Interactive query console (`.h` lists the commands)
//! - `stats <wn.xml>`: Synset and literal counts per part of speech
//! - `check <wn.xml>`: Load the resource and list its inconsistencies
//! - `export <wn.xml>`: Write a subset of the synsets back to XML

use clap::{Parser, Subcommand};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};
use wnxml::{
    codec::{load_file, write_synsets},
    config::{ConfigProvider, Settings, TomlConfigProvider},
    console::{Console, LineEditor},
    lexicon::Lexicon,
    properties::{PartOfSpeech, Synset},
    semfeatures::SemFeatures,
    WnError,
};

#[derive(Parser)]
#[command(name = "wnquery")]
#[command(author, version, about = "Query a VisDic XML wordnet", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a wordnet and start the interactive query console
    Console {
        /// Path to the VisDic XML file
        wordnet: PathBuf,

        /// Semantic features XML file
        #[arg(short, long)]
        features: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print synset and literal counts per part of speech
    Stats {
        wordnet: PathBuf,

        /// Print the counts as JSON
        #[arg(long)]
        json: bool,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Load a wordnet and report duplicate ids, dangling relations and other inconsistencies
    Check {
        wordnet: PathBuf,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write selected synsets as a standalone VisDic XML document
    Export {
        wordnet: PathBuf,

        /// Synset ids to export (repeatable)
        #[arg(long = "id", conflicts_with = "literal")]
        ids: Vec<String>,

        /// Export every sense of this literal (requires --pos)
        #[arg(long, requires = "pos")]
        literal: Option<String>,

        /// Part of speech for --literal (n, v, a, b)
        #[arg(long)]
        pos: Option<PartOfSpeech>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn settings(config: Option<&Path>) -> Result<Settings, WnError> {
    match config {
        Some(path) => TomlConfigProvider::new(path.to_path_buf()).get_settings(),
        None => Ok(Settings::default()),
    }
}

fn load(wordnet: &Path, settings: &Settings) -> Result<Lexicon, WnError> {
    eprintln!("Reading XML...");
    load_file(wordnet, &settings.load_options())
}

#[cfg(feature = "readline")]
fn line_editor(settings: &Settings) -> Result<Box<dyn LineEditor>, WnError> {
    Ok(Box::new(wnxml::console::RustylineEditor::new(
        settings.history_file.clone(),
    )?))
}

#[cfg(not(feature = "readline"))]
fn line_editor(_settings: &Settings) -> Result<Box<dyn LineEditor>, WnError> {
    Ok(Box::new(wnxml::console::PlainEditor::stdin()))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Console {
            wordnet,
            features,
            config,
        } => {
            let settings = settings(config.as_deref())?;
            let lexicon = load(&wordnet, &settings)?;
            eprintln!("{}", lexicon.stats());
            let features = match features {
                Some(path) => {
                    eprintln!("Reading SemFeatures...");
                    let features = SemFeatures::load_file(path)?;
                    eprintln!("{} pairs read", features.pair_count());
                    Some(features)
                }
                None => None,
            };

            let console = Console::new(&lexicon, features.as_ref(), &settings);
            let mut editor = line_editor(&settings)?;
            eprintln!("Type your query, or .h for help, .q to quit");
            let stdout = io::stdout();
            let mut out = stdout.lock();
            console.run(editor.as_mut(), &mut out)?;
        }

        Commands::Stats {
            wordnet,
            json,
            config,
        } => {
            let settings = settings(config.as_deref())?;
            let stats = load(&wordnet, &settings)?.stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{stats}");
            }
        }

        Commands::Check { wordnet, config } => {
            let settings = settings(config.as_deref())?;
            let lexicon = load(&wordnet, &settings)?;
            let diagnostics = lexicon.diagnostics();
            for diagnostic in diagnostics {
                println!("{diagnostic}");
            }
            println!("{}: {} diagnostics", lexicon, diagnostics.len());
            if !diagnostics.is_empty() {
                std::process::exit(1);
            }
        }

        Commands::Export {
            wordnet,
            ids,
            literal,
            pos,
            output,
            config,
        } => {
            let settings = settings(config.as_deref())?;
            let lexicon = load(&wordnet, &settings)?;
            let selected: Vec<&Synset> = match (literal, pos) {
                (Some(word), Some(pos)) => lexicon.find_by_literal(&word, pos),
                _ => ids
                    .iter()
                    .map(|id| lexicon.get_synset(id))
                    .collect::<Result<_, _>>()?,
            };
            tracing::info!("Exporting {} synsets", selected.len());
            match output {
                Some(path) => {
                    let mut file = BufWriter::new(File::create(&path)?);
                    write_synsets(selected, &mut file)?;
                    file.flush()?;
                }
                None => {
                    let stdout = io::stdout();
                    write_synsets(selected, stdout.lock())?;
                }
            }
        }
    }

    Ok(())
}
