//! CLI module for Spotter.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Spotter - a fitness coaching assistant
///
/// Answers training and nutrition questions from an indexed library of
/// fitness material, and recommends further reading or videos.
#[derive(Parser, Debug)]
#[command(name = "spotter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "SPOTTER_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask one question
    Ask {
        /// The question to ask
        question: String,

        /// Number of passages to retrieve as context
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Start an interactive chat session
    Chat,

    /// Show the passages retrieved for a query without generating an answer
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// Extract text and metadata from a directory of PDFs into JSON records
    Ingest {
        /// Directory containing PDF files
        input_dir: String,

        /// Output directory for JSON records (defaults to ingest.output_dir)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Chunk, embed and upload ingested JSON records to the vector index
    Index {
        /// Directory of JSON records (defaults to ingest.output_dir)
        #[arg(short, long)]
        input: Option<String>,
    },

    /// Check credentials and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
