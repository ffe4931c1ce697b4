use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Locate text in rendered page fragments and plan overlays next to it.
///
/// Every subcommand reads a JSON fragment dump:
/// {"pages":[{"page":1,"fragments":[{"text":..,"start":..,"end":..,"char_space_width":..}]}]}
#[derive(Debug, Parser)]
#[command(name = "textanchor", about, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the assembled text of each page, one run per line
    Text {
        /// Path to the fragment dump
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = TextFormat::Text)]
        format: TextFormat,
    },

    /// List chunks in reading order with their line metrics
    Chunks {
        /// Path to the fragment dump
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Find a string and report where each match starts and ends
    Search {
        /// Path to the fragment dump
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Text to search for
        #[arg(value_name = "QUERY")]
        query: String,

        /// Report every match instead of the first per page
        #[arg(long)]
        all: bool,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Locate invoice item rows, subtotal and total funded amount
    Invoice {
        /// Path to the fragment dump
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// JSON file overriding the default invoice settings
        #[arg(long, value_name = "SETTINGS")]
        settings: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = TextFormat::Text)]
        format: TextFormat,
    },

    /// Print the drawing commands that place text next to a reference string
    Overlay {
        /// Path to the fragment dump
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Text to draw
        #[arg(long)]
        text: String,

        /// Reference text to draw next to
        #[arg(long)]
        reference: String,

        /// Horizontal offset from the end of the reference text
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        offset: f32,

        /// Alignment of the drawn text
        #[arg(long, value_enum, default_value_t = AlignArg::Left)]
        align: AlignArg,

        /// Draw at every match instead of the first per page
        #[arg(long)]
        all: bool,
    },
}

/// Output format for text and invoice subcommands.
#[derive(Debug, Clone, ValueEnum)]
pub enum TextFormat {
    /// Plain text output
    Text,
    /// JSON output
    Json,
}

/// Output format for chunks and search subcommands.
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Plain text (tab-separated)
    Text,
    /// JSON output
    Json,
    /// CSV output
    Csv,
}

/// Overlay alignment.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AlignArg {
    Left,
    Right,
    Center,
}

impl From<AlignArg> for textanchor::Alignment {
    fn from(arg: AlignArg) -> Self {
        match arg {
            AlignArg::Left => textanchor::Alignment::Left,
            AlignArg::Right => textanchor::Alignment::Right,
            AlignArg::Center => textanchor::Alignment::Center,
        }
    }
}
