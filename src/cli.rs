//! CLI interface for cv-tailor

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cv-tailor")]
#[command(about = "Adapts a personal profile into a job-specific resume and cover letter")]
#[command(
    long_about = "Analyzes a job posting, ranks the profile against it, composes a \
                  five-part cover letter and renders both documents as LaTeX, compiling \
                  them to PDF when a compiler is installed"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the adapted resume and cover letter for a posting
    Generate {
        /// Path to the job posting JSON (scraper output)
        #[arg(short, long)]
        posting: PathBuf,

        /// Path to the profile JSON
        #[arg(long)]
        profile: PathBuf,

        /// Output directory (default: <output_dir>/<Company>_<timestamp>)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Only generate the resume
        #[arg(long, conflicts_with = "cover_only")]
        cv_only: bool,

        /// Only generate the cover letter
        #[arg(long, conflicts_with = "cv_only")]
        cover_only: bool,

        /// Skip PDF compilation, keep the .tex sources
        #[arg(long)]
        no_compile: bool,

        /// User-edited cover-letter segments (JSON, highest priority)
        #[arg(long)]
        overrides: Option<PathBuf>,

        /// Externally generated cover-letter segments (JSON)
        #[arg(long)]
        generated: Option<PathBuf>,
    },

    /// Analyze a posting: language, keywords and job context
    Analyze {
        /// Path to the job posting JSON
        #[arg(short, long)]
        posting: PathBuf,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,
}
