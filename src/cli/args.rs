//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::media::Duration;
use crate::domain::report::ExportFormat;

/// ReportScribe - multimodal capture to plain-text report
#[derive(Parser, Debug)]
#[command(name = "report-scribe")]
#[command(version = "1.0.0")]
#[command(about = "Combine text, audio, and image inputs into a plain-text report")]
#[command(long_about = None)]
pub struct Cli {
    /// Free text for the report's text section
    #[arg(short = 't', long, value_name = "TEXT", conflicts_with = "text_file")]
    pub text: Option<String>,

    /// Read the text section from a file
    #[arg(long, value_name = "PATH")]
    pub text_file: Option<PathBuf>,

    /// Record audio from the default input device (e.g., 10s, 1m, 2m30s)
    #[arg(short = 'r', long, value_name = "TIME", conflicts_with = "audio")]
    pub record: Option<String>,

    /// Attach an audio file
    #[arg(short = 'a', long, value_name = "PATH")]
    pub audio: Option<PathBuf>,

    /// Attach an image file
    #[arg(short = 'i', long, value_name = "PATH")]
    pub image: Option<PathBuf>,

    /// Generate a caption for the attached image
    #[arg(short = 'c', long)]
    pub caption: bool,

    /// Export format for the report file
    #[arg(short = 'f', long, value_name = "FORMAT")]
    pub format: Option<FormatArg>,

    /// Output directory for the exported report
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Captioning model override
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Export format argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Txt,
    Pdf,
    Docx,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Txt => ExportFormat::Text,
            FormatArg::Pdf => ExportFormat::Pdf,
            FormatArg::Docx => ExportFormat::Docx,
        }
    }
}

/// Parsed compose options
#[derive(Debug, Clone)]
pub struct ComposeOptions {
    pub text: Option<String>,
    pub text_file: Option<PathBuf>,
    pub record: Option<Duration>,
    pub audio: Option<PathBuf>,
    pub image: Option<PathBuf>,
    pub caption: bool,
    pub format: ExportFormat,
    pub output_dir: PathBuf,
    pub model: String,
    pub api_key: Option<String>,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &["api_key", "model", "output_dir", "format"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
