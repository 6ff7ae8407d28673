// CLI Layer
// ユーザー入力の受付と実行設定への変換

pub mod commands;

use crate::core::config::{Config, DirectoryInput, OutputFormat, ReportMode};
use crate::core::error::CliParseError;
use clap::{ArgAction, ArgGroup, Parser};
use std::path::PathBuf;

/// DTDL Validator - Digital twin model validation CLI
///
/// Checks that model files are well-formed JSON and then validates them
/// as DTDL models.
#[derive(Parser, Debug)]
#[command(name = "dtdl-validator")]
#[command(author = "DTDL Validator Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Validate DTDL digital twin model files")]
#[command(long_about = "DTDL Validator - Digital twin model validation CLI

Reads model definition files, checks that every file is well-formed JSON,
and then validates the full set of models together:
  • Interface identifiers (DTMI), types and contexts
  • Contents elements and their names
  • References between models (extends, component schemas, relationship targets)

Models referenced but not supplied can be looked up in a model repository
directory with --resolve-dir.")]
#[command(arg_required_else_help = true)]
#[command(group(ArgGroup::new("mode").args(["interactive"]).multiple(false)))]
#[command(after_help = "EXAMPLES:
  # Validate two model files
  dtdl-validator -f thermostat.json -f room.json

  # Validate every .json file below a directory
  dtdl-validator -d ./models -r

  # Resolve missing references from a model repository
  dtdl-validator -f room.json --resolve-dir ./repository

EXIT CODES:
  0 success, 2 invalid command line, 3 file read failure,
  4 JSON syntax errors, 5 model errors, 6 unresolved references")]
pub struct Cli {
    /// Input files to be processed. If -d option is also specified, these files are read in addition.
    #[arg(short = 'f', long = "files", value_name = "FILE", num_args = 1.., action = ArgAction::Append)]
    pub files: Vec<PathBuf>,

    /// Directory to read model files from
    #[arg(short = 'd', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// File extension of model files in --directory
    #[arg(short = 'e', long, value_name = "EXT", default_value = Config::DEFAULT_EXTENSION)]
    pub extension: String,

    /// Search --directory recursively
    #[arg(short = 'r', long)]
    pub recursive: bool,

    /// Model repository directory used to resolve missing references
    #[arg(long, value_name = "DIR")]
    pub resolve_dir: Option<PathBuf>,

    /// Run in interactive mode
    #[arg(short = 'i', long)]
    pub interactive: bool,

    /// How many model errors to print
    #[arg(long, value_enum, default_value = "all")]
    pub report_mode: ReportMode,

    /// Output format (text or json)
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// 実行設定へ変換
    ///
    /// # Errors
    ///
    /// `-f`も`-d`も指定されていない場合は`CliParseError`
    pub fn into_config(self) -> Result<Config, CliParseError> {
        let directory = self
            .directory
            .map(|path| DirectoryInput::new(path, &self.extension, self.recursive));

        let config = Config {
            file_paths: self.files,
            directory,
            interactive: self.interactive,
            report_mode: self.report_mode,
            format: self.format,
            resolve_dir: self.resolve_dir,
        };

        if config.has_no_inputs() {
            return Err(CliParseError::no_inputs());
        }

        Ok(config)
    }
}
