use anyhow::{Context, Result};
use clap::Parser;
use colored::control as color_control;
use dtdl_validator::adapters::directory_resolver::DirectoryResolver;
use dtdl_validator::adapters::log_sink::{ConsoleSink, LogSink};
use dtdl_validator::cli::commands::validate::{ValidateCommand, ValidateCommandHandler};
use dtdl_validator::cli::Cli;
use dtdl_validator::core::config::OutputFormat;
use dtdl_validator::core::error::CliParseError;
use dtdl_validator::core::outcome::ExitStatus;
use dtdl_validator::services::dtdl_parser::DtdlModelParser;
use dtdl_validator::services::reporter::ReporterService;
use dtdl_validator::services::resolver::{DtmiResolver, NullResolver};
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() {
    // CLIをパース（ヘルプ・バージョン表示はclapに任せる）
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if CliParseError::is_informational(&e) => e.exit(),
        Err(e) => {
            ReporterService::default()
                .report_cli_error(&CliParseError::from(&e), &ConsoleSink::new());
            process::exit(ExitStatus::CliParseError.code());
        }
    };

    init_tracing(cli.verbose);

    match run(cli) {
        Ok(status) => process::exit(status.code()),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// 診断ログの初期化（RUST_LOGが優先）
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// 検証を実行して終了ステータスを返す
fn run(cli: Cli) -> Result<ExitStatus> {
    // --no-color フラグの処理
    if cli.no_color {
        color_control::set_override(false);
    }

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            ReporterService::default().report_cli_error(&e, &ConsoleSink::new());
            return Ok(ExitStatus::CliParseError);
        }
    };

    // JSON出力時は進捗メッセージで標準出力を汚さない
    let sink: Arc<dyn LogSink> = match config.format {
        OutputFormat::Text => Arc::new(ConsoleSink::new()),
        OutputFormat::Json => Arc::new(ConsoleSink::without_progress()),
    };

    let resolver: Arc<dyn DtmiResolver> = match &config.resolve_dir {
        Some(dir) => Arc::new(DirectoryResolver::new(dir.clone(), sink.clone())),
        None => Arc::new(NullResolver::new(sink.clone())),
    };

    let reporter = ReporterService::new(config.report_mode, config.format);
    let handler =
        ValidateCommandHandler::new(Arc::new(DtdlModelParser::new()), resolver, sink.clone());
    let command = ValidateCommand { config };

    // パーサーの非同期エントリーポイントを同期的に待機する
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;
    let outcome = runtime.block_on(handler.execute(&command));

    reporter.report(&outcome, sink.as_ref());

    Ok(outcome.exit_status())
}
