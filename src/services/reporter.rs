// 結果出力サービス
//
// 検証結果をコンソール向けに整形してシンクへ出力します。

use crate::adapters::log_sink::LogSink;
use crate::core::config::{OutputFormat, ReportMode};
use crate::core::error::CliParseError;
use crate::core::model::ModelError;
use crate::core::outcome::{SyntaxIssue, ValidationOutcome};

const BANNER_RULE: &str = "**********************************************";
const BANNER_TEXT: &str = "** Validated all files - Your DTDL is valid **";

/// 結果出力サービス
#[derive(Debug, Clone, Copy, Default)]
pub struct ReporterService {
    report_mode: ReportMode,
    format: OutputFormat,
}

impl ReporterService {
    /// 新しいReporterServiceを作成
    pub fn new(report_mode: ReportMode, format: OutputFormat) -> Self {
        Self {
            report_mode,
            format,
        }
    }

    /// 検証結果を出力
    pub fn report(&self, outcome: &ValidationOutcome, sink: &dyn LogSink) {
        match self.format {
            OutputFormat::Text => self.report_text(outcome, sink),
            OutputFormat::Json => self.report_json(outcome, sink),
        }
    }

    /// コマンドライン解析エラーを出力
    pub fn report_cli_error(&self, error: &CliParseError, sink: &dyn LogSink) {
        sink.error(&error.to_string());
        for issue in &error.issues {
            sink.error(&issue.to_string());
        }
    }

    fn report_text(&self, outcome: &ValidationOutcome, sink: &dyn LogSink) {
        match outcome {
            ValidationOutcome::Success { entity_count } => {
                sink.out("");
                sink.ok(BANNER_RULE);
                sink.ok(BANNER_TEXT);
                sink.ok(BANNER_RULE);
                sink.out(&format!("Found a total of {} entities", entity_count));
            }
            ValidationOutcome::SyntaxErrors { errors } => self.report_syntax_errors(errors, sink),
            ValidationOutcome::ModelErrors { errors } => self.report_model_errors(errors, sink),
            ValidationOutcome::ResolutionFailure { .. } => {
                sink.error("Could not resolve required references");
            }
            ValidationOutcome::IoFailure {
                last_attempted_path,
                message,
            } => {
                sink.error(&format!(
                    "Could not read files. \nLast file read: {}\nError: \n{}",
                    last_attempted_path, message
                ));
            }
        }
    }

    fn report_syntax_errors(&self, errors: &[SyntaxIssue], sink: &dyn LogSink) {
        for issue in errors {
            sink.error(&format!(
                "Invalid json found in file {}.\nJson parser error \n{}",
                issue.path, issue.message
            ));
        }
        sink.error(&format!("\nFound {} Json parsing errors", errors.len()));
    }

    fn report_model_errors(&self, errors: &[ModelError], sink: &dyn LogSink) {
        sink.error("*** Error parsing models");

        let shown = match self.report_mode {
            ReportMode::First => errors.len().min(1),
            ReportMode::All => errors.len(),
        };

        for (index, error) in errors.iter().take(shown).enumerate() {
            sink.error(&format!("Error {}:", index + 1));
            sink.error(&error.message);
            sink.error(&format!(
                "Primary ID: {}",
                error.primary_id.as_deref().unwrap_or_default()
            ));
            sink.error(&format!(
                "Secondary ID: {}",
                error.secondary_id.as_deref().unwrap_or_default()
            ));
            sink.error(&format!(
                "Property: {}\n",
                error.property.as_deref().unwrap_or_default()
            ));
        }

        let hidden = errors.len() - shown;
        if hidden > 0 {
            sink.error(&format!(
                "{} more error(s) not shown (use --report-mode all to print every error)",
                hidden
            ));
        }
    }

    fn report_json(&self, outcome: &ValidationOutcome, sink: &dyn LogSink) {
        match serde_json::to_string_pretty(outcome) {
            Ok(json) => sink.out(&json),
            Err(e) => sink.error(&format!("Failed to serialize result: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::log_sink::{LogLevel, MemorySink};

    fn two_model_errors() -> ValidationOutcome {
        ValidationOutcome::ModelErrors {
            errors: vec![
                ModelError::new("first problem")
                    .with_primary("dtmi:com:example:A;1")
                    .with_property("name"),
                ModelError::new("second problem").with_secondary("dtmi:com:example:B;1"),
            ],
        }
    }

    #[test]
    fn test_success_banner_and_count() {
        let sink = MemorySink::new();
        ReporterService::default().report(&ValidationOutcome::Success { entity_count: 7 }, &sink);

        assert_eq!(sink.messages(LogLevel::Ok), vec![BANNER_RULE, BANNER_TEXT, BANNER_RULE]);
        assert_eq!(
            sink.messages(LogLevel::Out),
            vec!["", "Found a total of 7 entities"]
        );
    }

    #[test]
    fn test_model_errors_all() {
        let sink = MemorySink::new();
        ReporterService::new(ReportMode::All, OutputFormat::Text).report(&two_model_errors(), &sink);

        let text = sink.text();
        assert!(text.contains("*** Error parsing models"));
        assert!(text.contains("Error 1:"));
        assert!(text.contains("Error 2:"));
        assert!(text.contains("Primary ID: dtmi:com:example:A;1"));
        assert!(text.contains("Secondary ID: dtmi:com:example:B;1"));
        assert!(!text.contains("not shown"));
    }

    #[test]
    fn test_model_errors_first_only() {
        // 最初のエラーのみを出力する従来の挙動
        let sink = MemorySink::new();
        ReporterService::new(ReportMode::First, OutputFormat::Text)
            .report(&two_model_errors(), &sink);

        let text = sink.text();
        assert!(text.contains("Error 1:"));
        assert!(text.contains("first problem"));
        assert!(!text.contains("Error 2:"));
        assert!(!text.contains("second problem"));
        assert!(text.contains("1 more error(s) not shown"));
    }

    #[test]
    fn test_syntax_errors() {
        let sink = MemorySink::new();
        let outcome = ValidationOutcome::SyntaxErrors {
            errors: vec![
                SyntaxIssue {
                    path: "a.json".to_string(),
                    message: "expected value at line 1 column 1".to_string(),
                },
                SyntaxIssue {
                    path: "b.json".to_string(),
                    message: "EOF while parsing".to_string(),
                },
            ],
        };
        ReporterService::default().report(&outcome, &sink);

        let errors = sink.messages(LogLevel::Error);
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("Invalid json found in file a.json."));
        assert!(errors[1].contains("b.json"));
        assert!(errors[2].contains("Found 2 Json parsing errors"));
    }

    #[test]
    fn test_resolution_and_io_failures() {
        let sink = MemorySink::new();
        let reporter = ReporterService::default();
        reporter.report(
            &ValidationOutcome::ResolutionFailure {
                missing: vec!["dtmi:com:example:X;1".to_string()],
            },
            &sink,
        );
        reporter.report(
            &ValidationOutcome::IoFailure {
                last_attempted_path: "gone.json".to_string(),
                message: "No such file or directory".to_string(),
            },
            &sink,
        );

        let errors = sink.messages(LogLevel::Error);
        assert_eq!(errors[0], "Could not resolve required references");
        assert!(errors[1].contains("Last file read: gone.json"));
        assert!(errors[1].contains("No such file or directory"));
    }

    #[test]
    fn test_json_format() {
        let sink = MemorySink::new();
        ReporterService::new(ReportMode::First, OutputFormat::Json).report(&two_model_errors(), &sink);

        let out = sink.messages(LogLevel::Out);
        assert_eq!(out.len(), 1);
        let value: serde_json::Value = serde_json::from_str(&out[0]).unwrap();
        assert_eq!(value["status"], "model_errors");
        assert_eq!(value["errors"].as_array().unwrap().len(), 2);
        assert_eq!(value["errors"][0]["property"], "name");
    }

    #[test]
    fn test_cli_error() {
        let sink = MemorySink::new();
        ReporterService::default().report_cli_error(&CliParseError::no_inputs(), &sink);

        let errors = sink.messages(LogLevel::Error);
        assert_eq!(errors[0], "Invalid command line.");
        assert!(errors[1].starts_with("MissingRequiredOption:"));
    }
}
