// validateコマンドハンドラー
//
// モデル検証パイプラインを実装します。
// - 入力ファイルの収集と読み込み
// - JSON構文の事前チェック（全ファイル分のエラーを集約）
// - モデルパーサーによる検証（未解決参照はリゾルバーへ委譲）
// 各ステージは失敗した時点で以降を実行せず、結果をValidationOutcomeとして返します。

use crate::adapters::input_scanner::InputScanner;
use crate::adapters::log_sink::LogSink;
use crate::core::config::Config;
use crate::core::error::StageError;
use crate::core::outcome::ValidationOutcome;
use crate::services::file_loader::FileLoaderService;
use crate::services::model_parser::ModelParser;
use crate::services::resolver::DtmiResolver;
use crate::services::syntax_checker::SyntaxCheckerService;
use std::sync::Arc;
use tracing::{debug, info};

/// validateコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct ValidateCommand {
    /// 実行設定
    pub config: Config,
}

/// validateコマンドハンドラー
#[derive(Clone)]
pub struct ValidateCommandHandler {
    parser: Arc<dyn ModelParser>,
    resolver: Arc<dyn DtmiResolver>,
    sink: Arc<dyn LogSink>,
}

impl ValidateCommandHandler {
    /// 新しいValidateCommandHandlerを作成
    ///
    /// # Arguments
    ///
    /// * `parser` - モデルの意味検証を行うパーサー
    /// * `resolver` - 未解決DTMIのリゾルバー
    /// * `sink` - ユーザー向けメッセージの出力先
    pub fn new(
        parser: Arc<dyn ModelParser>,
        resolver: Arc<dyn DtmiResolver>,
        sink: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            parser,
            resolver,
            sink,
        }
    }

    /// validateコマンドを実行
    ///
    /// パイプラインの失敗はエラーではなく結果として返します。
    pub async fn execute(&self, command: &ValidateCommand) -> ValidationOutcome {
        match self.run(&command.config).await {
            Ok(entity_count) => ValidationOutcome::Success { entity_count },
            Err(e) => {
                debug!(error = %e, "Validation pipeline stopped");
                e.into()
            }
        }
    }

    async fn run(&self, config: &Config) -> Result<usize, StageError> {
        if config.interactive {
            debug!("Interactive mode is reserved and has no effect");
        }

        let paths = InputScanner::new().collect(config)?;
        info!(files = paths.len(), "Loading model files");

        let files = FileLoaderService::new().load(&paths, self.sink.as_ref())?;

        SyntaxCheckerService::new().check(&files)?;
        self.sink
            .ok("Validated JSON for all files - now validating DTDL");

        debug!(parser = %self.parser.describe(), "Invoking model parser");
        let entities = self
            .parser
            .parse(files.texts(), self.resolver.as_ref())
            .await?;

        Ok(entities.len())
    }
}
