// 検証結果
//
// 一回の実行結果を表す直和型と、結果ごとの終了コード。

use crate::core::error::{ParserError, StageError};
use crate::core::model::ModelError;
use serde::Serialize;

/// JSON構文エラー1件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxIssue {
    /// ファイルパス
    pub path: String,
    /// JSONパーサーのメッセージ
    pub message: String,
}

/// 検証パイプラインの結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationOutcome {
    /// すべての検証に成功
    Success { entity_count: usize },
    /// JSON構文エラー（全ファイル分）
    SyntaxErrors { errors: Vec<SyntaxIssue> },
    /// モデル検証エラー
    ModelErrors { errors: Vec<ModelError> },
    /// 外部参照の解決失敗
    ResolutionFailure { missing: Vec<String> },
    /// ファイル読み込み失敗
    IoFailure {
        last_attempted_path: String,
        message: String,
    },
}

impl ValidationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ValidationOutcome::Success { .. })
    }

    /// 結果に対応する終了コード
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            ValidationOutcome::Success { .. } => ExitStatus::Success,
            ValidationOutcome::SyntaxErrors { .. } => ExitStatus::SyntaxErrors,
            ValidationOutcome::ModelErrors { .. } => ExitStatus::ModelErrors,
            ValidationOutcome::ResolutionFailure { .. } => ExitStatus::ResolutionFailure,
            ValidationOutcome::IoFailure { .. } => ExitStatus::IoFailure,
        }
    }
}

impl From<StageError> for ValidationOutcome {
    fn from(err: StageError) -> Self {
        match err {
            StageError::Io { path, message } => ValidationOutcome::IoFailure {
                last_attempted_path: path,
                message,
            },
            StageError::Syntax(errors) => ValidationOutcome::SyntaxErrors { errors },
            StageError::Parser(ParserError::Parsing(errors)) => {
                ValidationOutcome::ModelErrors { errors }
            }
            StageError::Parser(ParserError::Resolution(missing)) => {
                ValidationOutcome::ResolutionFailure {
                    missing: missing.iter().map(|d| d.to_string()).collect(),
                }
            }
        }
    }
}

/// プロセスの終了コード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    CliParseError,
    IoFailure,
    SyntaxErrors,
    ModelErrors,
    ResolutionFailure,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::CliParseError => 2,
            ExitStatus::IoFailure => 3,
            ExitStatus::SyntaxErrors => 4,
            ExitStatus::ModelErrors => 5,
            ExitStatus::ResolutionFailure => 6,
        }
    }
}
