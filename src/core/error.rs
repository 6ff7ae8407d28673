// エラー型定義
//
// アプリケーション全体で使用されるカスタムエラー型を提供します。
// thiserrorを使用して、CliParseError, DtmiError, ParserError, StageError を定義します。

use crate::core::model::{Dtmi, ModelError};
use crate::core::outcome::SyntaxIssue;
use clap::error::{ContextKind, ErrorKind};
use thiserror::Error;

/// コマンドライン引数の問題1件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliIssue {
    /// 問題の種類
    pub tag: String,
    /// 問題のあるトークン（特定できない場合はNone）
    pub token: Option<String>,
    /// 人間向けの原因説明
    pub cause: String,
}

impl std::fmt::Display for CliIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.token {
            Some(token) => write!(f, "{}: '{}' {}", self.tag, token, self.cause),
            None => write!(f, "{}: {}", self.tag, self.cause),
        }
    }
}

/// コマンドライン解析エラー
///
/// 不正なトークンごとに原因を列挙します。
#[derive(Debug, Clone, Error)]
#[error("Invalid command line.")]
pub struct CliParseError {
    /// 問題のリスト
    pub issues: Vec<CliIssue>,
}

impl CliParseError {
    /// 入力ファイルが指定されていない場合のエラー
    pub fn no_inputs() -> Self {
        Self {
            issues: vec![CliIssue {
                tag: "MissingRequiredOption".to_string(),
                token: None,
                cause: "no input files were specified (use --files or --directory)".to_string(),
            }],
        }
    }
}

impl From<&clap::Error> for CliParseError {
    fn from(err: &clap::Error) -> Self {
        let tag = format!("{:?}", err.kind());
        let cause = err
            .kind()
            .as_str()
            .unwrap_or("invalid arguments")
            .to_string();

        let tokens: Vec<String> = [ContextKind::InvalidArg, ContextKind::InvalidValue]
            .into_iter()
            .filter_map(|kind| err.get(kind))
            .map(|value| value.to_string())
            .filter(|value| !value.is_empty())
            .collect();

        let issues = if tokens.is_empty() {
            vec![CliIssue {
                tag,
                token: None,
                cause,
            }]
        } else {
            tokens
                .into_iter()
                .map(|token| CliIssue {
                    tag: tag.clone(),
                    token: Some(token),
                    cause: cause.clone(),
                })
                .collect()
        };

        Self { issues }
    }
}

impl CliParseError {
    /// clapのエラーが引数の誤りではなくヘルプ/バージョン表示かどうか
    ///
    /// 引数なしで起動した場合のヘルプ表示も含みます。
    pub fn is_informational(err: &clap::Error) -> bool {
        matches!(
            err.kind(),
            ErrorKind::DisplayHelp
                | ErrorKind::DisplayVersion
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        )
    }
}

/// DTMIの構文エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DtmiError {
    #[error("'{value}' is not a valid DTMI")]
    Invalid { value: String },
}

/// モデルパーサーのエラー
///
/// パーサーは構造化された検証エラー、または参照解決の失敗のどちらかで失敗します。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParserError {
    /// モデルの検証エラー
    #[error("{} model error(s) found", .0.len())]
    Parsing(Vec<ModelError>),

    /// 外部参照を解決できなかった
    #[error("Could not resolve {} required reference(s)", .0.len())]
    Resolution(Vec<Dtmi>),
}

/// パイプラインのステージエラー
///
/// いずれのステージも失敗した時点で実行を打ち切ります。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    /// ファイルの読み込み失敗
    #[error("Could not read file {path}: {message}")]
    Io { path: String, message: String },

    /// JSON構文エラー（全ファイル分を集約）
    #[error("Found {} Json parsing error(s)", .0.len())]
    Syntax(Vec<SyntaxIssue>),

    /// モデル解析の失敗
    #[error(transparent)]
    Parser(#[from] ParserError),
}
