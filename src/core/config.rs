// 実行設定
//
// コマンドライン引数から一度だけ構築され、プロセスの生存期間中は不変です。
// 設定ファイルや環境変数は使用しません。

use clap::ValueEnum;
use std::path::PathBuf;

/// モデルエラーの出力方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportMode {
    /// Print only the first model error
    First,
    /// Print every model error (default)
    #[default]
    All,
}

/// 出力フォーマット
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// Structured JSON output
    Json,
}

/// ディレクトリ入力の指定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryInput {
    /// 走査するディレクトリ
    pub path: PathBuf,
    /// 対象ファイルの拡張子（先頭の`.`は含まない）
    pub extension: String,
    /// サブディレクトリも走査するかどうか
    pub recursive: bool,
}

impl DirectoryInput {
    /// 新しいディレクトリ入力を作成
    ///
    /// 拡張子の先頭に`.`が付いていれば取り除きます。
    pub fn new(path: PathBuf, extension: &str, recursive: bool) -> Self {
        Self {
            path,
            extension: extension.trim_start_matches('.').to_string(),
            recursive,
        }
    }
}

/// 検証の実行設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `-f`で指定された入力ファイル（指定順）
    pub file_paths: Vec<PathBuf>,
    /// `-d`で指定された入力ディレクトリ
    pub directory: Option<DirectoryInput>,
    /// 対話モード（予約済み、現在は未使用）
    pub interactive: bool,
    /// モデルエラーの出力方式
    pub report_mode: ReportMode,
    /// 出力フォーマット
    pub format: OutputFormat,
    /// 未解決DTMIを探索するディレクトリ
    pub resolve_dir: Option<PathBuf>,
}

impl Config {
    /// ディレクトリ走査時のデフォルト拡張子
    pub const DEFAULT_EXTENSION: &'static str = "json";

    /// ファイルリストから設定を作成（その他はデフォルト値）
    pub fn with_files(file_paths: Vec<PathBuf>) -> Self {
        Self {
            file_paths,
            directory: None,
            interactive: false,
            report_mode: ReportMode::default(),
            format: OutputFormat::default(),
            resolve_dir: None,
        }
    }

    /// 入力元が一つも指定されていないかどうか
    pub fn has_no_inputs(&self) -> bool {
        self.file_paths.is_empty() && self.directory.is_none()
    }
}
