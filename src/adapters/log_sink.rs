// ログ出力先の抽象化
//
// ユーザー向けのコンソール出力を各ステージへ注入するためのトレイト。
// バイナリではConsoleSink、テストではMemorySinkを使用します。

use colored::Colorize;
use std::sync::Mutex;

/// ユーザー向けメッセージの出力先
pub trait LogSink: Send + Sync {
    /// 成功メッセージ
    fn ok(&self, message: &str);

    /// エラーメッセージ
    fn error(&self, message: &str);

    /// 装飾なしの出力
    fn out(&self, message: &str);
}

/// コンソールへの出力
///
/// `ok`と`out`は標準出力、`error`は標準エラー出力へ書き込みます。
#[derive(Debug, Clone)]
pub struct ConsoleSink {
    show_progress: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            show_progress: true,
        }
    }

    /// 進捗メッセージ（`ok`）を出力しないシンク
    ///
    /// JSON出力時に標準出力を汚さないために使用します。
    pub fn without_progress() -> Self {
        Self {
            show_progress: false,
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for ConsoleSink {
    fn ok(&self, message: &str) {
        if self.show_progress {
            println!("{}", message.green());
        }
    }

    fn error(&self, message: &str) {
        eprintln!("{}", message.red());
    }

    fn out(&self, message: &str) {
        println!("{}", message);
    }
}

/// メッセージのレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Ok,
    Error,
    Out,
}

/// 記録された1行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub level: LogLevel,
    pub message: String,
}

/// メモリ上にメッセージを記録するシンク（テスト用）
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<LogLine>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 記録済みの全行
    pub fn lines(&self) -> Vec<LogLine> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// 指定レベルのメッセージのみ
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.level == level)
            .map(|line| line.message)
            .collect()
    }

    /// 全メッセージを改行で連結したテキスト
    pub fn text(&self) -> String {
        self.lines()
            .into_iter()
            .map(|line| line.message)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// いずれかのメッセージが指定文字列を含むかどうか
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.message.contains(needle))
    }

    fn record(&self, level: LogLevel, message: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(LogLine {
                level,
                message: message.to_string(),
            });
    }
}

impl LogSink for MemorySink {
    fn ok(&self, message: &str) {
        self.record(LogLevel::Ok, message);
    }

    fn error(&self, message: &str) {
        self.record(LogLevel::Error, message);
    }

    fn out(&self, message: &str) {
        self.record(LogLevel::Out, message);
    }
}
