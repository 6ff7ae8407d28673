// DTMIリゾルバー
//
// モデルパーサーが投入テキスト内に見つからないDTMIに遭遇したときに呼び出される
// コールバック。追加のモデルテキストを返すか、解決不能（None）を返します。

use crate::adapters::log_sink::LogSink;
use crate::core::model::Dtmi;
use async_trait::async_trait;
use std::sync::Arc;

/// 未解決DTMIのリゾルバー
#[async_trait]
pub trait DtmiResolver: Send + Sync {
    /// 未解決のDTMIに対して追加のモデルテキストを返す
    ///
    /// 解決できない場合は`None`を返します。
    async fn resolve(&self, missing: &[Dtmi]) -> Option<Vec<String>>;
}

/// 常に解決不能を返すリゾルバー
///
/// 未解決のDTMIをログに出力します。
#[derive(Clone)]
pub struct NullResolver {
    sink: Arc<dyn LogSink>,
}

impl NullResolver {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }
}

/// 未解決DTMIの一覧をシンクへ出力
pub(crate) fn log_missing(sink: &dyn LogSink, missing: &[Dtmi]) {
    sink.error("*** Error parsing models. Missing:");
    for dtmi in missing {
        sink.error(&format!("  {}", dtmi));
    }
}

#[async_trait]
impl DtmiResolver for NullResolver {
    async fn resolve(&self, missing: &[Dtmi]) -> Option<Vec<String>> {
        log_missing(self.sink.as_ref(), missing);
        None
    }
}
