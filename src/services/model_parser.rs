// モデルパーサーの境界
//
// 意味的な検証はすべてこのトレイトの実装に委譲します。
// パイプラインは投入テキストとリゾルバーを渡して結果を待つだけです。

use crate::core::error::ParserError;
use crate::core::model::{Dtmi, EntityInfo};
use crate::services::resolver::DtmiResolver;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// パーサーが返すエンティティの対応表
pub type EntityMap = BTreeMap<Dtmi, EntityInfo>;

/// モデルパーサー
#[async_trait]
pub trait ModelParser: Send + Sync {
    /// モデルテキストを解析・検証する
    ///
    /// # Arguments
    ///
    /// * `texts` - 生のモデルテキスト（入力順）
    /// * `resolver` - 投入テキスト内に見つからないDTMIの解決に使うコールバック
    ///
    /// # Returns
    ///
    /// 発見したエンティティの識別子とその情報
    ///
    /// # Errors
    ///
    /// - `ParserError::Parsing` - モデルの検証エラー
    /// - `ParserError::Resolution` - 外部参照を解決できなかった
    async fn parse(
        &self,
        texts: Vec<String>,
        resolver: &dyn DtmiResolver,
    ) -> Result<EntityMap, ParserError>;

    /// パーサーの名前とバージョン（診断ログ用）
    fn describe(&self) -> String;
}
