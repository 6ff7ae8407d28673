// ディレクトリベースのDTMIリゾルバー
//
// DTDLモデルリポジトリの規約に従い、DTMIをファイルパスへ変換して読み込みます。
// 例: `dtmi:com:example:Thermostat;1` → `<root>/dtmi/com/example/thermostat-1.json`

use crate::adapters::log_sink::LogSink;
use crate::core::model::Dtmi;
use crate::services::file_loader::strip_bom;
use crate::services::resolver::{log_missing, DtmiResolver};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// ディレクトリからモデルを探すリゾルバー
#[derive(Clone)]
pub struct DirectoryResolver {
    root: PathBuf,
    sink: Arc<dyn LogSink>,
}

impl DirectoryResolver {
    pub fn new(root: PathBuf, sink: Arc<dyn LogSink>) -> Self {
        Self { root, sink }
    }

    /// DTMIに対応するモデルファイルのパス
    pub fn path_for(&self, dtmi: &Dtmi) -> PathBuf {
        let relative = dtmi.as_str().to_lowercase().replace(':', "/").replace(';', "-");
        self.root.join(format!("{}.json", relative))
    }
}

#[async_trait]
impl DtmiResolver for DirectoryResolver {
    async fn resolve(&self, missing: &[Dtmi]) -> Option<Vec<String>> {
        let mut texts = Vec::new();
        let mut unresolved = Vec::new();

        for dtmi in missing {
            let path = self.path_for(dtmi);
            match tokio::fs::read_to_string(&path).await {
                Ok(text) => {
                    debug!(dtmi = %dtmi, path = %path.display(), "Resolved model from directory");
                    texts.push(strip_bom(text));
                }
                Err(e) => {
                    debug!(dtmi = %dtmi, path = %path.display(), error = %e, "Model not found in directory");
                    unresolved.push(dtmi.clone());
                }
            }
        }

        // 残りは次の呼び出しで再度問い合わせられる
        if texts.is_empty() {
            log_missing(self.sink.as_ref(), &unresolved);
            None
        } else {
            Some(texts)
        }
    }
}
