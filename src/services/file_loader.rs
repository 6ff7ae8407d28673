// ファイルローダーサービス
//
// 入力ファイルを指定順にすべて読み込みます。
// 読み込めないファイルがあった時点で中断し、以降のファイルには触れません。
// 先頭のUTF-8 BOMは取り除きます。

use crate::adapters::log_sink::LogSink;
use crate::core::error::StageError;
use crate::core::model::{InputFile, LoadedFiles};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// ファイルローダーサービス
#[derive(Debug, Clone, Default)]
pub struct FileLoaderService {}

impl FileLoaderService {
    /// 新しいFileLoaderServiceを作成
    pub fn new() -> Self {
        Self {}
    }

    /// 指定されたファイルを順に読み込む
    ///
    /// # Arguments
    ///
    /// * `paths` - 読み込むファイルのパス（指定順）
    /// * `sink` - 成功メッセージの出力先
    ///
    /// # Returns
    ///
    /// 入力順を保持した読み込み済みファイル
    ///
    /// # Errors
    ///
    /// 最初に読み込めなかったファイルのパスとエラー内容を持つ`StageError::Io`
    pub fn load(&self, paths: &[PathBuf], sink: &dyn LogSink) -> Result<LoadedFiles, StageError> {
        let mut files = LoadedFiles::new();

        for path in paths {
            debug!(path = %path.display(), "Reading model file");
            let raw_content = fs::read_to_string(path).map_err(|e| StageError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            files.push(InputFile::new(path.clone(), strip_bom(raw_content)));
        }

        sink.ok(&format!(
            "Read {} files from specified directory",
            files.count()
        ));

        Ok(files)
    }
}

/// 先頭のUTF-8 BOMを取り除く
pub(crate) fn strip_bom(text: String) -> String {
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::log_sink::{LogLevel, MemorySink};
    use tempfile::TempDir;

    #[test]
    fn test_load_all_files_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.json");
        let b = temp_dir.path().join("b.json");
        fs::write(&a, "{\"a\": 1}").unwrap();
        fs::write(&b, "{\"b\": 2}").unwrap();

        let sink = MemorySink::new();
        let files = FileLoaderService::new()
            .load(&[b.clone(), a.clone()], &sink)
            .unwrap();

        assert_eq!(files.count(), 2);
        assert_eq!(files.texts(), vec!["{\"b\": 2}", "{\"a\": 1}"]);
        assert_eq!(
            sink.messages(LogLevel::Ok),
            vec!["Read 2 files from specified directory"]
        );
    }

    #[test]
    fn test_load_stops_at_first_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let present = temp_dir.path().join("present.json");
        let missing_first = temp_dir.path().join("missing-1.json");
        let missing_second = temp_dir.path().join("missing-2.json");
        fs::write(&present, "{}").unwrap();

        let sink = MemorySink::new();
        let err = FileLoaderService::new()
            .load(
                &[present, missing_first.clone(), missing_second],
                &sink,
            )
            .unwrap_err();

        match err {
            StageError::Io { path, message } => {
                assert_eq!(path, missing_first.display().to_string());
                assert!(!message.is_empty());
            }
            other => panic!("Expected Io error, got {:?}", other),
        }
        // 失敗時は成功メッセージを出力しない
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_load_rejects_non_utf8_content() {
        let temp_dir = TempDir::new().unwrap();
        let binary = temp_dir.path().join("binary.json");
        fs::write(&binary, [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let sink = MemorySink::new();
        let err = FileLoaderService::new().load(&[binary], &sink).unwrap_err();

        assert!(matches!(err, StageError::Io { .. }));
    }

    #[test]
    fn test_load_strips_byte_order_mark() {
        let temp_dir = TempDir::new().unwrap();
        let with_bom = temp_dir.path().join("bom.json");
        let mut bytes = vec![0xef, 0xbb, 0xbf];
        bytes.extend_from_slice(b"{\"@id\": \"dtmi:com:example:Bom;1\"}");
        fs::write(&with_bom, bytes).unwrap();

        let sink = MemorySink::new();
        let files = FileLoaderService::new().load(&[with_bom], &sink).unwrap();

        let texts = files.texts();
        assert_eq!(texts, vec!["{\"@id\": \"dtmi:com:example:Bom;1\"}"]);
        assert!(serde_json::from_str::<serde_json::Value>(&texts[0]).is_ok());
    }

    #[test]
    fn test_strip_bom_keeps_plain_text() {
        assert_eq!(strip_bom("{}".to_string()), "{}");
        assert_eq!(strip_bom("\u{feff}{}".to_string()), "{}");
    }

    #[test]
    fn test_load_no_files() {
        let sink = MemorySink::new();
        let files = FileLoaderService::new().load(&[], &sink).unwrap();

        assert!(files.is_empty());
        assert!(sink.contains("Read 0 files"));
    }
}
