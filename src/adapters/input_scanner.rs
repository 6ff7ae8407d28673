// 入力パスの収集
//
// `-f`で指定されたファイルに、`-d`で指定されたディレクトリ内の
// モデルファイルを追加します。ディレクトリ内はファイル名順に並べます。
// 同じファイルが複数回指定された場合は最初の1件だけを残します。

use crate::core::config::{Config, DirectoryInput};
use crate::core::error::StageError;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 入力パスの収集
#[derive(Debug, Clone, Default)]
pub struct InputScanner {}

impl InputScanner {
    pub fn new() -> Self {
        Self {}
    }

    /// 設定から入力ファイルのパスを収集
    ///
    /// `-f`のファイルが先、ディレクトリ内のファイルが後に並びます。
    /// 正規化したパスが同じファイルは最初に現れた位置で1回だけ含めます。
    ///
    /// # Errors
    ///
    /// ディレクトリが読み込めない場合は`StageError::Io`
    pub fn collect(&self, config: &Config) -> Result<Vec<PathBuf>, StageError> {
        let mut paths = config.file_paths.clone();

        if let Some(directory) = &config.directory {
            let found = self.scan_directory(directory)?;
            debug!(
                directory = %directory.path.display(),
                count = found.len(),
                "Scanned model directory"
            );
            paths.extend(found);
        }

        Ok(dedup_paths(paths))
    }

    /// ディレクトリ内の対象拡張子のファイルをスキャン
    pub fn scan_directory(&self, input: &DirectoryInput) -> Result<Vec<PathBuf>, StageError> {
        let mut files = Vec::new();
        self.scan_into(&input.path, input, &mut files)?;
        Ok(files)
    }

    fn scan_into(
        &self,
        dir: &Path,
        input: &DirectoryInput,
        files: &mut Vec<PathBuf>,
    ) -> Result<(), StageError> {
        let io_error = |e: std::io::Error| StageError::Io {
            path: dir.display().to_string(),
            message: e.to_string(),
        };

        let mut entries = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_error)? {
            entries.push(entry.map_err(io_error)?.path());
        }
        entries.sort();

        for path in entries {
            if path.is_dir() {
                if input.recursive {
                    self.scan_into(&path, input, files)?;
                }
            } else if has_extension(&path, &input.extension) {
                files.push(path);
            }
        }

        Ok(())
    }
}

/// 同一ファイルを指すパスを取り除く（順序は維持）
///
/// 正規化できないパス（存在しないファイルなど）はそのまま比較し、
/// 読み込み時のエラーに任せます。
fn dedup_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths
        .into_iter()
        .filter(|path| {
            let key = fs::canonicalize(path).unwrap_or_else(|_| path.clone());
            let keep = seen.insert(key);
            if !keep {
                debug!(path = %path.display(), "Skipping duplicate input path");
            }
            keep
        })
        .collect()
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}
