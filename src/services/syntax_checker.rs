// JSON構文チェッカーサービス
//
// ドメインスキーマとは無関係に、各ファイルが汎用JSONとして解析できるかを確認します。
// 最初の失敗で止めず、全ファイルを評価してエラーを集約します。

use crate::core::error::StageError;
use crate::core::model::LoadedFiles;
use crate::core::outcome::SyntaxIssue;
use tracing::debug;

/// JSON構文チェッカーサービス
#[derive(Debug, Clone, Default)]
pub struct SyntaxCheckerService {}

impl SyntaxCheckerService {
    /// 新しいSyntaxCheckerServiceを作成
    pub fn new() -> Self {
        Self {}
    }

    /// 全ファイルのJSON構文をチェック
    ///
    /// # Errors
    ///
    /// 1件以上のファイルが不正な場合、全件分の`SyntaxIssue`を持つ`StageError::Syntax`
    pub fn check(&self, files: &LoadedFiles) -> Result<(), StageError> {
        let issues: Vec<SyntaxIssue> = files
            .iter()
            .filter_map(|file| {
                serde_json::from_str::<serde_json::Value>(&file.raw_content)
                    .err()
                    .map(|e| {
                        debug!(path = %file.path.display(), error = %e, "Invalid JSON");
                        SyntaxIssue {
                            path: file.path.display().to_string(),
                            message: e.to_string(),
                        }
                    })
            })
            .collect();

        if issues.is_empty() {
            Ok(())
        } else {
            Err(StageError::Syntax(issues))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::InputFile;
    use std::path::PathBuf;

    fn files(entries: &[(&str, &str)]) -> LoadedFiles {
        let mut files = LoadedFiles::new();
        for (path, content) in entries {
            files.push(InputFile::new(PathBuf::from(path), content.to_string()));
        }
        files
    }

    #[test]
    fn test_all_valid() {
        let files = files(&[("a.json", "{}"), ("b.json", "[1, 2, 3]"), ("c.json", "\"s\"")]);
        assert!(SyntaxCheckerService::new().check(&files).is_ok());
    }

    #[test]
    fn test_reports_every_invalid_file() {
        let files = files(&[
            ("broken-1.json", "{not valid}"),
            ("ok.json", "{}"),
            ("broken-2.json", "[1, 2"),
            ("empty.json", ""),
        ]);

        let err = SyntaxCheckerService::new().check(&files).unwrap_err();
        let StageError::Syntax(issues) = err else {
            panic!("Expected Syntax error");
        };

        let paths: Vec<_> = issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["broken-1.json", "broken-2.json", "empty.json"]);
        assert!(issues.iter().all(|i| !i.message.is_empty()));
    }

    #[test]
    fn test_single_broken_file() {
        let files = files(&[("broken.json", "{not valid}")]);

        let err = SyntaxCheckerService::new().check(&files).unwrap_err();
        match err {
            StageError::Syntax(issues) => {
                assert_eq!(issues.len(), 1);
                assert_eq!(issues[0].path, "broken.json");
                assert!(issues[0].message.contains("line 1"));
            }
            other => panic!("Expected Syntax error, got {:?}", other),
        }
    }
}
