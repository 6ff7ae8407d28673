// モデル関連のドメイン型
//
// 入力ファイル、DTMI識別子、パーサーが発見したエンティティ、
// モデル検証エラーを定義します。

use crate::core::error::DtmiError;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;

/// 読み込み済みの入力ファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    /// ファイルパス
    pub path: PathBuf,
    /// ファイルの生テキスト
    pub raw_content: String,
}

impl InputFile {
    /// 新しい入力ファイルを作成
    pub fn new(path: PathBuf, raw_content: String) -> Self {
        Self { path, raw_content }
    }
}

/// 読み込み済みファイルの集合
///
/// 入力順序を保持します。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedFiles {
    files: Vec<InputFile>,
}

impl LoadedFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, file: InputFile) {
        self.files.push(file);
    }

    /// 読み込んだファイル数
    pub fn count(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputFile> {
        self.files.iter()
    }

    /// 生テキストのみを入力順に取り出す
    pub fn texts(&self) -> Vec<String> {
        self.files.iter().map(|f| f.raw_content.clone()).collect()
    }
}

// DTDL v2 のDTMI構文: セグメントは英字か、1個以上の`_`に英数字が続く形で始まる
const DTMI_PATTERN: &str = r"^dtmi:(?:_+[A-Za-z0-9]|[A-Za-z])(?:[A-Za-z0-9_]*[A-Za-z0-9])?(?::(?:_+[A-Za-z0-9]|[A-Za-z])(?:[A-Za-z0-9_]*[A-Za-z0-9])?)*;[1-9][0-9]{0,8}$";

fn dtmi_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DTMI_PATTERN).ok()).as_ref()
}

/// Digital Twin Model Identifier
///
/// `dtmi:<segment>(:<segment>)*;<version>` 形式の検証済み識別子。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Dtmi(String);

impl Dtmi {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// バージョンを除いた部分（`dtmi:com:example:Thermostat`）
    pub fn without_version(&self) -> &str {
        self.0.split_once(';').map_or(self.0.as_str(), |(path, _)| path)
    }

    /// バージョン番号
    pub fn version(&self) -> u32 {
        self.0
            .rsplit_once(';')
            .and_then(|(_, v)| v.parse().ok())
            .unwrap_or(1)
    }

    /// インターフェースの要素（contents）用の識別子を生成
    ///
    /// `dtmi:com:example:Thermostat;1` の要素 `temperature` は
    /// `dtmi:com:example:Thermostat:_contents:__temperature;1` になります。
    pub fn child(&self, element_name: &str) -> Result<Dtmi, DtmiError> {
        format!(
            "{}:_contents:__{};{}",
            self.without_version(),
            element_name,
            self.version()
        )
        .parse()
    }
}

impl FromStr for Dtmi {
    type Err = DtmiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if dtmi_regex().is_some_and(|re| re.is_match(s)) {
            Ok(Dtmi(s.to_string()))
        } else {
            Err(DtmiError::Invalid {
                value: s.to_string(),
            })
        }
    }
}

impl fmt::Display for Dtmi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// エンティティの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntityKind {
    Interface,
    Property,
    Telemetry,
    Command,
    Relationship,
    Component,
}

impl EntityKind {
    /// contents要素の`@type`からエンティティ種別を判定
    pub fn from_content_type(type_name: &str) -> Option<Self> {
        match type_name {
            "Property" => Some(EntityKind::Property),
            "Telemetry" => Some(EntityKind::Telemetry),
            "Command" => Some(EntityKind::Command),
            "Relationship" => Some(EntityKind::Relationship),
            "Component" => Some(EntityKind::Component),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Interface => "Interface",
            EntityKind::Property => "Property",
            EntityKind::Telemetry => "Telemetry",
            EntityKind::Command => "Command",
            EntityKind::Relationship => "Relationship",
            EntityKind::Component => "Component",
        };
        f.write_str(name)
    }
}

/// パーサーが発見したエンティティの情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityInfo {
    /// エンティティの識別子
    pub id: Dtmi,
    /// エンティティの種類
    pub kind: EntityKind,
    /// contents要素の名前（インターフェースの場合はNone）
    pub name: Option<String>,
    /// 定義元のインターフェース（インターフェース自身の場合はNone）
    pub defined_in: Option<Dtmi>,
}

impl EntityInfo {
    /// インターフェースのエンティティを作成
    pub fn interface(id: Dtmi) -> Self {
        Self {
            id,
            kind: EntityKind::Interface,
            name: None,
            defined_in: None,
        }
    }

    /// contents要素のエンティティを作成
    pub fn content(id: Dtmi, kind: EntityKind, name: String, parent: Dtmi) -> Self {
        Self {
            id,
            kind,
            name: Some(name),
            defined_in: Some(parent),
        }
    }
}

/// モデル検証エラー
///
/// パーサーが報告する構造化エラー。ID・プロパティはいずれも省略可能です。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModelError {
    /// エラーメッセージ
    pub message: String,
    /// 主たる識別子（エラーが発生したインターフェースなど）
    pub primary_id: Option<String>,
    /// 副次的な識別子（参照先や重複したIDなど）
    pub secondary_id: Option<String>,
    /// 問題のあるプロパティ名
    pub property: Option<String>,
}

impl ModelError {
    /// メッセージのみのエラーを作成
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_primary(mut self, id: impl Into<String>) -> Self {
        self.primary_id = Some(id.into());
        self
    }

    pub fn with_secondary(mut self, id: impl Into<String>) -> Self {
        self.secondary_id = Some(id.into());
        self
    }

    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(id) = &self.primary_id {
            write!(f, " (primary: {})", id)?;
        }
        if let Some(property) = &self.property {
            write!(f, " (property: {})", property)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtmi_parse_valid() {
        let dtmi: Dtmi = "dtmi:com:example:Thermostat;1".parse().unwrap();
        assert_eq!(dtmi.as_str(), "dtmi:com:example:Thermostat;1");
        assert_eq!(dtmi.without_version(), "dtmi:com:example:Thermostat");
        assert_eq!(dtmi.version(), 1);
    }

    #[test]
    fn test_dtmi_parse_invalid() {
        let cases = [
            "",
            "com:example:Thermostat;1",
            "dtmi:com:example:Thermostat",
            "dtmi:com:example:Thermostat;0",
            "dtmi:com:example:Thermo-stat;1",
            "dtmi:com:example:Thermostat_;1",
            "dtmi:1com:example;1",
        ];
        for case in cases {
            assert!(case.parse::<Dtmi>().is_err(), "expected invalid: {}", case);
        }
    }

    #[test]
    fn test_dtmi_child_id() {
        let parent: Dtmi = "dtmi:com:example:Thermostat;2".parse().unwrap();
        let child = parent.child("targetTemperature").unwrap();
        assert_eq!(
            child.as_str(),
            "dtmi:com:example:Thermostat:_contents:__targetTemperature;2"
        );
    }

    #[test]
    fn test_loaded_files_preserve_order() {
        let mut files = LoadedFiles::new();
        files.push(InputFile::new(PathBuf::from("b.json"), "{}".to_string()));
        files.push(InputFile::new(PathBuf::from("a.json"), "[]".to_string()));

        assert_eq!(files.count(), 2);
        assert_eq!(files.texts(), vec!["{}".to_string(), "[]".to_string()]);
        let paths: Vec<_> = files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("b.json"), PathBuf::from("a.json")]);
    }

    #[test]
    fn test_model_error_builder() {
        let err = ModelError::new("Missing schema")
            .with_primary("dtmi:com:example:A;1")
            .with_property("schema");

        assert_eq!(err.primary_id.as_deref(), Some("dtmi:com:example:A;1"));
        assert_eq!(err.secondary_id, None);
        assert_eq!(err.property.as_deref(), Some("schema"));
        assert_eq!(
            err.to_string(),
            "Missing schema (primary: dtmi:com:example:A;1) (property: schema)"
        );
    }

    #[test]
    fn test_entity_kind_from_content_type() {
        assert_eq!(
            EntityKind::from_content_type("Telemetry"),
            Some(EntityKind::Telemetry)
        );
        assert_eq!(EntityKind::from_content_type("Interface"), None);
        assert_eq!(EntityKind::from_content_type("property"), None);
    }
}
