// テスト共通ヘルパー
//
// テスト全体で共有されるモデルのフィクスチャとユーティリティ関数を集約する。
// テストファイルから `mod common;` で利用可能。

use std::fs;
use std::path::{Path, PathBuf};

/// テスト用のモデル定義
pub struct ModelFixtures;

#[allow(dead_code)]
impl ModelFixtures {
    /// 外部参照を持たない最小のインターフェース
    pub const VALID_TWIN: &'static str = r#"{
  "@context": "dtmi:dtdl:context;2",
  "@id": "dtmi:com:example:ValidTwin;1",
  "@type": "Interface",
  "displayName": "Valid Twin"
}"#;

    /// 定義されていないインターフェースを継承するモデル
    pub const REFS_MISSING: &'static str = r#"{
  "@context": "dtmi:dtdl:context;2",
  "@id": "dtmi:com:example:RefsMissing;1",
  "@type": "Interface",
  "extends": "dtmi:com:example:Undefined;1"
}"#;

    /// JSONとしては正しいが、モデルエラーを2件含むモデル
    pub const MODEL_A_TWO_ERRORS: &'static str = r#"{
  "@context": "dtmi:dtdl:context;2",
  "@id": "dtmi:com:example:ModelA;1",
  "@type": "Interface",
  "contents": [
    { "@type": "Property", "name": "setPoint" },
    { "@type": "Telemetry", "name": "bad-name", "schema": "double" }
  ]
}"#;

    /// Propertyを1つ持つ正しいモデル
    pub const MODEL_B: &'static str = r#"{
  "@context": "dtmi:dtdl:context;2",
  "@id": "dtmi:com:example:ModelB;1",
  "@type": "Interface",
  "contents": [
    { "@type": "Property", "name": "serialNumber", "schema": "string" }
  ]
}"#;
}

/// モデルファイルを書き込んでパスを返す
pub fn write_model(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}
