// DTDL Validatorライブラリのエントリーポイント
//
// モジュール構造:
// - cli: CLIレイヤー（引数の解析と検証コマンドの実行）
// - core: ドメイン型（設定、モデル、検証結果、エラー）
// - services: パイプラインの各ステージ（読み込み、構文チェック、モデル解析、結果出力）
// - adapters: コンソール出力とファイルシステムへのアクセスを抽象化

pub mod adapters;
pub mod cli;
pub mod core;
pub mod services;
