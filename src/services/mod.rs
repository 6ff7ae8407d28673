// Services Layer
// 検証パイプラインの各ステージを実行するサービス層

pub mod dtdl_parser;
pub mod file_loader;
pub mod model_parser;
pub mod reporter;
pub mod resolver;
pub mod syntax_checker;
