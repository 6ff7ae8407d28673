// Adapters
// コンソール出力とファイルシステムへのアクセスを抽象化

pub mod directory_resolver;
pub mod input_scanner;
pub mod log_sink;
