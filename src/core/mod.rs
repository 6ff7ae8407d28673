// Core Domain
// 設定、モデル定義、検証結果、エラー型などの純粋なドメイン型

pub mod config;
pub mod error;
pub mod model;
pub mod outcome;
