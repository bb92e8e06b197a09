//! シェーダーモジュール
//!
//! WGSLシェーダーを外部ファイルから読み込む

/// シーン描画用シェーダー（半球ライト）
pub const MAIN_SHADER: &str = include_str!("main.wgsl");
