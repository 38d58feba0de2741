//! # Mimizuku CLI Library
//!
//! エンティティモデルの DL 公理へのコンパイルをコマンドラインから実行

pub mod commands;

pub use commands::*;
