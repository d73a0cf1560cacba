//! # ミドルウェア
//!
//! ルーター全体に適用する tower レイヤーを提供する。

pub mod cors;

pub use cors::cors_layer;
