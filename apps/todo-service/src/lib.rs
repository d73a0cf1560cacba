//! # Todo Service ライブラリ
//!
//! Todo 項目の CRUD API を提供するサービスのコアモジュール。
//!
//! ## モジュール構成
//!
//! - `app_builder`: ルーター構築
//! - `config`: 環境変数からの設定読み込み
//! - `error`: API エラーと HTTP レスポンスへの変換
//! - `handler`: HTTP ハンドラ
//! - `middleware`: tower レイヤー（CORS）
//! - `openapi`: OpenAPI 仕様
//! - `usecase`: ビジネスロジック

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod openapi;
pub mod usecase;
