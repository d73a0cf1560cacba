//! # Todo 共有ユーティリティ
//!
//! サービス全体で使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum などの Web フレームワークには依存しない
//! - 外部クレートへの依存は最小限に抑え、重い依存は feature で切り替える

pub mod error_response;
pub mod health;
pub mod observability;

pub use error_response::{ErrorDetail, ErrorResponse, FieldError};
pub use health::HealthResponse;
