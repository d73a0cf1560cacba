//! # エラーレスポンス
//!
//! 全エンドポイントで共通のエラーレスポンス構造体を提供する。
//!
//! ## 形式
//!
//! フロントエンドが既に扱っている `{"detail": ...}` 形式に合わせる:
//!
//! ```json
//! { "detail": "Todo not found" }
//! ```
//!
//! バリデーションエラーではフィールド単位の詳細を配列で返す:
//!
//! ```json
//! {
//!   "detail": [
//!     { "loc": ["body", "title"], "msg": "String should have at least 1 character", "type": "value_error" }
//!   ]
//! }
//! ```
//!
//! ## 設計
//!
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum の `IntoResponse` 変換はサービス側の責務（shared に axum 依存を入れない）

use serde::{Deserialize, Serialize};

/// エラーレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    pub detail: ErrorDetail,
}

/// エラーの詳細
///
/// 単一メッセージ（404 / 500）か、フィールド単位のエラー一覧（422）のいずれか。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum ErrorDetail {
    Message(String),
    Fields(Vec<FieldError>),
}

/// フィールド単位のバリデーションエラー
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    /// エラー箇所（例: `["body", "title"]`, `["query", "limit"]`）
    pub loc:        Vec<String>,
    /// 人間可読なメッセージ
    pub msg:        String,
    /// エラー種別（例: `"missing"`, `"value_error"`）
    #[serde(rename = "type")]
    pub error_type: String,
}

impl FieldError {
    pub fn new(
        loc: impl IntoIterator<Item = impl Into<String>>,
        msg: impl Into<String>,
        error_type: impl Into<String>,
    ) -> Self {
        Self {
            loc:        loc.into_iter().map(Into::into).collect(),
            msg:        msg.into(),
            error_type: error_type.into(),
        }
    }
}

impl ErrorResponse {
    /// 単一メッセージのエラーレスポンス
    pub fn message(detail: impl Into<String>) -> Self {
        Self {
            detail: ErrorDetail::Message(detail.into()),
        }
    }

    /// 404 Not Found
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::message(detail)
    }

    /// 422 Unprocessable Entity
    pub fn validation_error(errors: Vec<FieldError>) -> Self {
        Self {
            detail: ErrorDetail::Fields(errors),
        }
    }

    /// 500 Internal Server Error
    ///
    /// detail は固定値（内部情報を漏らさないため）。
    pub fn internal_error() -> Self {
        Self::message("Internal Server Error")
    }
}
