//! # Todo Service エラー定義
//!
//! API 層で発生するエラーと、HTTP レスポンスへの変換を定義する。
//!
//! | バリアント | ステータス | ボディ |
//! |-----------|-----------|--------|
//! | `NotFound` | 404 | `{"detail": "Todo not found"}` |
//! | `Validation` | 422 | `{"detail": [{"loc": [...], "msg": ..., "type": ...}]}` |
//! | `Database` | 500 | `{"detail": "Internal Server Error"}` |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use todo_infra::InfraError;
use todo_shared::{ErrorResponse, FieldError};

/// Todo が見つからないときのメッセージ
pub const TODO_NOT_FOUND: &str = "Todo not found";

/// Todo Service で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
    /// リソースが見つからない
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// 入力値が不正
    #[error("バリデーションエラー: {} 件", .0.len())]
    Validation(Vec<FieldError>),

    /// データベースエラー
    #[error("データベースエラー: {0}")]
    Database(#[from] InfraError),
}

impl ApiError {
    /// Todo が見つからない
    pub fn todo_not_found() -> Self {
        Self::NotFound(TODO_NOT_FOUND.to_string())
    }

    /// 単一フィールドのバリデーションエラー
    pub fn invalid_field(
        loc: impl IntoIterator<Item = impl Into<String>>,
        msg: impl Into<String>,
        error_type: impl Into<String>,
    ) -> Self {
        Self::Validation(vec![FieldError::new(loc, msg, error_type)])
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, ErrorResponse::not_found(detail)),
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::validation_error(errors),
            ),
            ApiError::Database(e) => {
                tracing::error!(
                    error = %e,
                    span_trace = %e.span_trace(),
                    "データベースエラー"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::internal_error(),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
