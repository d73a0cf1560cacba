//! # ルートハンドラ
//!
//! `GET /` でウェルカムメッセージを返す。

use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// ウェルカムメッセージ
pub const WELCOME_MESSAGE: &str = "Welcome to the Todo List API!";

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct RootResponse {
    pub message: String,
}

/// GET /
#[utoipa::path(
   get,
   path = "/",
   tag = "root",
   responses(
      (status = 200, description = "ウェルカムメッセージ", body = RootResponse)
   )
)]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}
