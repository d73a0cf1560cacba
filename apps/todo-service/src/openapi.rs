//! # OpenAPI 仕様定義
//!
//! utoipa を使用して Todo Service の OpenAPI 仕様を Rust の型から自動生成する。
//! `ApiDoc::openapi()` で OpenAPI ドキュメントを取得でき、
//! `GET /openapi.json` で配信する。

use axum::Json;
use utoipa::OpenApi;

use crate::handler::{health, root, todo};

#[derive(OpenApi)]
#[openapi(
   info(
      title = "Todo List API",
      version = "0.1.0",
      description = "Todo 項目を管理する REST API"
   ),
   paths(
      root::root,
      health::health_check,
      todo::list_todos,
      todo::create_todo,
      todo::get_todo,
      todo::update_todo,
      todo::delete_todo,
   ),
   components(schemas(
      todo_shared::ErrorResponse,
   )),
   tags(
      (name = "root", description = "ウェルカムメッセージ"),
      (name = "health", description = "ヘルスチェック"),
      (name = "todos", description = "Todo 管理"),
   )
)]
pub struct ApiDoc;

/// GET /openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
