//! # Todo ハンドラ
//!
//! Todo の CRUD API を提供する。
//!
//! ## エンドポイント
//!
//! - `GET /todos` - Todo 一覧（`skip` / `limit` で範囲指定）
//! - `POST /todos` - Todo 作成
//! - `GET /todos/{id}` - Todo 取得
//! - `PATCH /todos/{id}` - Todo 部分更新
//! - `DELETE /todos/{id}` - Todo 削除
//!
//! ## 入力エラー
//!
//! axum のエクストラクタが返す拒否（JSON 不正、パスやクエリの型不一致）は
//! すべて 422 のフィールドエラー形式に変換する。

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path,
        Query,
        State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Deserializer, Serialize};
use todo_domain::todo::{Todo, TodoId};
use todo_shared::ErrorResponse;
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::ApiError,
    usecase::{
        CreateTodoInput,
        TodoUseCaseImpl,
        UpdateTodoInput,
        todo::DEFAULT_LIST_LIMIT,
    },
};

/// Todo API の共有状態
pub struct TodoState {
    pub usecase: TodoUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// 一覧取得のクエリパラメータ
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListTodosQuery {
    /// 先頭からスキップする件数（デフォルト: 0）
    #[param(minimum = 0)]
    pub skip:  Option<i64>,
    /// 取得する最大件数（デフォルト: 100）
    #[param(minimum = 0)]
    pub limit: Option<i64>,
}

/// Todo 作成リクエスト
///
/// `done` などタイトル以外のフィールドは無視する（作成時は常に `done = false`）。
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTodoRequest {
    #[schema(value_type = String, required = true, min_length = 1, max_length = 140)]
    pub title: Option<String>,
}

/// Todo 更新リクエスト
///
/// 各フィールドは「省略」と「値あり」を区別する。
/// - 省略: `None`（変更しない）
/// - `null`: `Some(None)`（422 として拒否する）
/// - 値あり: `Some(Some(value))`
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTodoRequest {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, min_length = 1, max_length = 140)]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<bool>)]
    pub done:  Option<Option<bool>>,
}

/// Todo DTO
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct TodoDto {
    pub id:    i64,
    pub title: String,
    pub done:  bool,
}

impl From<&Todo> for TodoDto {
    fn from(todo: &Todo) -> Self {
        Self {
            id:    todo.id().as_i64(),
            title: todo.title().as_str().to_string(),
            done:  todo.done(),
        }
    }
}

/// フィールドが存在する場合は `null` であっても `Some` で包む
///
/// `#[serde(default)]` と組み合わせることで、省略時のみ `None` になる。
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// --- 入力エラーの変換 ---

fn body_rejection(rejection: JsonRejection) -> ApiError {
    let error_type = match &rejection {
        JsonRejection::JsonSyntaxError(_) => "json_invalid",
        JsonRejection::MissingJsonContentType(_) => "model_attributes_type",
        _ => "value_error",
    };
    ApiError::invalid_field(["body"], rejection.body_text(), error_type)
}

fn path_rejection(rejection: PathRejection) -> ApiError {
    ApiError::invalid_field(["path", "id"], rejection.body_text(), "int_parsing")
}

fn query_rejection(rejection: QueryRejection) -> ApiError {
    ApiError::invalid_field(["query"], rejection.body_text(), "int_parsing")
}

fn non_negative(name: &'static str, value: i64) -> Result<i64, ApiError> {
    if value < 0 {
        return Err(ApiError::invalid_field(
            ["query", name],
            "Input should be greater than or equal to 0",
            "greater_than_equal",
        ));
    }
    Ok(value)
}

/// 明示的な `null` を拒否し、「省略」か「値あり」に正規化する
fn reject_null<T>(
    name: &'static str,
    value: Option<Option<T>>,
    msg: &str,
    error_type: &str,
) -> Result<Option<T>, ApiError> {
    match value {
        Some(None) => Err(ApiError::invalid_field(["body", name], msg, error_type)),
        other => Ok(other.flatten()),
    }
}

// --- ハンドラ ---

/// GET /todos
///
/// Todo 一覧を作成順で取得する。
#[utoipa::path(
   get,
   path = "/todos",
   tag = "todos",
   params(ListTodosQuery),
   responses(
      (status = 200, description = "Todo 一覧", body = Vec<TodoDto>),
      (status = 422, description = "クエリパラメータが不正", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn list_todos(
    State(state): State<Arc<TodoState>>,
    query: Result<Query<ListTodosQuery>, QueryRejection>,
) -> Result<Json<Vec<TodoDto>>, ApiError> {
    let Query(query) = query.map_err(query_rejection)?;
    let skip = non_negative("skip", query.skip.unwrap_or(0))?;
    let limit = non_negative("limit", query.limit.unwrap_or(DEFAULT_LIST_LIMIT))?;

    let todos = state.usecase.list_todos(skip, limit).await?;

    Ok(Json(todos.iter().map(TodoDto::from).collect()))
}

/// POST /todos
///
/// Todo を作成する。
///
/// ## レスポンス
///
/// - `201 Created`: 作成された Todo（`done` は常に `false`）
/// - `422 Unprocessable Entity`: タイトルの欠落、空文字、141 文字以上
#[utoipa::path(
   post,
   path = "/todos",
   tag = "todos",
   request_body = CreateTodoRequest,
   responses(
      (status = 201, description = "Todo 作成成功", body = TodoDto),
      (status = 422, description = "バリデーションエラー", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn create_todo(
    State(state): State<Arc<TodoState>>,
    body: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body.map_err(body_rejection)?;
    let title = req
        .title
        .ok_or_else(|| ApiError::invalid_field(["body", "title"], "Field required", "missing"))?;

    let todo = state.usecase.create_todo(CreateTodoInput { title }).await?;

    Ok((StatusCode::CREATED, Json(TodoDto::from(&todo))))
}

/// GET /todos/{id}
///
/// Todo を 1 件取得する。
#[utoipa::path(
   get,
   path = "/todos/{id}",
   tag = "todos",
   params(("id" = i64, Path, description = "Todo ID")),
   responses(
      (status = 200, description = "Todo", body = TodoDto),
      (status = 404, description = "Todo が見つからない", body = ErrorResponse),
      (status = 422, description = "ID が整数でない", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn get_todo(
    State(state): State<Arc<TodoState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<TodoDto>, ApiError> {
    let Path(id) = path.map_err(path_rejection)?;

    let todo = state.usecase.get_todo(TodoId::from_i64(id)).await?;

    Ok(Json(TodoDto::from(&todo)))
}

/// PATCH /todos/{id}
///
/// Todo を部分更新する。
///
/// ## レスポンス
///
/// - `200 OK`: 更新後の Todo（空のペイロードでは現在の値）
/// - `404 Not Found`: Todo が見つからない
/// - `422 Unprocessable Entity`: タイトルが不正、またはフィールドが `null`
#[utoipa::path(
   patch,
   path = "/todos/{id}",
   tag = "todos",
   params(("id" = i64, Path, description = "Todo ID")),
   request_body = UpdateTodoRequest,
   responses(
      (status = 200, description = "Todo 更新成功", body = TodoDto),
      (status = 404, description = "Todo が見つからない", body = ErrorResponse),
      (status = 422, description = "バリデーションエラー", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn update_todo(
    State(state): State<Arc<TodoState>>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<TodoDto>, ApiError> {
    let Path(id) = path.map_err(path_rejection)?;
    let Json(req) = body.map_err(body_rejection)?;

    let input = UpdateTodoInput {
        id:    TodoId::from_i64(id),
        title: reject_null("title", req.title, "Input should be a valid string", "string_type")?,
        done:  reject_null("done", req.done, "Input should be a valid boolean", "bool_type")?,
    };

    let todo = state.usecase.update_todo(input).await?;

    Ok(Json(TodoDto::from(&todo)))
}

/// DELETE /todos/{id}
///
/// Todo を削除する。
///
/// ## レスポンス
///
/// - `204 No Content`: 削除成功（ボディなし）
/// - `404 Not Found`: Todo が見つからない
#[utoipa::path(
   delete,
   path = "/todos/{id}",
   tag = "todos",
   params(("id" = i64, Path, description = "Todo ID")),
   responses(
      (status = 204, description = "Todo 削除成功"),
      (status = 404, description = "Todo が見つからない", body = ErrorResponse),
      (status = 422, description = "ID が整数でない", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_todo(
    State(state): State<Arc<TodoState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path.map_err(path_rejection)?;

    state.usecase.delete_todo(TodoId::from_i64(id)).await?;

    Ok(StatusCode::NO_CONTENT)
}
