//! # アプリケーション構築
//!
//! DI（リポジトリ・ユースケース・State）の初期化とルーター構築を担当する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。

use std::sync::Arc;

use axum::{Router, routing::get};
use todo_infra::repository::TodoRepository;
use tower_http::trace::TraceLayer;

use crate::{
    config::AllowedOrigins,
    handler::{
        TodoState,
        create_todo,
        delete_todo,
        get_todo,
        health_check,
        list_todos,
        root,
        update_todo,
    },
    middleware::cors_layer,
    openapi::openapi_json,
    usecase::TodoUseCaseImpl,
};

/// DI コンテナの構築とルーター定義を行う
///
/// リポジトリは `Arc<dyn TodoRepository>` で受け取るため、
/// 本番では PostgreSQL 実装、テストではインメモリ実装を注入できる。
pub fn build_app(
    todo_repository: Arc<dyn TodoRepository>,
    allowed_origins: &AllowedOrigins,
) -> Router {
    let todo_state = Arc::new(TodoState {
        usecase: TodoUseCaseImpl::new(todo_repository),
    });

    // レイヤー順序: 下に書いたものが外側
    // CORS を最外に置き、プリフライトはハンドラに到達させない
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/openapi.json", get(openapi_json))
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).patch(update_todo).delete(delete_todo),
        )
        .with_state(todo_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
}
