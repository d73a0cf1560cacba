//! # TodoRepository
//!
//! Todo の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **不在は正常系**: 存在しない ID に対する取得・更新・削除は
//!   エラーではなく `None` / `false` で返す
//! - **単一文での書き込み**: 挿入・更新・削除はすべて 1 行に対する
//!   1 つの SQL 文で完結し、自動コミットでアトミックに反映される
//! - **部分更新**: `UPDATE ... SET col = COALESCE($n, col)` により、
//!   指定されたフィールドのみを変更する

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use todo_domain::todo::{Todo, TodoChanges, TodoId, TodoTitle};

use crate::error::InfraError;

/// Todo リポジトリトレイト
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// 作成順（主キー順）で `offset` 件をスキップし、最大 `limit` 件を取得する
    ///
    /// `offset` / `limit` は呼び出し側で非負であることを保証する。
    async fn find_all(&self, offset: i64, limit: i64) -> Result<Vec<Todo>, InfraError>;

    /// `done = false` で Todo を挿入し、採番された ID を含む行を返す
    async fn insert(&self, title: &TodoTitle) -> Result<Todo, InfraError>;

    /// ID で Todo を検索する
    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, InfraError>;

    /// 指定されたフィールドのみを更新し、更新後の行を返す
    ///
    /// 対象が存在しない場合は `None` を返す。
    async fn update(&self, id: TodoId, changes: &TodoChanges) -> Result<Option<Todo>, InfraError>;

    /// Todo を削除する
    ///
    /// 削除した場合は `true`、対象が存在しない場合は `false` を返す。
    async fn delete(&self, id: TodoId) -> Result<bool, InfraError>;
}

/// `todos` テーブルの行
#[derive(Debug, FromRow)]
struct TodoRow {
    id:    i64,
    title: String,
    done:  bool,
}

impl TryFrom<TodoRow> for Todo {
    type Error = InfraError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        // CHECK 制約があるため通常は失敗しない
        let title = TodoTitle::new(row.title).map_err(|e| {
            InfraError::unexpected(format!("不正なタイトルが格納されています(id={}): {e}", row.id))
        })?;
        Ok(Todo::from_db(TodoId::from_i64(row.id), title, row.done))
    }
}

/// PostgreSQL 実装の TodoRepository
#[derive(Debug, Clone)]
pub struct PostgresTodoRepository {
    pool: PgPool,
}

impl PostgresTodoRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for PostgresTodoRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%offset, %limit))]
    async fn find_all(&self, offset: i64, limit: i64) -> Result<Vec<Todo>, InfraError> {
        let rows = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, title, done
            FROM todos
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Todo::try_from).collect()
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn insert(&self, title: &TodoTitle) -> Result<Todo, InfraError> {
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            INSERT INTO todos (title, done)
            VALUES ($1, FALSE)
            RETURNING id, title, done
            "#,
        )
        .bind(title.as_str())
        .fetch_one(&self.pool)
        .await?;

        Todo::try_from(row)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, InfraError> {
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, title, done
            FROM todos
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Todo::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn update(&self, id: TodoId, changes: &TodoChanges) -> Result<Option<Todo>, InfraError> {
        // 指定なし（NULL）のカラムは COALESCE で現在値を維持する
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            UPDATE todos
            SET title = COALESCE($2, title),
                done = COALESCE($3, done)
            WHERE id = $1
            RETURNING id, title, done
            "#,
        )
        .bind(id.as_i64())
        .bind(changes.title.as_ref().map(TodoTitle::as_str))
        .bind(changes.done)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Todo::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn delete(&self, id: TodoId) -> Result<bool, InfraError> {
        let result = sqlx::query(
            r#"
            DELETE FROM todos
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
