//! Todo 管理ユースケース
//!
//! 各操作はリポジトリをちょうど 1 回呼び出す。
//! タイトルの検証はリポジトリ呼び出しより前に行うため、
//! 不正な入力でストアに触れることはない。

use std::sync::Arc;

use todo_domain::{
    DomainError,
    todo::{Todo, TodoChanges, TodoId, TodoTitle},
};
use todo_infra::repository::TodoRepository;

use crate::error::ApiError;

/// 一覧取得のデフォルト件数
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Todo 作成の入力
pub struct CreateTodoInput {
    pub title: String,
}

/// Todo 更新の入力
///
/// - `title`: 変更なしは `None`
/// - `done`: 変更なしは `None`
pub struct UpdateTodoInput {
    pub id:    TodoId,
    pub title: Option<String>,
    pub done:  Option<bool>,
}

/// Todo 管理ユースケース
pub struct TodoUseCaseImpl {
    todo_repository: Arc<dyn TodoRepository>,
}

impl TodoUseCaseImpl {
    pub fn new(todo_repository: Arc<dyn TodoRepository>) -> Self {
        Self { todo_repository }
    }

    /// Todo 一覧を作成順で取得する
    ///
    /// `skip` / `limit` は非負であることをハンドラで検証済み。
    pub async fn list_todos(&self, skip: i64, limit: i64) -> Result<Vec<Todo>, ApiError> {
        let todos = self.todo_repository.find_all(skip, limit).await?;
        Ok(todos)
    }

    /// Todo を作成する
    ///
    /// 作成直後の `done` は常に `false`。
    pub async fn create_todo(&self, input: CreateTodoInput) -> Result<Todo, ApiError> {
        let title = TodoTitle::new(input.title).map_err(title_error)?;

        let todo = self.todo_repository.insert(&title).await?;
        tracing::debug!(todo_id = %todo.id(), "Todo を作成しました");

        Ok(todo)
    }

    /// Todo を 1 件取得する
    pub async fn get_todo(&self, id: TodoId) -> Result<Todo, ApiError> {
        self.todo_repository
            .find_by_id(id)
            .await?
            .ok_or_else(ApiError::todo_not_found)
    }

    /// Todo を部分更新する
    ///
    /// 指定されたフィールドのみを変更する。何も指定されない場合は書き込まずに現在の値を返す。
    pub async fn update_todo(&self, input: UpdateTodoInput) -> Result<Todo, ApiError> {
        let changes = TodoChanges {
            title: input
                .title
                .map(TodoTitle::new)
                .transpose()
                .map_err(title_error)?,
            done:  input.done,
        };

        let todo = if changes.is_empty() {
            self.todo_repository.find_by_id(input.id).await?
        } else {
            self.todo_repository.update(input.id, &changes).await?
        };
        todo.ok_or_else(ApiError::todo_not_found)
    }

    /// Todo を削除する
    pub async fn delete_todo(&self, id: TodoId) -> Result<(), ApiError> {
        if !self.todo_repository.delete(id).await? {
            return Err(ApiError::todo_not_found());
        }
        tracing::debug!(todo_id = %id, "Todo を削除しました");
        Ok(())
    }
}

fn title_error(e: DomainError) -> ApiError {
    let DomainError::Validation(msg) = e;
    ApiError::invalid_field(["body", "title"], msg, "value_error")
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use todo_infra::{InfraError, mock::MockTodoRepository};

    use super::*;

    fn sut(repo: &MockTodoRepository) -> TodoUseCaseImpl {
        TodoUseCaseImpl::new(Arc::new(repo.clone()))
    }

    /// 読み取りはインメモリ実装に委譲し、update だけ失敗させるスタブ
    struct ReadOnlyTodoRepository(MockTodoRepository);

    #[async_trait]
    impl TodoRepository for ReadOnlyTodoRepository {
        async fn find_all(&self, offset: i64, limit: i64) -> Result<Vec<Todo>, InfraError> {
            self.0.find_all(offset, limit).await
        }

        async fn insert(&self, title: &TodoTitle) -> Result<Todo, InfraError> {
            self.0.insert(title).await
        }

        async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, InfraError> {
            self.0.find_by_id(id).await
        }

        async fn update(
            &self,
            _id: TodoId,
            _changes: &TodoChanges,
        ) -> Result<Option<Todo>, InfraError> {
            Err(InfraError::unexpected("update は呼ばれない想定"))
        }

        async fn delete(&self, id: TodoId) -> Result<bool, InfraError> {
            self.0.delete(id).await
        }
    }

    #[rstest]
    #[case::最小長("a".to_string())]
    #[case::最大長("a".repeat(140))]
    #[case::マルチバイト最大長("あ".repeat(140))]
    #[tokio::test]
    async fn test_作成したtodoを同じidで取得できる(#[case] title: String) {
        // Arrange
        let repo = MockTodoRepository::new();
        let sut = sut(&repo);

        // Act
        let created = sut
            .create_todo(CreateTodoInput {
                title: title.clone(),
            })
            .await
            .unwrap();
        let found = sut.get_todo(created.id()).await.unwrap();

        // Assert
        assert_eq!(found.title().as_str(), title);
        assert!(!found.done());
    }

    #[rstest]
    #[case::空文字(String::new())]
    #[case::最大長超過("a".repeat(141))]
    #[tokio::test]
    async fn test_不正なタイトルでは作成されない(#[case] title: String) {
        let repo = MockTodoRepository::new();
        let sut = sut(&repo);

        let result = sut.create_todo(CreateTodoInput { title }).await;

        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert_eq!(repo.count(), 0);
    }

    #[tokio::test]
    async fn test_不正なタイトルではリポジトリを呼び出さない() {
        // 到達不能なリポジトリでも 500 ではなく 422 になること
        let repo = MockTodoRepository::unavailable();
        let sut = sut(&repo);

        let result = sut
            .create_todo(CreateTodoInput {
                title: String::new(),
            })
            .await;

        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_doneのみの更新でタイトルは維持される() {
        let repo = MockTodoRepository::new();
        let todo = repo.add_todo("buy milk", false);
        let sut = sut(&repo);

        let updated = sut
            .update_todo(UpdateTodoInput {
                id:    todo.id(),
                title: None,
                done:  Some(true),
            })
            .await
            .unwrap();

        assert_eq!(updated.title().as_str(), "buy milk");
        assert!(updated.done());
    }

    #[tokio::test]
    async fn test_タイトルのみの更新でdoneは維持される() {
        let repo = MockTodoRepository::new();
        let todo = repo.add_todo("buy milk", true);
        let sut = sut(&repo);

        let updated = sut
            .update_todo(UpdateTodoInput {
                id:    todo.id(),
                title: Some("buy bread".to_string()),
                done:  None,
            })
            .await
            .unwrap();

        assert_eq!(updated.title().as_str(), "buy bread");
        assert!(updated.done());
    }

    #[tokio::test]
    async fn test_空の更新では現在の値を返す() {
        let repo = MockTodoRepository::new();
        let todo = repo.add_todo("buy milk", false);
        let sut = sut(&repo);

        let updated = sut
            .update_todo(UpdateTodoInput {
                id:    todo.id(),
                title: None,
                done:  None,
            })
            .await
            .unwrap();

        assert_eq!(updated, todo);
    }

    #[tokio::test]
    async fn test_空の更新ではストアへ書き込まない() {
        let repo = MockTodoRepository::new();
        let todo = repo.add_todo("buy milk", true);
        let sut = TodoUseCaseImpl::new(Arc::new(ReadOnlyTodoRepository(repo.clone())));

        let updated = sut
            .update_todo(UpdateTodoInput {
                id:    todo.id(),
                title: None,
                done:  None,
            })
            .await
            .unwrap();

        assert_eq!(updated, todo);
    }

    #[tokio::test]
    async fn test_存在しないidへの空の更新はnot_foundになる() {
        let sut = TodoUseCaseImpl::new(Arc::new(ReadOnlyTodoRepository(
            MockTodoRepository::new(),
        )));

        let result = sut
            .update_todo(UpdateTodoInput {
                id:    TodoId::from_i64(999),
                title: None,
                done:  None,
            })
            .await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_存在しないidの更新はnot_foundになり行数は変わらない() {
        let repo = MockTodoRepository::new();
        repo.add_todo("buy milk", false);
        let sut = sut(&repo);

        let result = sut
            .update_todo(UpdateTodoInput {
                id:    TodoId::from_i64(999),
                title: None,
                done:  Some(true),
            })
            .await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
        assert_eq!(repo.count(), 1);
    }

    #[tokio::test]
    async fn test_更新時の不正なタイトルは既存の行を変更しない() {
        let repo = MockTodoRepository::new();
        let todo = repo.add_todo("buy milk", false);
        let sut = sut(&repo);

        let result = sut
            .update_todo(UpdateTodoInput {
                id:    todo.id(),
                title: Some("a".repeat(141)),
                done:  Some(true),
            })
            .await;

        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert_eq!(repo.todos(), vec![todo]);
    }

    #[tokio::test]
    async fn test_削除すると1行だけ消え再取得できない() {
        let repo = MockTodoRepository::new();
        let keep = repo.add_todo("keep", false);
        let target = repo.add_todo("target", false);
        let sut = sut(&repo);

        sut.delete_todo(target.id()).await.unwrap();

        assert_eq!(repo.todos(), vec![keep]);
        assert!(matches!(
            sut.get_todo(target.id()).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_存在しないidの削除はnot_foundになる() {
        let repo = MockTodoRepository::new();
        repo.add_todo("buy milk", false);
        let sut = sut(&repo);

        let result = sut.delete_todo(TodoId::from_i64(999)).await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
        assert_eq!(repo.count(), 1);
    }

    #[tokio::test]
    async fn test_skipとlimitで作成順の部分集合を取得できる() {
        let repo = MockTodoRepository::new();
        for title in ["one", "two", "three", "four", "five"] {
            repo.add_todo(title, false);
        }
        let sut = sut(&repo);

        let todos = sut.list_todos(2, 2).await.unwrap();

        let titles: Vec<&str> = todos.iter().map(|t| t.title().as_str()).collect();
        assert_eq!(titles, vec!["three", "four"]);
    }

    #[tokio::test]
    async fn test_ストア障害はdatabaseエラーとして伝播する() {
        let repo = MockTodoRepository::unavailable();
        let sut = sut(&repo);

        let result = sut.list_todos(0, DEFAULT_LIST_LIMIT).await;

        assert!(matches!(result, Err(ApiError::Database(_))));
    }
}
