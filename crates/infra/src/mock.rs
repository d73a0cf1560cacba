//! # テスト用モックリポジトリ
//!
//! ユースケース・ハンドラのテストで使用するインメモリモックリポジトリ。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! todo-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use todo_domain::todo::{Todo, TodoChanges, TodoId, TodoTitle};

use crate::{error::InfraError, repository::TodoRepository};

#[derive(Default)]
struct MockState {
    todos:       Vec<Todo>,
    last_id:     i64,
    unavailable: bool,
}

// ===== MockTodoRepository =====

/// インメモリの TodoRepository
///
/// ID は PostgreSQL の `BIGSERIAL` と同様に 1 から採番し、削除しても再利用しない。
/// `Clone` したインスタンスは同じストアを共有する。
#[derive(Clone, Default)]
pub struct MockTodoRepository {
    state: Arc<Mutex<MockState>>,
}

impl MockTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// すべての操作が失敗するリポジトリ（ストア到達不能を再現する）
    pub fn unavailable() -> Self {
        let repo = Self::new();
        repo.state.lock().unwrap().unavailable = true;
        repo
    }

    /// テストデータを直接追加する
    pub fn add_todo(&self, title: &str, done: bool) -> Todo {
        let mut state = self.state.lock().unwrap();
        state.last_id += 1;
        let todo = Todo::from_db(
            TodoId::from_i64(state.last_id),
            TodoTitle::new(title).unwrap(),
            done,
        );
        state.todos.push(todo.clone());
        todo
    }

    /// 格納されている件数
    pub fn count(&self) -> usize {
        self.state.lock().unwrap().todos.len()
    }

    /// 格納されている Todo のスナップショット（ID 順）
    pub fn todos(&self) -> Vec<Todo> {
        self.state.lock().unwrap().todos.clone()
    }

    fn ensure_available(state: &MockState) -> Result<(), InfraError> {
        if state.unavailable {
            return Err(InfraError::unexpected("ストアに到達できません"));
        }
        Ok(())
    }
}

#[async_trait]
impl TodoRepository for MockTodoRepository {
    async fn find_all(&self, offset: i64, limit: i64) -> Result<Vec<Todo>, InfraError> {
        let state = self.state.lock().unwrap();
        Self::ensure_available(&state)?;
        Ok(state
            .todos
            .iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn insert(&self, title: &TodoTitle) -> Result<Todo, InfraError> {
        let mut state = self.state.lock().unwrap();
        Self::ensure_available(&state)?;
        state.last_id += 1;
        let todo = Todo::from_db(TodoId::from_i64(state.last_id), title.clone(), false);
        state.todos.push(todo.clone());
        Ok(todo)
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, InfraError> {
        let state = self.state.lock().unwrap();
        Self::ensure_available(&state)?;
        Ok(state.todos.iter().find(|t| t.id() == id).cloned())
    }

    async fn update(&self, id: TodoId, changes: &TodoChanges) -> Result<Option<Todo>, InfraError> {
        let mut state = self.state.lock().unwrap();
        Self::ensure_available(&state)?;
        let Some(slot) = state.todos.iter_mut().find(|t| t.id() == id) else {
            return Ok(None);
        };
        let updated = slot.clone().apply(changes.clone());
        *slot = updated.clone();
        Ok(Some(updated))
    }

    async fn delete(&self, id: TodoId) -> Result<bool, InfraError> {
        let mut state = self.state.lock().unwrap();
        Self::ensure_available(&state)?;
        let before = state.todos.len();
        state.todos.retain(|t| t.id() != id);
        Ok(state.todos.len() < before)
    }
}
