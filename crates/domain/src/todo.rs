//! # Todo
//!
//! Todo 項目を表現するドメインモデル。
//!
//! ## 不変条件
//!
//! - `title` は 1〜140 文字（Unicode スカラー値で数える）
//! - `id` はストアが採番し、作成後は変更されない
//! - 作成直後の `done` は常に `false`
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use todo_domain::todo::{Todo, TodoChanges, TodoId, TodoTitle};
//!
//! let todo = Todo::from_db(TodoId::from_i64(1), TodoTitle::new("buy milk")?, false);
//!
//! let changes = TodoChanges {
//!     title: None,
//!     done:  Some(true),
//! };
//! let todo = todo.apply(changes);
//!
//! assert_eq!(todo.title().as_str(), "buy milk");
//! assert!(todo.done());
//! # Ok(())
//! # }
//! ```

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Todo の一意識別子
///
/// PostgreSQL の `BIGSERIAL` で採番される連番。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct TodoId(i64);

impl TodoId {
    /// 既存の値から ID を作成する
    pub fn from_i64(value: i64) -> Self {
        Self(value)
    }

    /// 内部の値を取得する
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

// =========================================================================
// TodoTitle（タイトル）
// =========================================================================

/// タイトルの最大文字数（DB: `VARCHAR(140)`）
pub const MAX_TODO_TITLE_LENGTH: usize = 140;

/// Todo のタイトル（値オブジェクト）
///
/// 1〜140 文字。前後の空白は除去しない（入力をそのまま保持する）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoTitle(String);

impl TodoTitle {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let length = value.chars().count();

        if length == 0 {
            return Err(DomainError::Validation(
                "String should have at least 1 character".to_string(),
            ));
        }

        if length > MAX_TODO_TITLE_LENGTH {
            return Err(DomainError::Validation(format!(
                "String should have at most {MAX_TODO_TITLE_LENGTH} characters"
            )));
        }

        Ok(Self(value))
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TodoTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =========================================================================
// Todo（エンティティ）
// =========================================================================

/// Todo エンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    id:    TodoId,
    title: TodoTitle,
    done:  bool,
}

impl Todo {
    /// データベースから Todo を復元する
    pub fn from_db(id: TodoId, title: TodoTitle, done: bool) -> Self {
        Self { id, title, done }
    }

    pub fn id(&self) -> TodoId {
        self.id
    }

    pub fn title(&self) -> &TodoTitle {
        &self.title
    }

    pub fn done(&self) -> bool {
        self.done
    }

    /// 部分更新を適用した新しい状態を返す
    ///
    /// `None` のフィールドは現在の値を維持する。
    pub fn apply(self, changes: TodoChanges) -> Self {
        Self {
            id:    self.id,
            title: changes.title.unwrap_or(self.title),
            done:  changes.done.unwrap_or(self.done),
        }
    }
}

/// Todo の部分更新内容
///
/// `None` は「指定なし（変更しない）」を意味する。
/// `done = Some(false)` は明示的な `false` への変更であり、指定なしとは区別される。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: Option<TodoTitle>,
    pub done:  Option<bool>,
}

impl TodoChanges {
    /// 変更対象のフィールドが 1 つもないか
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.done.is_none()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn buy_milk() -> Todo {
        Todo::from_db(TodoId::from_i64(1), TodoTitle::new("buy milk").unwrap(), false)
    }

    // ===== TodoTitle =====

    #[rstest]
    #[case::一文字("a".to_string())]
    #[case::上限ちょうど("a".repeat(140))]
    #[case::マルチバイト上限ちょうど("あ".repeat(140))]
    #[case::前後の空白を含む("  buy milk  ".to_string())]
    fn test_有効なタイトルはそのまま保持される(#[case] input: String) {
        let title = TodoTitle::new(input.clone()).unwrap();

        assert_eq!(title.as_str(), input);
    }

    #[test]
    fn test_空文字列のタイトルはエラー() {
        let result = TodoTitle::new("");

        assert_eq!(
            result,
            Err(DomainError::Validation(
                "String should have at least 1 character".to_string()
            ))
        );
    }

    #[rstest]
    #[case::ascii("a".repeat(141))]
    #[case::マルチバイト("あ".repeat(141))]
    fn test_141文字のタイトルはエラー(#[case] input: String) {
        let result = TodoTitle::new(input);

        assert_eq!(
            result,
            Err(DomainError::Validation(
                "String should have at most 140 characters".to_string()
            ))
        );
    }

    // ===== Todo::apply =====

    #[test]
    fn test_doneのみ指定するとタイトルは維持される() {
        let sut = buy_milk();

        let updated = sut.apply(TodoChanges {
            title: None,
            done:  Some(true),
        });

        assert_eq!(updated.title().as_str(), "buy milk");
        assert!(updated.done());
        assert_eq!(updated.id(), TodoId::from_i64(1));
    }

    #[test]
    fn test_タイトルのみ指定するとdoneは維持される() {
        let sut = buy_milk().apply(TodoChanges {
            title: None,
            done:  Some(true),
        });

        let updated = sut.apply(TodoChanges {
            title: Some(TodoTitle::new("buy bread").unwrap()),
            done:  None,
        });

        assert_eq!(updated.title().as_str(), "buy bread");
        assert!(updated.done());
    }

    #[test]
    fn test_空の変更では状態が変わらない() {
        let changes = TodoChanges::default();
        assert!(changes.is_empty());

        let updated = buy_milk().apply(changes);

        assert_eq!(updated, buy_milk());
    }

    #[test]
    fn test_todo_idのdisplayは数値のみを出力する() {
        assert_eq!(TodoId::from_i64(42).to_string(), "42");
    }
}
