//! # Todo ドメイン層
//!
//! Todo サービスの中核となるドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: 一意の識別子を持つオブジェクト（[`todo::Todo`]）
//! - **値オブジェクト**: 不変条件を型で保証するオブジェクト（[`todo::TodoTitle`]）
//! - **ドメインエラー**: ビジネスルール違反を表現するエラー型
//!
//! ## 依存関係の方向
//!
//! ```text
//! todo-service → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、外部サービス）に一切依存しない。
//!
//! ## 使用例
//!
//! ```rust
//! use todo_domain::{DomainError, todo::TodoTitle};
//!
//! let title = TodoTitle::new("buy milk").unwrap();
//! assert_eq!(title.as_str(), "buy milk");
//!
//! assert!(matches!(TodoTitle::new(""), Err(DomainError::Validation(_))));
//! ```

pub mod error;
pub mod todo;

pub use error::DomainError;
