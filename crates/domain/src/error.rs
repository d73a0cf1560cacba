//! # ドメイン層エラー定義
//!
//! ビジネスルール違反を表現するエラー型。
//!
//! 存在しないエンティティは例外ではなく想定内の結果として扱うため、
//! リポジトリの `Option` / `bool` で表現し、ここには含めない。

use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// API 層でこのエラーを受け取り、422 のレスポンスに変換する。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 入力値がビジネスルールに違反している場合に使用する。
    /// メッセージはクライアントにそのまま返されるため英語で記述する。
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}
