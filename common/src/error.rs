//! エラー型定義

use crate::ids::ItemId;
use thiserror::Error;

/// 入力検証エラー（操作は中断され、状態は変更されない）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("名前が空です")]
    BlankName,

    #[error("シーケンスが選択されていません。先にシーケンスを選択してください")]
    NoActiveSequence,

    #[error("項目が見つかりません: {0}")]
    ItemNotFound(ItemId),

    #[error("シーケンスではありません: {0}")]
    NotASequence(ItemId),
}

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Corrupt data: {0}")]
    CorruptData(String),

    #[error("Invalid project file format: {0}")]
    InvalidFormat(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Export failed: {0}")]
    Export(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_validation() {
        let error = Error::Validation(ValidationError::NoActiveSequence);
        let display = format!("{}", error);
        assert!(display.contains("Validation error"));
        assert!(display.contains("シーケンス"));
    }

    #[test]
    fn test_error_display_corrupt() {
        let error = Error::CorruptData("panelItems がありません".to_string());
        assert_eq!(format!("{}", error), "Corrupt data: panelItems がありません");
    }

    #[test]
    fn test_error_from_validation() {
        let error: Error = ValidationError::BlankName.into();
        assert!(matches!(error, Error::Validation(ValidationError::BlankName)));
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_item_not_found_display() {
        let error = ValidationError::ItemNotFound(ItemId(42));
        assert!(format!("{}", error).contains("42"));
    }
}
