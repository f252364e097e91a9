use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToshootError {
    #[error(transparent)]
    Common(#[from] toshoot_common::Error),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("保存領域エラー: {0}")]
    Storage(String),

    #[error("エクスポートエラー: {0}")]
    Export(String),

    #[error("共有できません: {0}")]
    ShareUnavailable(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl ToshootError {
    /// 入力検証エラー（空の名前、シーケンス未選択など）か
    pub fn is_validation(&self) -> bool {
        matches!(self, ToshootError::Common(toshoot_common::Error::Validation(_)))
    }

    /// 保存データ・インポートデータの破損か
    pub fn is_corrupt_data(&self) -> bool {
        matches!(
            self,
            ToshootError::Common(toshoot_common::Error::CorruptData(_))
                | ToshootError::Common(toshoot_common::Error::InvalidFormat(_))
        )
    }
}

pub type Result<T> = std::result::Result<T, ToshootError>;
