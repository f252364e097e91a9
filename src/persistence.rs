//! プロジェクトの永続化
//!
//! 保存領域の2つのキーを使う:
//! - `projectData`: 通常の保存先
//! - `projectData_backup`: 自動保存で書かれる控え

use crate::error::{Result, ToshootError};
use crate::storage::KeyValueStore;
use toshoot_common::{parse_stored_blob, ProjectState};

pub const PRIMARY_KEY: &str = "projectData";
pub const BACKUP_KEY: &str = "projectData_backup";

/// 読み込み結果
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(ProjectState),
    /// 保存データがない（初回起動）。控えがあれば復元を提案できる
    NoProject { backup_available: bool },
}

#[derive(Debug, Clone)]
pub struct ProjectStore<S> {
    backend: S,
}

impl<S: KeyValueStore> ProjectStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// 通常の保存先へ書き込む
    pub fn save(&mut self, state: &ProjectState) -> Result<()> {
        self.write(PRIMARY_KEY, state)
    }

    /// 控えへ書き込む
    pub fn save_backup(&mut self, state: &ProjectState) -> Result<()> {
        self.write(BACKUP_KEY, state)
    }

    fn write(&mut self, key: &str, state: &ProjectState) -> Result<()> {
        // 全体をシリアライズしてから1回で書き込む
        let blob = serde_json::to_string(state)?;
        self.backend.set(key, &blob)?;
        log::debug!("保存: {} ({} bytes)", key, blob.len());
        Ok(())
    }

    pub fn has_backup(&self) -> Result<bool> {
        Ok(self.backend.get(BACKUP_KEY)?.is_some())
    }

    /// 通常の保存先から読み込む
    ///
    /// 壊れたデータは `CorruptData` として返す（呼び出し側で破棄か再試行を選ぶ）。
    pub fn load(&self) -> Result<LoadOutcome> {
        match self.backend.get(PRIMARY_KEY)? {
            Some(blob) => {
                let state = parse_stored_blob(&blob)?;
                log::info!("プロジェクト読み込み: {}項目", state.panel_items.len());
                Ok(LoadOutcome::Loaded(state))
            }
            None => Ok(LoadOutcome::NoProject {
                backup_available: self.has_backup()?,
            }),
        }
    }

    /// 控えを通常の保存先へそのままコピーし、読み込んだ状態を返す
    pub fn restore_backup(&mut self) -> Result<ProjectState> {
        let blob = self
            .backend
            .get(BACKUP_KEY)?
            .ok_or_else(|| ToshootError::Storage("バックアップがありません".into()))?;
        let state = parse_stored_blob(&blob)?;
        self.backend.set(PRIMARY_KEY, &blob)?;
        log::info!("バックアップから復元しました");
        Ok(state)
    }

    /// 通常の保存先と控えを両方削除
    pub fn clear(&mut self) -> Result<()> {
        self.backend.remove(PRIMARY_KEY)?;
        self.backend.remove(BACKUP_KEY)?;
        Ok(())
    }
}
