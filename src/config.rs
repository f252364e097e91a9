use crate::error::{Result, ToshootError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 保存領域のディレクトリ（未指定ならデータディレクトリ）
    pub storage_dir: Option<PathBuf>,
    /// Excel出力先（未指定ならカレントディレクトリ）
    pub export_dir: Option<PathBuf>,
    pub autosave_interval_secs: u64,
    pub autosave_on_start: bool,
    pub scenes_per_page: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: None,
            export_dir: None,
            autosave_interval_secs: 120,
            autosave_on_start: false,
            scenes_per_page: 10,
        }
    }
}

impl Config {
    /// `~/.config/toshoot/config.json` を読む（なければ既定値）
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("設定ファイルなし、既定値を使用: {}", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| ToshootError::Config(format!("{} を読み込めません: {}", path.display(), e)))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ToshootError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("toshoot").join("config.json"))
    }

    /// 保存領域のディレクトリ
    pub fn storage_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.storage_dir {
            return Ok(dir.clone());
        }
        let data = dirs::data_dir()
            .ok_or_else(|| ToshootError::Config("データディレクトリが見つかりません".into()))?;
        Ok(data.join("toshoot"))
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs.max(1))
    }
}
