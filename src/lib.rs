//! ToshooT
//!
//! 撮影スケジュール管理のアプリケーション層:
//! 保存領域・プロジェクト管理・自動保存・Excel出力・共有

pub mod error;
pub mod config;
pub mod storage;
pub mod persistence;
pub mod manager;
pub mod autosave;
pub mod export;
pub mod share;

pub use config::Config;
pub use error::{Result, ToshootError};
pub use manager::{ProjectEvent, ProjectManager, ScheduleView, StartupState};
pub use persistence::{LoadOutcome, ProjectStore, BACKUP_KEY, PRIMARY_KEY};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use toshoot_common as common;
