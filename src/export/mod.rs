pub mod excel;

use crate::error::{Result, ToshootError};
use crate::manager::ProjectManager;
use crate::storage::KeyValueStore;
use std::path::{Path, PathBuf};
use toshoot_common::export::ExportScope;

/// 現在の画面状態から出力対象を決める
///
/// - `full_project`: シーンを持つ全シーケンス
/// - フィルタが有効: 全シーケンス横断の絞り込み結果
/// - それ以外: アクティブなシーケンス
pub fn current_scope<S: KeyValueStore>(manager: &ProjectManager<S>, full_project: bool) -> Result<ExportScope> {
    if full_project {
        return Ok(ExportScope::FullProject);
    }
    if manager.filter().is_active() {
        return Ok(ExportScope::Filtered(manager.filter().clone()));
    }
    manager
        .state()
        .active_item_id
        .map(ExportScope::Sequence)
        .ok_or_else(|| ToshootError::Export("シーケンスを選択してください".into()))
}

/// 現在の画面状態をExcelに出力し、出力先のパスを返す
pub fn export_schedule<S: KeyValueStore>(
    manager: &ProjectManager<S>,
    full_project: bool,
    output_dir: &Path,
) -> Result<PathBuf> {
    let scope = current_scope(manager, full_project)?;
    log::debug!("Excel出力対象: {:?}", scope);
    excel::generate_excel(manager.state(), &scope, output_dir)
}
