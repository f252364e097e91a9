//! プロジェクト状態と変更操作
//!
//! 状態の変更はすべてこのモジュールの操作を経由する。
//! 失敗する操作は状態を一切変更せずにエラーを返す。

use crate::error::{Result, ValidationError};
use crate::ids::{IdGenerator, ItemId, SceneId};
use crate::panel::{PanelItem, ScheduleBreak, Sequence};
use crate::reorder::reorder;
use crate::scene::{SceneFields, SceneRecord};
use serde::{Deserialize, Serialize};

/// 作品情報
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectInfo {
    pub prod_name: String,
    pub director_name: String,
    pub contact_number: String,
    pub contact_email: String,
}

/// プロジェクト全体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectState {
    #[serde(default)]
    pub panel_items: Vec<PanelItem>,

    #[serde(default)]
    pub active_item_id: Option<ItemId>,

    #[serde(default)]
    pub project_info: ProjectInfo,

    /// 次の新規シーンに引き継ぐ連絡先
    #[serde(skip)]
    last_contact: String,

    #[serde(skip)]
    ids: IdGenerator,
}

impl PartialEq for ProjectState {
    fn eq(&self, other: &Self) -> bool {
        self.panel_items == other.panel_items
            && self.active_item_id == other.active_item_id
            && self.project_info == other.project_info
    }
}

fn non_blank(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl ProjectState {
    pub fn new() -> Self {
        Self::default()
    }

    // =============================================
    // 参照
    // =============================================

    pub fn item(&self, id: ItemId) -> Option<&PanelItem> {
        self.panel_items.iter().find(|i| i.id() == id)
    }

    pub fn sequences(&self) -> impl Iterator<Item = &Sequence> {
        self.panel_items.iter().filter_map(PanelItem::as_sequence)
    }

    pub fn sequence(&self, id: ItemId) -> Option<&Sequence> {
        self.item(id).and_then(PanelItem::as_sequence)
    }

    pub fn sequence_count(&self) -> usize {
        self.sequences().count()
    }

    pub fn scene_count(&self) -> usize {
        self.sequences().map(|s| s.scenes.len()).sum()
    }

    /// アクティブなシーケンス
    pub fn active_sequence(&self) -> Option<&Sequence> {
        self.active_item_id.and_then(|id| self.sequence(id))
    }

    /// シーンとその所属シーケンスを検索
    pub fn find_scene(&self, id: SceneId) -> Option<(&Sequence, &SceneRecord)> {
        self.sequences()
            .find_map(|seq| seq.scene(id).map(|scene| (seq, scene)))
    }

    pub fn last_contact(&self) -> &str {
        &self.last_contact
    }

    /// 新規シーン入力の初期値
    pub fn new_scene_template(&self) -> SceneFields {
        SceneFields::template(&self.last_contact)
    }

    // =============================================
    // パネル項目の操作
    // =============================================

    /// シーケンスを末尾に追加してアクティブにする
    ///
    /// 名前が空なら `Sequence {n}`（n = 既存シーケンス数 + 1）
    pub fn create_sequence(&mut self, name: Option<&str>) -> ItemId {
        let name = name
            .and_then(non_blank)
            .unwrap_or_else(|| format!("Sequence {}", self.sequence_count() + 1));
        let id = self.ids.next_item_id();
        self.panel_items.push(PanelItem::Sequence(Sequence { id, name, scenes: Vec::new() }));
        self.active_item_id = Some(id);
        log::debug!("シーケンス追加: {}", id);
        id
    }

    /// スケジュール区切りを末尾に追加（アクティブ項目は変えない）
    pub fn create_schedule_break(&mut self, name: &str) -> Result<ItemId> {
        let name = non_blank(name).ok_or(ValidationError::BlankName)?;
        let id = self.ids.next_item_id();
        self.panel_items.push(PanelItem::ScheduleBreak(ScheduleBreak { id, name }));
        log::debug!("スケジュール区切り追加: {}", id);
        Ok(id)
    }

    pub fn rename_item(&mut self, id: ItemId, new_name: &str) -> Result<()> {
        let name = non_blank(new_name).ok_or(ValidationError::BlankName)?;
        let item = self
            .panel_items
            .iter_mut()
            .find(|i| i.id() == id)
            .ok_or(ValidationError::ItemNotFound(id))?;
        item.set_name(name);
        Ok(())
    }

    /// パネル項目を削除（シーケンスの場合は含まれるシーンも削除）
    pub fn remove_item(&mut self, id: ItemId) -> Result<PanelItem> {
        let index = self
            .panel_items
            .iter()
            .position(|i| i.id() == id)
            .ok_or(ValidationError::ItemNotFound(id))?;
        let removed = self.panel_items.remove(index);
        if self.active_item_id == Some(id) {
            self.active_item_id = None;
            self.ensure_active();
        }
        Ok(removed)
    }

    /// アクティブなシーケンスを切り替える（スケジュール区切りは不可）
    pub fn set_active(&mut self, id: ItemId) -> Result<()> {
        match self.item(id) {
            Some(PanelItem::Sequence(_)) => {
                self.active_item_id = Some(id);
                Ok(())
            }
            Some(PanelItem::ScheduleBreak(_)) => Err(ValidationError::NotASequence(id).into()),
            None => Err(ValidationError::ItemNotFound(id).into()),
        }
    }

    /// ドラッグによる並べ替え（表示位置で指定）
    pub fn reorder_items(&mut self, old_position: usize, new_position: usize) -> bool {
        reorder(&mut self.panel_items, old_position, new_position)
    }

    pub fn set_project_info(&mut self, info: ProjectInfo) {
        self.project_info = info;
    }

    // =============================================
    // シーンの操作
    // =============================================

    /// アクティブなシーケンスの末尾にシーンを追加
    pub fn add_scene(&mut self, fields: SceneFields) -> Result<SceneId> {
        let active = self.active_item_id.ok_or(ValidationError::NoActiveSequence)?;
        let index = self
            .panel_items
            .iter()
            .position(|i| i.id() == active && i.is_sequence())
            .ok_or(ValidationError::NoActiveSequence)?;

        let id = self.ids.next_scene_id();
        self.last_contact = fields.contact.clone();
        if let Some(seq) = self.panel_items[index].as_sequence_mut() {
            seq.scenes.push(SceneRecord::new(id, fields));
        }
        log::debug!("シーン追加: {} -> {}", id, active);
        Ok(id)
    }

    /// シーンの内容を置き換える（IDは保持）。見つからなければ false
    pub fn update_scene(&mut self, id: SceneId, fields: SceneFields) -> bool {
        let scene = self
            .panel_items
            .iter_mut()
            .filter_map(PanelItem::as_sequence_mut)
            .flat_map(|seq| seq.scenes.iter_mut())
            .find(|s| s.id == id);
        match scene {
            Some(scene) => {
                scene.fields = fields;
                true
            }
            None => false,
        }
    }

    /// シーンを削除。見つからなければ false
    pub fn delete_scene(&mut self, id: SceneId) -> bool {
        for seq in self.panel_items.iter_mut().filter_map(PanelItem::as_sequence_mut) {
            if let Some(pos) = seq.scenes.iter().position(|s| s.id == id) {
                seq.scenes.remove(pos);
                return true;
            }
        }
        false
    }

    /// 空の初期状態に戻す
    pub fn clear(&mut self) {
        let ids = std::mem::take(&mut self.ids);
        *self = Self { ids, ..Self::default() };
    }

    // =============================================
    // 不変条件の維持
    // =============================================

    /// `active_item_id` がシーケンスを指すよう補正する
    ///
    /// 未設定または無効なら、パネル順で最初のシーケンスを選ぶ。
    pub fn ensure_active(&mut self) {
        let valid = self.active_item_id.is_some_and(|id| self.sequence(id).is_some());
        if !valid {
            let first = self.sequences().next().map(|s| s.id);
            self.active_item_id = first;
        }
    }

    /// 読み込み後の内部状態を再構築（ID発行器と引き継ぎ連絡先）
    pub(crate) fn rebuild_session(&mut self) {
        let mut ids = IdGenerator::new();
        for item in &self.panel_items {
            ids.observe(item.id().0);
            if let Some(seq) = item.as_sequence() {
                for scene in &seq.scenes {
                    ids.observe(scene.id.0);
                }
            }
        }
        ids.observe(self.ids.last_issued());
        self.ids = ids;
        self.last_contact = self
            .active_sequence()
            .and_then(|seq| seq.scenes.last())
            .map(|s| s.fields.contact.clone())
            .unwrap_or_default();
    }
}
