//! パネル項目（シーケンス / スケジュール区切り）

use crate::ids::{ItemId, SceneId};
use crate::scene::SceneRecord;
use serde::{Deserialize, Serialize};

/// 先行するスケジュール区切りがないシーケンスのグループ名
pub const UNCATEGORIZED: &str = "Uncategorized";

/// シーンをまとめる名前付きの並び
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub scenes: Vec<SceneRecord>,
}

/// 以降のシーケンスに付くラベル（例: "DAY 1"）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleBreak {
    pub id: ItemId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PanelItem {
    Sequence(Sequence),
    ScheduleBreak(ScheduleBreak),
}

impl Sequence {
    pub fn scene(&self, id: SceneId) -> Option<&SceneRecord> {
        self.scenes.iter().find(|s| s.id == id)
    }
}

impl PanelItem {
    pub fn id(&self) -> ItemId {
        match self {
            PanelItem::Sequence(seq) => seq.id,
            PanelItem::ScheduleBreak(brk) => brk.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PanelItem::Sequence(seq) => &seq.name,
            PanelItem::ScheduleBreak(brk) => &brk.name,
        }
    }

    pub fn set_name(&mut self, name: String) {
        match self {
            PanelItem::Sequence(seq) => seq.name = name,
            PanelItem::ScheduleBreak(brk) => brk.name = name,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            PanelItem::Sequence(seq) => Some(seq),
            PanelItem::ScheduleBreak(_) => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Sequence> {
        match self {
            PanelItem::Sequence(seq) => Some(seq),
            PanelItem::ScheduleBreak(_) => None,
        }
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, PanelItem::Sequence(_))
    }
}

/// 各シーケンスに、直前のスケジュール区切り名（なければ `Uncategorized`）を付けて列挙
pub fn labeled_sequences(items: &[PanelItem]) -> impl Iterator<Item = (&str, &Sequence)> {
    let mut label = UNCATEGORIZED;
    items.iter().filter_map(move |item| match item {
        PanelItem::ScheduleBreak(brk) => {
            label = brk.name.as_str();
            None
        }
        PanelItem::Sequence(seq) => Some((label, seq)),
    })
}

/// 指定シーケンスのグループ名
pub fn group_label_of(items: &[PanelItem], id: ItemId) -> &str {
    labeled_sequences(items)
        .find(|(_, seq)| seq.id == id)
        .map(|(label, _)| label)
        .unwrap_or(UNCATEGORIZED)
}
