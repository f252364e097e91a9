//! フィルタエンジン
//!
//! - スコープモード: アクティブなシーケンスのシーンだけを対象にする
//! - グローバルモード: 全シーケンスを対象に、直前のスケジュール区切りでグループ化する
//!
//! 照合は「項目値を小文字化した文字列が、小文字化した検索文字列を含むか」。
//! 値が未設定の項目は検索文字列に関わらず不一致。

use crate::panel::{labeled_sequences, Sequence};
use crate::project::ProjectState;
use crate::scene::{DayNight, SceneRecord, SceneStatus, SceneType};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashSet;

/// フィルタ対象の項目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterField {
    #[default]
    All,
    Number,
    Description,
    SceneSetting,
    DayNight,
    Date,
    Time,
    #[serde(rename = "type")]
    Type,
    ShootLocation,
    Pages,
    Duration,
    Status,
    Cast,
    Equipment,
    Contact,
    Notes,
}

impl FilterField {
    /// 保存データ上の項目名
    pub fn key(&self) -> &'static str {
        match self {
            FilterField::All => "all",
            FilterField::Number => "number",
            FilterField::Description => "description",
            FilterField::SceneSetting => "sceneSetting",
            FilterField::DayNight => "dayNight",
            FilterField::Date => "date",
            FilterField::Time => "time",
            FilterField::Type => "type",
            FilterField::ShootLocation => "shootLocation",
            FilterField::Pages => "pages",
            FilterField::Duration => "duration",
            FilterField::Status => "status",
            FilterField::Cast => "cast",
            FilterField::Equipment => "equipment",
            FilterField::Contact => "contact",
            FilterField::Notes => "notes",
        }
    }

    /// 選択式フィルタの候補（自由入力の項目は None）
    pub fn choices(&self) -> Option<Vec<&'static str>> {
        match self {
            FilterField::Status => Some(SceneStatus::ALL.iter().map(|v| v.as_str()).collect()),
            FilterField::DayNight => Some(DayNight::ALL.iter().map(|v| v.as_str()).collect()),
            FilterField::Type => Some(SceneType::ALL.iter().map(|v| v.as_str()).collect()),
            _ => None,
        }
    }
}

impl SceneRecord {
    /// 項目値を文字列で取得（未設定・空は None）
    pub fn field_text(&self, field: FilterField) -> Option<Cow<'_, str>> {
        let f = &self.fields;
        let text: &str = match field {
            FilterField::All => return None,
            FilterField::Number => &f.number,
            FilterField::Description => &f.description,
            FilterField::SceneSetting => &f.scene_setting,
            FilterField::DayNight => return f.day_night.map(|v| Cow::Borrowed(v.as_str())),
            FilterField::Date => &f.date,
            FilterField::Time => &f.time,
            FilterField::Type => return f.scene_type.map(|v| Cow::Borrowed(v.as_str())),
            FilterField::ShootLocation => &f.shoot_location,
            FilterField::Pages => &f.pages,
            FilterField::Duration => &f.duration,
            FilterField::Status => return f.status.map(|v| Cow::Borrowed(v.as_str())),
            FilterField::Cast => &f.cast,
            FilterField::Equipment => &f.equipment,
            FilterField::Contact => &f.contact,
            FilterField::Notes => &f.notes,
        };
        if text.is_empty() {
            None
        } else {
            Some(Cow::Borrowed(text))
        }
    }
}

/// (項目, 部分文字列) のフィルタ
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub field: FilterField,
    pub value: String,
}

impl Filter {
    /// 絞り込みなし
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(field: FilterField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into().trim().to_string(),
        }
    }

    /// 項目が指定され、検索文字列が空でないとき有効
    pub fn is_active(&self) -> bool {
        self.field != FilterField::All && !self.value.is_empty()
    }

    pub fn matches(&self, scene: &SceneRecord) -> bool {
        if self.field == FilterField::All {
            return true;
        }
        match scene.field_text(self.field) {
            Some(text) => text.to_lowercase().contains(&self.value.to_lowercase()),
            None => false,
        }
    }
}

/// グローバルフィルタの1グループ
#[derive(Debug, Clone, PartialEq)]
pub struct FilterGroup<'a> {
    pub group_label: &'a str,
    pub sequence: &'a Sequence,
    pub scenes: Vec<&'a SceneRecord>,
}

/// アクティブなシーケンス内で絞り込む（挿入順を維持）
pub fn filter_scoped<'a>(state: &'a ProjectState, filter: &Filter) -> Vec<&'a SceneRecord> {
    state
        .active_sequence()
        .map(|seq| seq.scenes.iter().filter(|s| filter.matches(s)).collect())
        .unwrap_or_default()
}

/// 全シーケンスを対象に絞り込み、パネル順でグループ化する
///
/// 一致するシーンのないシーケンスはグループごと省略する。
pub fn filter_global<'a>(state: &'a ProjectState, filter: &Filter) -> Vec<FilterGroup<'a>> {
    labeled_sequences(&state.panel_items)
        .filter_map(|(group_label, sequence)| {
            let scenes: Vec<_> = sequence.scenes.iter().filter(|s| filter.matches(s)).collect();
            if scenes.is_empty() {
                None
            } else {
                Some(FilterGroup { group_label, sequence, scenes })
            }
        })
        .collect()
}

/// アクティブなシーケンスで観測された値の一覧（重複なし・自然順）
pub fn distinct_values(state: &ProjectState, field: FilterField) -> Vec<String> {
    let Some(seq) = state.active_sequence() else {
        return Vec::new();
    };
    let mut seen = HashSet::new();
    let mut values: Vec<String> = seq
        .scenes
        .iter()
        .filter_map(|s| s.field_text(field))
        .map(|v| v.into_owned())
        .filter(|v| seen.insert(v.clone()))
        .collect();
    values.sort_by(|a, b| natural_cmp(a, b));
    values
}

/// 大文字小文字を無視し、数字の並びは数値として比較する（"2" < "10"）
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();
    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let ln = take_digits(&mut left);
                let rn = take_digits(&mut right);
                let ord = compare_digit_runs(&ln, &rn);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(l), Some(r)) => {
                let ord = l.to_lowercase().cmp(r.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        digits.push(c);
    }
    digits
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// ページ分割の結果
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1始まり
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<'_, T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// ページ番号は `1..=total_pages` に丸める（空でも1ページ）
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    let per_page = per_page.max(1);
    let total_pages = items.len().div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);
    let start = (page - 1) * per_page;
    let end = std::cmp::min(start + per_page, items.len());
    Page {
        items: &items[start..end],
        page,
        total_pages,
        total_items: items.len(),
    }
}
