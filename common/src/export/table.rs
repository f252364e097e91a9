//! スプレッドシート出力用のデータセット
//!
//! 各シートは「作品情報などのヘッダーブロック」「列見出し」「シーン行」で構成される。

use crate::error::{Error, Result};
use crate::filter::{filter_global, Filter};
use crate::format::{format_date_ddmmyyyy, format_time_12h, or_na};
use crate::ids::ItemId;
use crate::panel::{group_label_of, Sequence};
use crate::project::{ProjectInfo, ProjectState};
use crate::scene::SceneRecord;
use std::collections::HashSet;

/// シーン行の列見出し
pub const SCENE_COLUMNS: [&str; 15] = [
    "Scene #",
    "Description",
    "Setting",
    "Day/Night",
    "Date",
    "Time",
    "Type",
    "Shoot Location",
    "Pages",
    "Duration",
    "Status",
    "Cast",
    "Equipment",
    "Contact",
    "Notes",
];

/// Excelのシート名上限
pub const MAX_SHEET_NAME_LEN: usize = 31;

const FILTERED_SHEET_NAME: &str = "Filtered Results";

/// Excelが予約しているシート名
const RESERVED_SHEET_NAME: &str = "History";

/// 出力対象
#[derive(Debug, Clone, PartialEq)]
pub enum ExportScope {
    /// 1シーケンス
    Sequence(ItemId),
    /// シーンを持つ全シーケンス（1シーケンス1シート）
    FullProject,
    /// グローバルフィルタの結果
    Filtered(Filter),
}

/// 1シート分のデータ
#[derive(Debug, Clone, PartialEq)]
pub struct SheetData {
    pub name: String,
    /// ヘッダーブロック（空の行は空行として出力）
    pub header: Vec<Vec<String>>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// ブック全体
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookData {
    /// ファイル名の元になる表題（未加工）
    pub title: String,
    pub sheets: Vec<SheetData>,
}

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

/// シーン1件を列の並びに変換
pub fn scene_row(scene: &SceneRecord) -> Vec<String> {
    let f = &scene.fields;
    vec![
        f.number.clone(),
        f.description.clone(),
        f.scene_setting.clone(),
        f.day_night.map(|v| v.to_string()).unwrap_or_default(),
        format_date_ddmmyyyy(&f.date),
        format_time_12h(&f.time),
        f.scene_type.map(|v| v.to_string()).unwrap_or_default(),
        f.shoot_location.clone(),
        f.pages.clone(),
        f.duration.clone(),
        f.status.map(|v| v.to_string()).unwrap_or_default(),
        f.cast.clone(),
        f.equipment.clone(),
        f.contact.clone(),
        f.notes.clone(),
    ]
}

/// `/ \ ? * : [ ]` を除去し31文字に切り詰める
///
/// 先頭・末尾の `'` も除き、予約名 `History` は `History_` にする。
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | '?' | '*' | ':' | '[' | ']'))
        .collect();
    let mut sanitized: String = cleaned
        .trim_matches('\'')
        .chars()
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    // 切り詰めで末尾に残った分
    while sanitized.ends_with('\'') {
        sanitized.pop();
    }
    if sanitized.eq_ignore_ascii_case(RESERVED_SHEET_NAME) {
        sanitized.push('_');
    }
    sanitized
}

/// ブック内で重複しないシート名（Excelは大文字小文字を区別しない）
fn unique_sheet_name(used: &mut HashSet<String>, name: &str) -> String {
    let mut base = sanitize_sheet_name(name);
    if base.trim().is_empty() {
        base = "Sequence".to_string();
    }
    let mut candidate = base.clone();
    let mut n = 2;
    while used.contains(&candidate.to_lowercase()) {
        let suffix = format!(" ({})", n);
        let keep = MAX_SHEET_NAME_LEN.saturating_sub(suffix.chars().count());
        candidate = base.chars().take(keep).collect::<String>() + &suffix;
        n += 1;
    }
    used.insert(candidate.to_lowercase());
    candidate
}

fn sequence_header(info: &ProjectInfo, group_label: &str, sequence: &Sequence) -> Vec<Vec<String>> {
    vec![
        row(&["Production:", or_na(&info.prod_name), "", "Director:", or_na(&info.director_name)]),
        row(&["Contact:", or_na(&info.contact_number), "", "Email:", or_na(&info.contact_email)]),
        Vec::new(),
        vec![format!("Schedule Break: {}", group_label)],
        vec![format!("Sequence: {}", sequence.name)],
        Vec::new(),
    ]
}

fn sequence_sheet(state: &ProjectState, sequence: &Sequence, used: &mut HashSet<String>) -> SheetData {
    let group_label = group_label_of(&state.panel_items, sequence.id);
    SheetData {
        name: unique_sheet_name(used, &sequence.name),
        header: sequence_header(&state.project_info, group_label, sequence),
        columns: row(&SCENE_COLUMNS),
        rows: sequence.scenes.iter().map(scene_row).collect(),
    }
}

/// 出力対象からブックのデータを組み立てる
///
/// 出力するシーンが1件もない場合は `Error::Export`。
pub fn build_workbook(state: &ProjectState, scope: &ExportScope) -> Result<WorkbookData> {
    let mut used = HashSet::new();
    match scope {
        ExportScope::Sequence(id) => {
            let sequence = state
                .sequence(*id)
                .ok_or_else(|| Error::Export("シーケンスを選択してください".into()))?;
            if sequence.scenes.is_empty() {
                return Err(Error::Export(format!("\"{}\" にシーンがありません", sequence.name)));
            }
            Ok(WorkbookData {
                title: sequence.name.clone(),
                sheets: vec![sequence_sheet(state, sequence, &mut used)],
            })
        }
        ExportScope::FullProject => {
            let sheets: Vec<_> = state
                .sequences()
                .filter(|seq| !seq.scenes.is_empty())
                .map(|seq| sequence_sheet(state, seq, &mut used))
                .collect();
            if sheets.is_empty() {
                return Err(Error::Export("シーンを持つシーケンスがありません".into()));
            }
            let title = if state.project_info.prod_name.trim().is_empty() {
                "FullProject".to_string()
            } else {
                state.project_info.prod_name.clone()
            };
            Ok(WorkbookData { title, sheets })
        }
        ExportScope::Filtered(filter) => {
            let groups = filter_global(state, filter);
            if groups.is_empty() {
                return Err(Error::Export("フィルタに一致するシーンがありません".into()));
            }
            let info = &state.project_info;
            let header = vec![
                row(&["Production:", or_na(&info.prod_name)]),
                row(&["Director:", or_na(&info.director_name)]),
                Vec::new(),
                vec![format!("Filter: {} = \"{}\"", filter.field.key(), filter.value)],
                Vec::new(),
            ];
            let mut columns = row(&["Schedule Break", "Sequence"]);
            columns.extend(SCENE_COLUMNS.iter().map(|c| c.to_string()));
            let rows = groups
                .iter()
                .flat_map(|group| {
                    group.scenes.iter().map(move |scene| {
                        let mut cells = vec![group.group_label.to_string(), group.sequence.name.clone()];
                        cells.extend(scene_row(scene));
                        cells
                    })
                })
                .collect();
            Ok(WorkbookData {
                title: "Filtered_Results".to_string(),
                sheets: vec![SheetData {
                    name: unique_sheet_name(&mut used, FILTERED_SHEET_NAME),
                    header,
                    columns,
                    rows,
                }],
            })
        }
    }
}
