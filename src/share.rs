//! 共有（プロジェクト概要テキスト・シーンカード）
//!
//! カードの画像化や共有シート・クリップボードは `ShareSurface` の実装側が担う。

use crate::error::{Result, ToshootError};
use toshoot_common::format::{format_date_ddmmyyyy, format_time_12h, or_na};
use toshoot_common::panel::group_label_of;
use toshoot_common::{ProjectState, SceneId};

const BRAND: &str = "ToshooT";

/// シーン1件の共有カード（固定レイアウト）
#[derive(Debug, Clone, PartialEq)]
pub struct ShareCard {
    pub title: String,
    pub subtitle: String,
    pub rows: Vec<(String, String)>,
    pub footer_production: String,
    pub footer_director: String,
    pub brand: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SharePayload<'a> {
    Text {
        title: String,
        text: String,
    },
    Card {
        title: String,
        text: String,
        file_name: String,
        card: &'a ShareCard,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    /// 共有シートが閉じられた
    Cancelled,
    CopiedToClipboard,
    Downloaded,
}

/// 端末の共有機能
pub trait ShareSurface {
    fn can_share_text(&self) -> bool;
    fn can_share_files(&self) -> bool;
    fn share(&mut self, payload: &SharePayload<'_>) -> std::result::Result<(), String>;
    fn copy_to_clipboard(&mut self, text: &str) -> std::result::Result<(), String>;
    /// カードをPNGとして保存
    fn download(&mut self, file_name: &str, card: &ShareCard) -> std::result::Result<(), String>;
}

/// プロジェクト概要テキスト
pub fn project_summary_text(state: &ProjectState) -> String {
    let info = &state.project_info;
    format!(
        "*ToshooT Project Summary*\nProduction: {}\nDirector: {}\nContact: {}\n\nTotal Sequences: {}\nTotal Scenes: {}",
        or_na(&info.prod_name),
        or_na(&info.director_name),
        or_na(&info.contact_number),
        state.sequence_count(),
        state.scene_count(),
    )
}

/// シーンの共有カード
pub fn scene_card(state: &ProjectState, scene_id: SceneId) -> Option<ShareCard> {
    let (sequence, scene) = state.find_scene(scene_id)?;
    let f = &scene.fields;
    let group_label = group_label_of(&state.panel_items, sequence.id);

    let setting = format!(
        "{} {} - {}",
        f.scene_type.map(|v| v.as_str()).unwrap_or(""),
        f.scene_setting,
        f.day_night.map(|v| v.as_str()).unwrap_or(""),
    );
    let mut rows = vec![
        ("Scene Setting".to_string(), setting.trim().to_string()),
        ("Description".to_string(), or_na(&f.description).to_string()),
        ("Pages".to_string(), or_na(&f.pages).to_string()),
        ("Cast".to_string(), or_na(&f.cast).to_string()),
        ("Date".to_string(), format_date_ddmmyyyy(&f.date)),
        ("Time".to_string(), format_time_12h(&f.time)),
        ("Shoot Location".to_string(), or_na(&f.shoot_location).to_string()),
        ("Contact".to_string(), or_na(&f.contact).to_string()),
    ];
    if !f.notes.trim().is_empty() {
        rows.push(("Notes".to_string(), f.notes.clone()));
    }

    let info = &state.project_info;
    Some(ShareCard {
        title: format!("Scene {}", or_na(&f.number)),
        subtitle: format!("{} / {}", group_label, sequence.name),
        rows,
        footer_production: if info.prod_name.trim().is_empty() {
            "Production".to_string()
        } else {
            info.prod_name.clone()
        },
        footer_director: if info.director_name.trim().is_empty() {
            String::new()
        } else {
            format!("Dir: {}", info.director_name)
        },
        brand: BRAND.to_string(),
    })
}

/// プロジェクト概要を共有（共有シート → クリップボードの順に試す）
pub fn share_project(surface: &mut dyn ShareSurface, state: &ProjectState) -> Result<ShareOutcome> {
    let text = project_summary_text(state);
    if surface.can_share_text() {
        let payload = SharePayload::Text {
            title: format!("Project: {}", non_empty_or(&state.project_info.prod_name, "Untitled")),
            text,
        };
        return Ok(match surface.share(&payload) {
            Ok(()) => ShareOutcome::Shared,
            Err(e) => {
                log::warn!("共有に失敗しました: {}", e);
                ShareOutcome::Cancelled
            }
        });
    }
    surface.copy_to_clipboard(&text).map_err(|e| {
        log::warn!("クリップボードへのコピーに失敗: {}", e);
        ToshootError::ShareUnavailable(format!("共有機能がなく、クリップボードへのコピーにも失敗しました: {}", e))
    })?;
    Ok(ShareOutcome::CopiedToClipboard)
}

/// シーンカードを共有（ファイル共有に対応していなければPNGとして保存）
pub fn share_scene(surface: &mut dyn ShareSurface, state: &ProjectState, scene_id: SceneId) -> Result<ShareOutcome> {
    let card = scene_card(state, scene_id)
        .ok_or_else(|| ToshootError::Export(format!("シーンが見つかりません: {}", scene_id)))?;
    let number = state
        .find_scene(scene_id)
        .map(|(_, s)| s.fields.number.clone())
        .unwrap_or_default();
    let file_name = format!("Scene_{}.png", number);

    let result = if surface.can_share_files() {
        let payload = SharePayload::Card {
            title: format!("Shooting Info: Scene {}", number),
            text: format!("Details for Scene {}", number),
            file_name,
            card: &card,
        };
        surface.share(&payload).map(|_| ShareOutcome::Shared)
    } else {
        surface.download(&file_name, &card).map(|_| ShareOutcome::Downloaded)
    };
    result.map_err(|e| {
        log::error!("シーンの共有に失敗: {}", e);
        ToshootError::Export(format!("共有画像を生成できません: {}", e))
    })
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}
