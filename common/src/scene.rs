//! シーンレコードの型定義
//!
//! 保存済みデータは複数のスキーマ世代が混在するため、読み込みは寛容に行う:
//! - 数値で保存されたテキスト項目は文字列として読む
//! - 空文字・未知の列挙値は「未設定」として読む
//!
//! 旧フィールド名の読み替えは `normalize` で行う。

use crate::ids::SceneId;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// 昼 / 夜
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DayNight {
    #[serde(rename = "DAY")]
    Day,
    #[serde(rename = "NIGHT")]
    Night,
}

/// 室内 / 屋外
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SceneType {
    #[serde(rename = "INT")]
    Int,
    #[serde(rename = "EXT")]
    Ext,
    #[serde(rename = "INT/EXT")]
    IntExt,
}

/// 撮影状況
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SceneStatus {
    #[serde(rename = "Pending")]
    Pending,
    #[serde(rename = "NOT SHOT")]
    NotShot,
    #[serde(rename = "Done")]
    Done,
}

impl DayNight {
    pub const ALL: [DayNight; 2] = [DayNight::Day, DayNight::Night];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayNight::Day => "DAY",
            DayNight::Night => "NIGHT",
        }
    }
}

impl SceneType {
    pub const ALL: [SceneType; 3] = [SceneType::Int, SceneType::Ext, SceneType::IntExt];

    pub fn as_str(&self) -> &'static str {
        match self {
            SceneType::Int => "INT",
            SceneType::Ext => "EXT",
            SceneType::IntExt => "INT/EXT",
        }
    }
}

impl SceneStatus {
    pub const ALL: [SceneStatus; 3] = [SceneStatus::Pending, SceneStatus::NotShot, SceneStatus::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            SceneStatus::Pending => "Pending",
            SceneStatus::NotShot => "NOT SHOT",
            SceneStatus::Done => "Done",
        }
    }
}

macro_rules! str_enum_impls {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                <$ty>::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| format!("unknown value: {}", s))
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

str_enum_impls!(DayNight);
str_enum_impls!(SceneType);
str_enum_impls!(SceneStatus);

/// シーンの入力項目（IDを除く全フィールド）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneFields {
    #[serde(deserialize_with = "lenient_text")]
    pub number: String,

    #[serde(deserialize_with = "lenient_text")]
    pub description: String,

    #[serde(deserialize_with = "lenient_text")]
    pub scene_setting: String,

    #[serde(deserialize_with = "lenient_enum", skip_serializing_if = "Option::is_none")]
    pub day_night: Option<DayNight>,

    /// `YYYY-MM-DD` または空
    #[serde(deserialize_with = "lenient_text")]
    pub date: String,

    /// `HH:MM` または空
    #[serde(deserialize_with = "lenient_text")]
    pub time: String,

    #[serde(rename = "type", deserialize_with = "lenient_enum", skip_serializing_if = "Option::is_none")]
    pub scene_type: Option<SceneType>,

    #[serde(deserialize_with = "lenient_text")]
    pub shoot_location: String,

    #[serde(deserialize_with = "lenient_text")]
    pub pages: String,

    #[serde(deserialize_with = "lenient_text")]
    pub duration: String,

    #[serde(deserialize_with = "lenient_enum", skip_serializing_if = "Option::is_none")]
    pub status: Option<SceneStatus>,

    #[serde(deserialize_with = "lenient_text")]
    pub cast: String,

    #[serde(deserialize_with = "lenient_text")]
    pub equipment: String,

    #[serde(deserialize_with = "lenient_text")]
    pub contact: String,

    #[serde(deserialize_with = "lenient_text")]
    pub notes: String,
}

impl SceneFields {
    /// 新規入力フォームの初期値（直前の連絡先を引き継ぐ）
    pub fn template(contact: &str) -> Self {
        Self {
            day_night: Some(DayNight::Day),
            scene_type: Some(SceneType::Int),
            status: Some(SceneStatus::Pending),
            contact: contact.to_string(),
            ..Default::default()
        }
    }
}

/// シーンレコード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneRecord {
    pub id: SceneId,

    #[serde(flatten)]
    pub fields: SceneFields,
}

impl SceneRecord {
    pub fn new(id: SceneId, fields: SceneFields) -> Self {
        Self { id, fields }
    }
}

/// 文字列・数値・真偽値・null のいずれもテキストとして受け付ける
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        other => {
            log::warn!("テキスト項目に想定外の値: {}", other);
            String::new()
        }
    })
}

/// 空文字・未知の値は None として読む
fn lenient_enum<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = lenient_text(deserializer)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse() {
        Ok(v) => Ok(Some(v)),
        Err(_) => {
            log::warn!("未知の列挙値を未設定として読み込み: {}", trimmed);
            Ok(None)
        }
    }
}
