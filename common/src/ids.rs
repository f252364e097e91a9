//! 時刻ベースの一意ID
//!
//! パネル項目とシーンはどちらもミリ秒タイムスタンプをIDとして持つ。
//! 同一ミリ秒内に複数作成しても重複しないよう、直前に発行した値より
//! 必ず大きい値を返す。

use serde::{Deserialize, Serialize};
use std::fmt;

/// パネル項目（シーケンス / スケジュール区切り）のID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

/// シーンのID（プロジェクト全体で一意）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(pub i64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 単調増加IDの発行器
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 既存のIDを登録し、以後それより大きい値だけを発行する
    pub fn observe(&mut self, id: i64) {
        if id > self.last {
            self.last = id;
        }
    }

    /// 最後に発行（または登録）した値
    pub fn last_issued(&self) -> i64 {
        self.last
    }

    /// 次のIDを発行
    pub fn next(&mut self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        self.last = now.max(self.last + 1);
        self.last
    }

    pub fn next_item_id(&mut self) -> ItemId {
        ItemId(self.next())
    }

    pub fn next_scene_id(&mut self) -> SceneId {
        SceneId(self.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_strictly_increase() {
        let mut ids = IdGenerator::new();
        let a = ids.next();
        let b = ids.next();
        let c = ids.next();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_observe_future_id() {
        let mut ids = IdGenerator::new();
        // 時計より進んだIDが保存されていても重複しない
        let future = chrono::Utc::now().timestamp_millis() + 1_000_000;
        ids.observe(future);
        assert_eq!(ids.next(), future + 1);
    }

    #[test]
    fn test_id_serializes_as_number() {
        let json = serde_json::to_string(&ItemId(1700000000000)).expect("シリアライズ失敗");
        assert_eq!(json, "1700000000000");
        let id: SceneId = serde_json::from_str("12").expect("デシリアライズ失敗");
        assert_eq!(id, SceneId(12));
    }
}
