//! 表示用の日付・時刻フォーマット

use chrono::{NaiveDate, NaiveTime};

/// 値がないときの表示
pub const NOT_AVAILABLE: &str = "N/A";

/// `YYYY-MM-DD` → `DD/MM/YYYY`
///
/// 空なら `N/A`、解釈できない値はそのまま返す。
pub fn format_date_ddmmyyyy(date: &str) -> String {
    let date = date.trim();
    if date.is_empty() {
        return NOT_AVAILABLE.to_string();
    }
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => d.format("%d/%m/%Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// `HH:MM`（24時間）→ `h:MM AM/PM`
///
/// 空なら `N/A`、解釈できない値はそのまま返す。
pub fn format_time_12h(time: &str) -> String {
    let time = time.trim();
    if time.is_empty() {
        return NOT_AVAILABLE.to_string();
    }
    NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .map(|t| t.format("%-I:%M %p").to_string())
        .unwrap_or_else(|_| time.to_string())
}

/// 空文字を `N/A` に置き換える
pub fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_AVAILABLE
    } else {
        value
    }
}
