//! Excel生成（アプリ版）
//!
//! 共通ライブラリでブックを組み立て、ファイルに書き出す

use crate::error::{Result, ToshootError};
use regex::Regex;
use std::path::{Path, PathBuf};
use toshoot_common::export::excel_core::generate_excel_buffer;
use toshoot_common::export::{build_workbook, ExportScope, WorkbookData};
use toshoot_common::ProjectState;

/// 英数字以外を `_` に置き換える
pub fn sanitize_file_stem(title: &str) -> String {
    lazy_static::lazy_static! {
        static ref NON_ALNUM_RE: Regex = Regex::new(r"[^a-zA-Z0-9]").unwrap();
    }
    NON_ALNUM_RE.replace_all(title, "_").into_owned()
}

/// 出力ファイル名（`<表題>_Schedule.xlsx`）
pub fn file_name_for(book: &WorkbookData) -> String {
    format!("{}_Schedule.xlsx", sanitize_file_stem(&book.title))
}

/// ブックを組み立ててバッファに生成（ファイル名と内容）
pub fn generate_excel_bytes(state: &ProjectState, scope: &ExportScope) -> Result<(String, Vec<u8>)> {
    let book = build_workbook(state, scope).map_err(|e| {
        log::error!("Excel出力対象の組み立てに失敗: {}", e);
        ToshootError::Export(e.to_string())
    })?;
    let buffer = generate_excel_buffer(&book).map_err(|e| {
        log::error!("Excel生成に失敗: {}", e);
        ToshootError::Export(e)
    })?;
    Ok((file_name_for(&book), buffer))
}

/// Excelを生成して `output_dir` に保存
pub fn generate_excel(state: &ProjectState, scope: &ExportScope, output_dir: &Path) -> Result<PathBuf> {
    let (file_name, buffer) = generate_excel_bytes(state, scope)?;
    std::fs::create_dir_all(output_dir)?;
    let output_path = output_dir.join(file_name);
    std::fs::write(&output_path, buffer)
        .map_err(|e| ToshootError::Export(format!("{} に書き込めません: {}", output_path.display(), e)))?;
    log::info!("Excel出力: {}", output_path.display());
    Ok(output_path)
}
