//! Excel生成（共通ライブラリ）
//!
//! table.rs のデータセットを撮影スケジュール表形式のxlsxに書き出す

use super::table::{SheetData, WorkbookData};
use rust_xlsxwriter::*;

/// 列幅（文字数単位）。列見出しの並びに対応し、超過分は既定幅
const COLUMN_WIDTHS: [f64; 17] = [
    10.0, 36.0, 18.0, 10.0, 12.0, 10.0, 9.0, 20.0, 8.0, 10.0, 11.0, 24.0, 20.0, 18.0, 30.0, 14.0, 14.0,
];

fn write_sheet(workbook: &mut Workbook, sheet: &SheetData) -> Result<(), String> {
    let label_format = Format::new().set_bold();

    let column_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(0x1F2937))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    let cell_format = Format::new()
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&sheet.name)
        .map_err(|e| format!("シート名設定エラー ({}): {}", sheet.name, e))?;

    for (col, _) in sheet.columns.iter().enumerate() {
        let width = COLUMN_WIDTHS.get(col).copied().unwrap_or(14.0);
        worksheet.set_column_width(col as u16, width)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
    }

    let mut current_row: u32 = 0;

    // ヘッダーブロック（"Production:" などのラベルセルは太字）
    for header_row in &sheet.header {
        for (col, value) in header_row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let col = col as u16;
            let written = if value.ends_with(':') {
                worksheet.write_string_with_format(current_row, col, value, &label_format)
            } else {
                worksheet.write_string(current_row, col, value)
            };
            written.map_err(|e| format!("ヘッダー書き込みエラー: {}", e))?;
        }
        current_row += 1;
    }

    // 列見出し
    for (col, title) in sheet.columns.iter().enumerate() {
        worksheet.write_string_with_format(current_row, col as u16, title, &column_format)
            .map_err(|e| format!("列見出し書き込みエラー: {}", e))?;
    }
    let column_row = current_row;
    current_row += 1;

    for data_row in &sheet.rows {
        for (col, value) in data_row.iter().enumerate() {
            worksheet.write_string_with_format(current_row, col as u16, value, &cell_format)
                .map_err(|e| format!("セル書き込みエラー: {}", e))?;
        }
        current_row += 1;
    }

    worksheet.set_freeze_panes(column_row + 1, 0)
        .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;

    Ok(())
}

/// Excelをバッファに生成
pub fn generate_excel_buffer(book: &WorkbookData) -> Result<Vec<u8>, String> {
    if book.sheets.is_empty() {
        return Err("出力するシートがありません".to_string());
    }

    let mut workbook = Workbook::new();
    for sheet in &book.sheets {
        write_sheet(&mut workbook, sheet)?;
    }

    workbook.save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}
