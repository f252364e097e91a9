//! Export core shared by the application shell.
//!
//! `table` builds the tabular dataset; `excel_core` writes it as xlsx.

pub mod table;

#[cfg(feature = "excel")]
pub mod excel_core;

pub use table::{build_workbook, ExportScope, SheetData, WorkbookData, SCENE_COLUMNS};
