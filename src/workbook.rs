//! チケット表の読み込み
//!
//! Excel（xlsx / xls / ods）は calamine で最初のシートを読み、生グリッドに変換する。
//! `.json` は行の配列（各行はセルの配列）として読み込む。

use crate::error::{DtcSearchError, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use dtc_search_common::{Cell, RawGrid, RawRow};
use sha2::{Digest, Sha256};
use std::io::Cursor;
use std::path::Path;

/// 読み込み済みのチケット表
#[derive(Debug, Clone)]
pub struct LoadedWorkbook {
    pub file_name: String,
    /// 内容のSHA-256（履歴でのファイル識別に使う）
    pub file_key: String,
    pub grid: RawGrid,
}

impl LoadedWorkbook {
    /// ヘッダーを除いた行数
    pub fn row_count(&self) -> usize {
        self.grid.data_row_count()
    }
}

/// ファイルを読み込み、ヘッダー＋1行以上あることを確認する
pub fn load_workbook(path: &Path) -> Result<LoadedWorkbook> {
    if !path.exists() {
        return Err(DtcSearchError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let is_json = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let grid = if is_json {
        serde_json::from_slice::<RawGrid>(&bytes)?
    } else {
        parse_workbook_bytes(&bytes)?
    };
    ensure_not_empty(&grid)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    tracing::debug!(file = %file_name, rows = grid.rows.len(), "チケット表を読み込みました");

    Ok(LoadedWorkbook {
        file_name,
        file_key: file_fingerprint(&bytes),
        grid,
    })
}

/// メモリ上のExcelデータから最初のシートを読む
pub fn parse_workbook_bytes(bytes: &[u8]) -> Result<RawGrid> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DtcSearchError::Workbook("シートがありません".into()))??;

    // 行は使用範囲の先頭から（先頭行がヘッダー）。列は開始位置まで空セルで埋め、
    // 固定列レイアウトの位置をファイル上の列に揃える
    let start_col = range.start().map(|(_, c)| c as usize).unwrap_or(0);

    let rows = range
        .rows()
        .map(|row| {
            let mut cells = vec![Cell::Empty; start_col];
            cells.extend(row.iter().map(convert_cell));
            RawRow::Cells(cells)
        })
        .collect();

    Ok(RawGrid::new(rows))
}

/// 空、またはヘッダーのみの表を拒否
pub fn ensure_not_empty(grid: &RawGrid) -> Result<()> {
    if grid.rows.len() < 2 {
        return Err(DtcSearchError::EmptyWorkbook);
    }
    Ok(())
}

/// 内容のSHA-256（16進）
pub fn file_fingerprint(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(e.to_string()),
        Data::Empty => Cell::Empty,
    }
}
