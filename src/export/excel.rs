//! 検索結果のExcel出力
//!
//! コードごとに1シート。ランキング表の下にAI要約を書く。

use crate::error::Result;
use crate::service::SearchReport;
use rust_xlsxwriter::*;
use std::path::Path;

const HEADERS: [(&str, f64); 7] = [
    ("Rang", 6.0),
    ("Ligne", 7.0),
    ("Modèle", 16.0),
    ("Sujet", 24.0),
    ("Échanges (Q)", 60.0),
    ("Dernier échange (S)", 60.0),
    ("Probabilité (%)", 14.0),
];

pub fn write_reports_xlsx(reports: &[SearchReport], output_path: &Path) -> Result<()> {
    let buffer = generate_reports_buffer(reports)?;
    std::fs::write(output_path, buffer)?;
    Ok(())
}

/// Excelをバッファに生成
pub fn generate_reports_buffer(reports: &[SearchReport]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xAAAAAA));

    let value_format = Format::new()
        .set_align(FormatAlign::Top)
        .set_text_wrap()
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let label_format = Format::new().set_bold();

    for (idx, report) in reports.iter().enumerate() {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name(&report.code, idx))?;

        for (col, (title, width)) in HEADERS.iter().enumerate() {
            worksheet.set_column_width(col as u16, *width)?;
            worksheet.write_string_with_format(0, col as u16, *title, &header_format)?;
        }

        let mut row: u32 = 1;
        for (rank, m) in report.results.iter().enumerate() {
            worksheet.write_number_with_format(row, 0, (rank + 1) as f64, &value_format)?;
            worksheet.write_number_with_format(row, 1, m.row_number as f64, &value_format)?;
            worksheet.write_string_with_format(row, 2, &m.model, &value_format)?;
            worksheet.write_string_with_format(row, 3, &m.subject, &value_format)?;
            worksheet.write_string_with_format(row, 4, &m.solution_q, &value_format)?;
            worksheet.write_string_with_format(row, 5, &m.solution_s, &value_format)?;
            worksheet.write_number_with_format(row, 6, m.success_probability as f64, &value_format)?;
            row += 1;
        }

        if let Some(message) = &report.message {
            worksheet.write_string(row, 0, message)?;
            row += 1;
        }

        row += 1;
        worksheet.write_string_with_format(row, 0, "Code", &label_format)?;
        worksheet.write_string(row, 2, &report.query)?;
        if !report.summary.is_empty() {
            row += 1;
            worksheet.write_string_with_format(row, 0, "Résumé IA", &label_format)?;
            worksheet.write_string(row, 2, &report.summary)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// シート名（31文字以内、使用不可文字を置換、重複回避に番号付き）
///
/// 先頭・末尾のアポストロフィはExcelが受け付けないので取り除く。
fn sheet_name(code: &str, idx: usize) -> String {
    let cleaned: String = code
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            _ => c,
        })
        .collect();
    let truncated: String = cleaned.trim_matches('\'').chars().take(26).collect();
    let base = truncated.trim_end_matches('\'');
    if base.is_empty() {
        format!("{}", idx + 1)
    } else {
        format!("{}-{}", idx + 1, base)
    }
}
