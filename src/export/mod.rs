pub mod excel;

use crate::error::Result;
use crate::service::SearchReport;
use std::path::Path;

/// 検索レポートをJSONで保存（1件ならオブジェクト、複数なら配列）
pub fn write_reports_json(reports: &[SearchReport], output_path: &Path) -> Result<()> {
    let json = match reports {
        [single] => serde_json::to_string_pretty(single)?,
        _ => serde_json::to_string_pretty(reports)?,
    };
    std::fs::write(output_path, json)?;
    Ok(())
}

/// 拡張子で出力形式を決める（.xlsx → Excel、それ以外 → JSON）
pub fn export_reports(reports: &[SearchReport], output_path: &Path) -> Result<()> {
    let is_excel = output_path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("xlsx"))
        .unwrap_or(false);

    if is_excel {
        println!("- Excelを生成中...");
        excel::write_reports_xlsx(reports, output_path)?;
        println!("✔ Excel出力: {}", output_path.display());
    } else {
        write_reports_json(reports, output_path)?;
        println!("✔ 結果を保存: {}", output_path.display());
    }

    Ok(())
}
