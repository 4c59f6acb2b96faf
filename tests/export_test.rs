//! エクスポートテスト
//!
//! 検索レポートのExcel・JSON出力を検証

use calamine::{open_workbook_auto, Data, Reader};
use dtc_search::export::{excel, export_reports};
use dtc_search::service::SearchReport;
use dtc_search_common::SearchMatch;
use tempfile::tempdir;

fn sample_match(row_number: usize, code: &str, score: u8) -> SearchMatch {
    SearchMatch {
        row_number,
        code_found: code.to_string(),
        model: "JUMPER".to_string(),
        subject: "PANNE FAP".to_string(),
        solution_q: "<p>F26 + BSM HS</p>".to_string(),
        solution_s: "<p>Fusible remplacé</p>".to_string(),
        success_probability: score,
    }
}

fn found_report(code: &str) -> SearchReport {
    SearchReport {
        success: true,
        query: code.to_lowercase(),
        code: code.to_string(),
        message: None,
        results: vec![sample_match(5, code, 85), sample_match(2, code, 40)],
        summary: "Vérifier le fusible F26 puis le BSM".to_string(),
        persisted: true,
    }
}

fn empty_report(code: &str) -> SearchReport {
    SearchReport {
        success: false,
        query: code.to_string(),
        code: code.to_string(),
        message: Some(format!("Aucun résultat trouvé pour le code {}", code)),
        results: Vec::new(),
        summary: String::new(),
        persisted: false,
    }
}

/// Excelバッファ生成
#[test]
fn test_generate_reports_buffer() {
    let buffer = excel::generate_reports_buffer(&[found_report("P15BE")]).unwrap();
    assert!(!buffer.is_empty());
    // xlsx は zip
    assert_eq!(&buffer[..2], b"PK");
}

/// Excel出力をcalamineで読み戻す
#[test]
fn test_export_excel_readable() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("results.xlsx");

    export_reports(&[found_report("P15BE"), empty_report("ZZZ")], &path).unwrap();

    let mut workbook = open_workbook_auto(&path).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["1-P15BE".to_string(), "2-ZZZ".to_string()]);

    let range = workbook.worksheet_range("1-P15BE").unwrap();
    assert_eq!(range.get_value((0, 0)), Some(&Data::String("Rang".to_string())));
    assert_eq!(range.get_value((1, 0)), Some(&Data::Float(1.0)));
    assert_eq!(range.get_value((1, 1)), Some(&Data::Float(5.0)));
    assert_eq!(range.get_value((1, 2)), Some(&Data::String("JUMPER".to_string())));
    assert_eq!(range.get_value((1, 6)), Some(&Data::Float(85.0)));
    assert_eq!(range.get_value((2, 6)), Some(&Data::Float(40.0)));

    let empty = workbook.worksheet_range("2-ZZZ").unwrap();
    assert_eq!(
        empty.get_value((1, 0)),
        Some(&Data::String("Aucun résultat trouvé pour le code ZZZ".to_string()))
    );
}

/// 1件はオブジェクト、複数は配列のJSON
#[test]
fn test_export_json_shape() {
    let dir = tempdir().expect("Failed to create temp dir");

    let single = dir.path().join("single.json");
    export_reports(&[found_report("P20EE")], &single).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&single).unwrap()).unwrap();
    assert!(value.is_object());
    assert_eq!(value["success"], true);
    assert_eq!(value["results"][0]["rowNumber"], 5);
    assert_eq!(value["results"][0]["successProbability"], 85);
    assert_eq!(value["results"][0]["modelVoiture"], "JUMPER");

    let many = dir.path().join("many.json");
    export_reports(&[found_report("P20EE"), empty_report("X1")], &many).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&many).unwrap()).unwrap();
    assert_eq!(value.as_array().map(|a| a.len()), Some(2));
    assert_eq!(value[1]["message"], "Aucun résultat trouvé pour le code X1");
    assert!(value[0].get("message").is_none());
}

/// アポストロフィで囲まれたコードでもExcel出力できる
#[test]
fn test_export_excel_quoted_code() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("quoted.xlsx");

    export_reports(&[found_report("'P15BE'")], &path).unwrap();

    let workbook = open_workbook_auto(&path).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["1-P15BE".to_string()]);
}
