//! グリッドと検索結果の型定義
//!
//! CLIとエンジンで共有される型:
//! - Cell / RawRow / RawGrid: スプレッドシートを解析した生グリッド
//! - TicketRow: スキャナーが列から取り出した1チケット分のフィールド
//! - SearchMatch: 照合・スコア計算済みの検索結果

use serde::{Deserialize, Serialize};

/// セル値（テキスト・数値・真偽値・空）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
    #[default]
    Empty,
}

impl Cell {
    /// 前後の空白を除いたテキストに変換
    pub fn as_text(&self) -> String {
        match self {
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::Empty => String::new(),
        }
    }

    /// 空セル、または空白のみのテキスト
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Empty => true,
            _ => false,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Number(n as f64)
    }
}

/// グリッドの1行
///
/// 配列でない行（JSON由来の壊れた行など）は `Malformed` として保持し、
/// スキャン時に読み飛ばす。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRow {
    Cells(Vec<Cell>),
    Malformed(serde_json::Value),
}

impl RawRow {
    pub fn cells(&self) -> Option<&[Cell]> {
        match self {
            RawRow::Cells(cells) => Some(cells),
            RawRow::Malformed(_) => None,
        }
    }
}

/// 1シート分の生グリッド（行0はヘッダー）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawGrid {
    pub rows: Vec<RawRow>,
}

impl RawGrid {
    pub fn new(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }

    /// テキスト行からグリッドを作る（テスト・フィクスチャ用）
    pub fn from_text_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> Self {
        let rows = rows
            .iter()
            .map(|row| RawRow::Cells(row.iter().map(|s| Cell::from(s.as_ref())).collect()))
            .collect();
        Self { rows }
    }

    pub fn header(&self) -> Option<&[Cell]> {
        self.rows.first().and_then(|row| row.cells())
    }

    /// ヘッダーを除いた行数
    pub fn data_row_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }
}

/// スキャン済みのチケット行
#[derive(Debug, Clone, PartialEq)]
pub struct TicketRow {
    /// ファイル上の行番号（1始まり、ヘッダー込み）
    pub row_number: usize,
    pub subject: String,
    pub model: String,
    pub description: String,
    pub solution_q: String,
    pub solution_s: String,
}

impl TicketRow {
    /// スコア計算に使う結合テキスト（Q + 空白 + S）
    pub fn combined_solution(&self) -> String {
        format!("{} {}", self.solution_q, self.solution_s)
    }
}

/// 検索結果1件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatch {
    #[serde(rename = "rowNumber")]
    pub row_number: usize,

    /// 正規化済みの検索コード
    #[serde(rename = "codeFound")]
    pub code_found: String,

    #[serde(rename = "modelVoiture")]
    pub model: String,

    #[serde(rename = "sujet")]
    pub subject: String,

    #[serde(rename = "solutionQ")]
    pub solution_q: String,

    #[serde(rename = "solutionS")]
    pub solution_s: String,

    /// 成功確率（20〜100）
    #[serde(rename = "successProbability")]
    pub success_probability: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_as_text() {
        assert_eq!(Cell::from("  PANNE FAP ").as_text(), "PANNE FAP");
        assert_eq!(Cell::Number(2012.0).as_text(), "2012");
        assert_eq!(Cell::Number(1.5).as_text(), "1.5");
        assert_eq!(Cell::Bool(true).as_text(), "true");
        assert_eq!(Cell::Empty.as_text(), "");
    }

    #[test]
    fn test_cell_is_blank() {
        assert!(Cell::Empty.is_blank());
        assert!(Cell::from("   ").is_blank());
        assert!(!Cell::Number(0.0).is_blank());
        assert!(!Cell::from("x").is_blank());
    }

    #[test]
    fn test_grid_from_json_with_malformed_row() {
        let json = r#"[["id", "Sujet"], [83388, "PANNE FAP"], "not a row", [null, true]]"#;
        let grid: RawGrid = serde_json::from_str(json).unwrap();
        assert_eq!(grid.rows.len(), 4);
        assert_eq!(grid.data_row_count(), 3);
        assert_eq!(
            grid.rows[1].cells(),
            Some(&[Cell::Number(83388.0), Cell::from("PANNE FAP")][..])
        );
        assert!(matches!(grid.rows[2], RawRow::Malformed(_)));
        assert_eq!(grid.rows[2].cells(), None);
        assert_eq!(grid.rows[3].cells(), Some(&[Cell::Empty, Cell::Bool(true)][..]));
    }

    #[test]
    fn test_search_match_json_keys() {
        let m = SearchMatch {
            row_number: 3,
            code_found: "P20EE".to_string(),
            model: "308".to_string(),
            subject: "PANNE MOTEUR".to_string(),
            solution_q: "Remplacement capteur O2".to_string(),
            solution_s: "Capteur remplacé".to_string(),
            success_probability: 75,
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["rowNumber"], 3);
        assert_eq!(json["codeFound"], "P20EE");
        assert_eq!(json["modelVoiture"], "308");
        assert_eq!(json["sujet"], "PANNE MOTEUR");
        assert_eq!(json["successProbability"], 75);
    }
}
