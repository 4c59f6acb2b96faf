//! チケット行スキャナー
//!
//! ヘッダーを除いたデータ行を順に走査し、スキーマに従って
//! 5つのフィールドを取り出す。配列でない行は黙って読み飛ばす。

use crate::schema::{ColumnSchema, TicketField};
use crate::types::{Cell, RawGrid, RawRow, TicketRow};

/// 車種が空のときの表示
pub const UNKNOWN_MODEL: &str = "Modèle inconnu";
/// 解決策が空のときの表示
pub const UNSPECIFIED_SOLUTION: &str = "Non spécifié";

static EMPTY_CELL: Cell = Cell::Empty;

/// データ行を走査する
///
/// 行番号はファイル上の位置（ヘッダーが1行目なので最初のデータ行は2）。
pub fn scan_rows<'a>(
    grid: &'a RawGrid,
    schema: &'a ColumnSchema,
) -> impl Iterator<Item = TicketRow> + 'a {
    grid.rows
        .iter()
        .enumerate()
        .skip(1)
        .filter_map(move |(index, row)| extract_row(row, index + 1, schema))
}

/// 1行分のフィールドを取り出す
fn extract_row(row: &RawRow, row_number: usize, schema: &ColumnSchema) -> Option<TicketRow> {
    let cells = row.cells()?;
    let field = |f: TicketField| cells.get(schema.index(f)).unwrap_or(&EMPTY_CELL);

    Some(TicketRow {
        row_number,
        subject: text_or(field(TicketField::Subject), ""),
        model: text_or(field(TicketField::VehicleModel), UNKNOWN_MODEL),
        description: text_or(field(TicketField::Description), ""),
        solution_q: text_or(field(TicketField::Exchanges), UNSPECIFIED_SOLUTION),
        solution_s: text_or(field(TicketField::LastGarageExchange), UNSPECIFIED_SOLUTION),
    })
}

// 空白のみのセルも既定値に置き換える。数値の0は空扱いせず "0" のまま
fn text_or(cell: &Cell, placeholder: &str) -> String {
    if cell.is_blank() {
        placeholder.to_string()
    } else {
        cell.as_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_with(values: &[(usize, Cell)]) -> RawRow {
        let mut cells = vec![Cell::Empty; 19];
        for (i, v) in values {
            cells[*i] = v.clone();
        }
        RawRow::Cells(cells)
    }

    #[test]
    fn test_extract_row_fields() {
        let row = row_with(&[
            (4, Cell::from(" PANNE FAP ")),
            (7, Cell::from("JUMPER")),
            (8, Cell::from("DEFAUT P15BE")),
            (16, Cell::from("F26 + BSM HS")),
            (18, Cell::from("panne fusible f26")),
        ]);
        let ticket = extract_row(&row, 2, &ColumnSchema::positional()).unwrap();
        assert_eq!(ticket.row_number, 2);
        assert_eq!(ticket.subject, "PANNE FAP");
        assert_eq!(ticket.model, "JUMPER");
        assert_eq!(ticket.description, "DEFAUT P15BE");
        assert_eq!(ticket.solution_q, "F26 + BSM HS");
        assert_eq!(ticket.solution_s, "panne fusible f26");
    }

    #[test]
    fn test_extract_row_placeholders() {
        let row = row_with(&[(7, Cell::from("   "))]);
        let ticket = extract_row(&row, 5, &ColumnSchema::positional()).unwrap();
        assert_eq!(ticket.subject, "");
        assert_eq!(ticket.model, UNKNOWN_MODEL);
        assert_eq!(ticket.description, "");
        assert_eq!(ticket.solution_q, UNSPECIFIED_SOLUTION);
        assert_eq!(ticket.solution_s, UNSPECIFIED_SOLUTION);
    }

    #[test]
    fn test_extract_short_row() {
        let row = RawRow::Cells(vec![Cell::from("83388"), Cell::from("Web")]);
        let ticket = extract_row(&row, 2, &ColumnSchema::positional()).unwrap();
        assert_eq!(ticket.model, UNKNOWN_MODEL);
        assert_eq!(ticket.description, "");
    }

    #[test]
    fn test_extract_numeric_model() {
        let row = row_with(&[(7, Cell::Number(308.0))]);
        let ticket = extract_row(&row, 2, &ColumnSchema::positional()).unwrap();
        assert_eq!(ticket.model, "308");

        let zero = row_with(&[(7, Cell::Number(0.0))]);
        let ticket = extract_row(&zero, 2, &ColumnSchema::positional()).unwrap();
        assert_eq!(ticket.model, "0");
    }

    #[test]
    fn test_scan_skips_header_and_malformed_rows() {
        let grid = RawGrid::new(vec![
            row_with(&[(8, Cell::from("Description ticket"))]),
            row_with(&[(8, Cell::from("A"))]),
            RawRow::Malformed(serde_json::Value::String("broken".into())),
            row_with(&[(8, Cell::from("B"))]),
        ]);
        let schema = ColumnSchema::positional();
        let rows: Vec<TicketRow> = scan_rows(&grid, &schema).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].description, "A");
        assert_eq!(rows[0].row_number, 2);
        assert_eq!(rows[1].description, "B");
        assert_eq!(rows[1].row_number, 4);
    }
}
