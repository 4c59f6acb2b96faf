//! 対話式検索モジュール
//!
//! チケット表を一度だけ読み込み、故障コードを繰り返し入力して検索する。

use crate::error::{DtcSearchError, Result};
use crate::history::PersistenceSink;
use crate::report::print_report;
use crate::service::SearchService;
use crate::workbook::LoadedWorkbook;
use dialoguer::Input;

/// 対話アクション
#[derive(Debug, PartialEq, Eq)]
pub enum InteractiveAction {
    /// コードを検索
    Search(String),
    /// 終了
    Quit,
}

/// 入力を解釈（空・q で終了）
pub fn parse_action(input: &str) -> InteractiveAction {
    match input.trim() {
        "" | "q" | "Q" => InteractiveAction::Quit,
        code => InteractiveAction::Search(code.to_string()),
    }
}

/// 対話式で検索
pub async fn run_interactive<S: PersistenceSink>(
    service: &SearchService,
    workbook: &LoadedWorkbook,
    sink: &mut S,
    explain: bool,
) -> Result<()> {
    println!("📋 {} ({}件)", workbook.file_name, workbook.row_count());
    println!("操作: コードを入力して[Enter]  [q]または空入力で終了");
    println!("---\n");

    let mut searched = 0usize;

    loop {
        let input: String = Input::new()
            .with_prompt("Code défaut")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| DtcSearchError::CliExecution(e.to_string()))?;

        match parse_action(&input) {
            InteractiveAction::Quit => break,
            InteractiveAction::Search(code) => {
                let report = service.search(workbook, &code, sink).await?;
                let scorer = explain.then(|| service.engine().scorer());
                print_report(&report, scorer);
                println!("---\n");
                searched += 1;
            }
        }
    }

    println!("✓ 終了します（{}件検索）", searched);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_action_quit() {
        assert_eq!(parse_action(""), InteractiveAction::Quit);
        assert_eq!(parse_action("  "), InteractiveAction::Quit);
        assert_eq!(parse_action("q"), InteractiveAction::Quit);
        assert_eq!(parse_action("Q"), InteractiveAction::Quit);
    }

    #[test]
    fn test_parse_action_search() {
        assert_eq!(
            parse_action(" p15be "),
            InteractiveAction::Search("p15be".to_string())
        );
    }
}
