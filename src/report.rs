//! 検索結果のコンソール表示

use crate::service::SearchReport;
use dtc_search_common::{SearchMatch, SuccessScorer};

/// 解決策の表示上限（文字数）
const PREVIEW_CHARS: usize = 160;

/// レポートを表示
///
/// `explain` を渡すとスコアの内訳も表示する。
pub fn print_report(report: &SearchReport, explain: Option<&SuccessScorer>) {
    if !report.success {
        println!("✖ {}", report.message.as_deref().unwrap_or("Aucun résultat"));
        return;
    }

    println!("✔ {} : {}件", report.code, report.results.len());
    println!();

    for (rank, m) in report.results.iter().enumerate() {
        print_match(rank + 1, m);
        if let Some(scorer) = explain {
            let breakdown = scorer.explain(&format!("{} {}", m.solution_q, m.solution_s));
            println!(
                "     内訳: ルール={} 基本={} 文字数={} 補正={:+}",
                breakdown.rule.as_deref().unwrap_or("-"),
                breakdown.base,
                breakdown.text_length,
                breakdown.length_adjustment
            );
        }
        println!();
    }

    if !report.summary.is_empty() {
        println!("Résumé IA:");
        println!("  {}", report.summary.replace('\n', "\n  "));
    }
}

fn print_match(rank: usize, m: &SearchMatch) {
    println!(
        "[{}] {}%  行{}  {}  {}",
        rank,
        m.success_probability,
        m.row_number,
        m.model,
        if m.subject.is_empty() { "-" } else { &m.subject }
    );
    println!("     Q: {}", preview(&m.solution_q));
    println!("     S: {}", preview(&m.solution_s));
}

/// 長い解決策を切り詰める（改行は空白に）
pub fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= PREVIEW_CHARS {
        flat
    } else {
        let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short() {
        assert_eq!(preview("Capteur\n remplacé"), "Capteur remplacé");
    }

    #[test]
    fn test_preview_long() {
        let long = "a".repeat(300);
        let p = preview(&long);
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 1);
        assert!(p.ends_with('…'));
    }
}
