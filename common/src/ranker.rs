//! 検索結果の並び替え

use crate::types::SearchMatch;

/// 成功確率の降順に並べる
///
/// 安定ソートなので、同点の結果はスキャン順（行番号の昇順）を保つ。
pub fn rank_matches(matches: &mut [SearchMatch]) {
    matches.sort_by(|a, b| b.success_probability.cmp(&a.success_probability));
}
