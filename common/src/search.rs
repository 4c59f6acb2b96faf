//! 検索オーケストレーター
//!
//! グリッドと検索文字列から、照合・スコア計算・並び替え済みの結果を作る。
//!
//! ## 処理フロー
//! 1. 列スキーマを解決（ヘッダー名 or 固定位置）
//! 2. データ行を走査
//! 3. チケット説明に正規化コードを含む行を抽出
//! 4. 解決策テキストから成功確率を計算
//! 5. 成功確率の降順に安定ソート
//!
//! 副作用なし。要約生成や履歴保存は呼び出し側の責務。

use crate::detector::CodeMatcher;
use crate::error::{Error, Result};
use crate::ranker::rank_matches;
use crate::scanner::scan_rows;
use crate::schema::{ColumnLayout, ColumnSchema};
use crate::scorer::SuccessScorer;
use crate::types::{RawGrid, SearchMatch, TicketRow};

/// 検証済みの検索クエリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    raw: String,
    code: String,
}

impl SearchQuery {
    /// 空（空白のみ含む）の入力は拒否する
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(Error::EmptyQuery);
        }
        let matcher = CodeMatcher::new(raw);
        Ok(Self {
            raw: raw.to_string(),
            code: matcher.code().to_string(),
        })
    }

    /// 入力されたままの文字列
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// 正規化済みコード
    pub fn code(&self) -> &str {
        &self.code
    }
}

/// 検索結果
///
/// 該当なしはエラーではなく、表示用メッセージを持つ正規の結果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// 1件以上（成功確率の降順）
    Matches(Vec<SearchMatch>),
    /// 該当なし（入力されたままのクエリと正規化済みコード）
    NoMatches { query: String, code: String },
}

impl SearchOutcome {
    pub fn into_matches(self) -> Vec<SearchMatch> {
        match self {
            SearchOutcome::Matches(matches) => matches,
            SearchOutcome::NoMatches { .. } => Vec::new(),
        }
    }

    /// 該当なしの表示メッセージ（入力されたままのコードを使う）
    pub fn message(&self) -> Option<String> {
        match self {
            SearchOutcome::Matches(_) => None,
            SearchOutcome::NoMatches { query, .. } => {
                Some(format!("Aucun résultat trouvé pour le code {}", query))
            }
        }
    }
}

/// 検索エンジン
///
/// 状態を持たないため、同じグリッドに対する並列検索も安全。
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    layout: ColumnLayout,
    scorer: SuccessScorer,
}

impl SearchEngine {
    pub fn new(layout: ColumnLayout, scorer: SuccessScorer) -> Self {
        Self { layout, scorer }
    }

    pub fn scorer(&self) -> &SuccessScorer {
        &self.scorer
    }

    pub fn resolve_schema(&self, grid: &RawGrid) -> Result<ColumnSchema> {
        self.layout.resolve(grid)
    }

    /// グリッド全体を検索
    pub fn search(&self, grid: &RawGrid, raw_code: &str) -> Result<SearchOutcome> {
        let schema = self.resolve_schema(grid)?;
        Ok(self.search_with_schema(grid, &schema, raw_code))
    }

    /// 解決済みスキーマで検索（複数コードをまとめて検索する場合に使う）
    pub fn search_with_schema(
        &self,
        grid: &RawGrid,
        schema: &ColumnSchema,
        raw_code: &str,
    ) -> SearchOutcome {
        let matcher = CodeMatcher::new(raw_code);

        let mut matches: Vec<SearchMatch> = scan_rows(grid, schema)
            .filter(|row| matcher.matches(&row.description))
            .map(|row| self.build_match(row, matcher.code()))
            .collect();

        if matches.is_empty() {
            return SearchOutcome::NoMatches {
                query: raw_code.to_string(),
                code: matcher.code().to_string(),
            };
        }

        rank_matches(&mut matches);
        SearchOutcome::Matches(matches)
    }

    fn build_match(&self, row: TicketRow, code: &str) -> SearchMatch {
        let success_probability = self.scorer.score(&row.combined_solution());
        SearchMatch {
            row_number: row.row_number,
            code_found: code.to_string(),
            model: row.model,
            subject: row.subject,
            solution_q: row.solution_q,
            solution_s: row.solution_s,
            success_probability,
        }
    }
}
