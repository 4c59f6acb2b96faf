//! 検索サービス
//!
//! 検索エンジンを包み、入力検証・AI要約・履歴保存をまとめて行う。
//!
//! ## 処理フロー
//! 1. 検索コードの検証（空は拒否）
//! 2. エンジンで検索（該当なしはここで終了、履歴にも残さない）
//! 3. AI要約（失敗時は空の要約）
//! 4. 履歴保存（失敗してもレポートはそのまま返す）

use crate::error::Result;
use crate::history::PersistenceSink;
use crate::summary::{summarize_or_empty, SummaryGenerator};
use crate::workbook::LoadedWorkbook;
use dtc_search_common::{SearchEngine, SearchMatch, SearchOutcome, SearchQuery};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// 検索レポート
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReport {
    /// 1件以上見つかった場合 true
    pub success: bool,
    /// 入力されたままの検索コード
    pub query: String,
    /// 正規化済みコード
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub results: Vec<SearchMatch>,
    pub summary: String,
    /// 履歴に保存できたか
    #[serde(default)]
    pub persisted: bool,
}

/// 履歴に保存しない
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl PersistenceSink for NoHistory {
    fn record_search(&mut self, _: u64, _: &str, _: &str, _: &str, _: &str) -> Result<()> {
        Ok(())
    }
}

pub struct SearchService {
    engine: SearchEngine,
    summary: Box<dyn SummaryGenerator>,
    user_id: u64,
}

impl SearchService {
    pub fn new(engine: SearchEngine, summary: Box<dyn SummaryGenerator>, user_id: u64) -> Self {
        Self {
            engine,
            summary,
            user_id,
        }
    }

    pub fn engine(&self) -> &SearchEngine {
        &self.engine
    }

    /// 1つのコードを検索
    pub async fn search<S: PersistenceSink>(
        &self,
        workbook: &LoadedWorkbook,
        raw_code: &str,
        sink: &mut S,
    ) -> Result<SearchReport> {
        let query = SearchQuery::parse(raw_code)?;
        let outcome = self.engine.search(&workbook.grid, query.raw())?;
        Ok(self.finish(&query, outcome, &workbook.file_key, sink).await)
    }

    /// 複数コードを並列に検索（スキーマ解決は1回）
    ///
    /// 空のコードが1つでもあれば何も検索せずにエラーを返す。
    pub async fn search_many<S: PersistenceSink>(
        &self,
        workbook: &LoadedWorkbook,
        raw_codes: &[String],
        sink: &mut S,
    ) -> Result<Vec<SearchReport>> {
        let queries = raw_codes
            .iter()
            .map(|c| SearchQuery::parse(c))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let schema = self.engine.resolve_schema(&workbook.grid)?;

        let outcomes: Vec<SearchOutcome> = queries
            .par_iter()
            .map(|q| self.engine.search_with_schema(&workbook.grid, &schema, q.raw()))
            .collect();

        let mut reports = Vec::with_capacity(queries.len());
        for (query, outcome) in queries.iter().zip(outcomes) {
            reports.push(self.finish(query, outcome, &workbook.file_key, sink).await);
        }
        Ok(reports)
    }

    async fn finish<S: PersistenceSink>(
        &self,
        query: &SearchQuery,
        outcome: SearchOutcome,
        file_key: &str,
        sink: &mut S,
    ) -> SearchReport {
        if let Some(message) = outcome.message() {
            tracing::info!(code = query.code(), "該当なし");
            return SearchReport {
                success: false,
                query: query.raw().to_string(),
                code: query.code().to_string(),
                message: Some(message),
                results: Vec::new(),
                summary: String::new(),
                persisted: false,
            };
        }
        let results = outcome.into_matches();

        tracing::info!(code = query.code(), count = results.len(), "検索完了");

        let summary = summarize_or_empty(self.summary.as_ref(), query.raw(), &results).await;
        let persisted = self.persist(sink, query, file_key, &results, &summary);

        SearchReport {
            success: true,
            query: query.raw().to_string(),
            code: query.code().to_string(),
            message: None,
            results,
            summary,
            persisted,
        }
    }

    fn persist<S: PersistenceSink>(
        &self,
        sink: &mut S,
        query: &SearchQuery,
        file_key: &str,
        results: &[SearchMatch],
        summary: &str,
    ) -> bool {
        let stored = serde_json::to_string(results)
            .map_err(Into::into)
            .and_then(|json| sink.record_search(self.user_id, file_key, query.raw(), &json, summary));

        match stored {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(code = query.code(), error = %e, "検索履歴の保存に失敗しました");
                false
            }
        }
    }
}
