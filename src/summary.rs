//! AI要約モジュール
//!
//! 検索結果の解決策一覧から、ホットライン技術者向けの短い要約を生成する。
//! AI CLI（claude / codex / gemini）を非対話モードで呼び出す。
//! 失敗しても検索自体は失敗させず、空の要約に落とす。

use crate::ai_provider::AiProvider;
use crate::error::{DtcSearchError, Result};
use async_trait::async_trait;
use dtc_search_common::{build_summary_prompt, SearchMatch};
use std::time::Duration;
use tokio::process::Command;

/// 要約生成器
#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    async fn generate(&self, code: &str, matches: &[SearchMatch]) -> Result<String>;
}

/// 要約を生成しない
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSummary;

#[async_trait]
impl SummaryGenerator for DisabledSummary {
    async fn generate(&self, _code: &str, _matches: &[SearchMatch]) -> Result<String> {
        Ok(String::new())
    }
}

/// AI CLIによる要約生成
#[derive(Debug, Clone)]
pub struct CliSummaryGenerator {
    provider: AiProvider,
    timeout: Duration,
    program: Option<String>,
}

impl CliSummaryGenerator {
    pub fn new(provider: AiProvider, timeout: Duration) -> Self {
        Self {
            provider,
            timeout,
            program: None,
        }
    }

    /// 実行ファイルを差し替える（PATH外のCLIを使う場合）
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }

    fn program(&self) -> &str {
        self.program
            .as_deref()
            .unwrap_or_else(|| self.provider.command_name())
    }

    async fn run_cli(&self, prompt: &str) -> Result<String> {
        let args = self.provider.prompt_args(prompt);

        // Windowsではcmd /c経由
        #[cfg(windows)]
        let mut command = {
            let mut c = Command::new("cmd");
            c.arg("/c").arg(self.program()).args(&args);
            c
        };

        #[cfg(not(windows))]
        let mut command = {
            let mut c = Command::new(self.program());
            c.args(&args);
            c
        };

        command.kill_on_drop(true);

        tracing::debug!(provider = %self.provider, prompt_len = prompt.len(), "AI CLI呼び出し");

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                DtcSearchError::SummaryGeneration(format!(
                    "{} CLIがタイムアウトしました ({}秒)",
                    self.provider,
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| {
                DtcSearchError::SummaryGeneration(format!("{} CLI実行エラー: {}", self.provider, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DtcSearchError::SummaryGeneration(format!(
                "{} CLI failed (code {:?}): {}",
                self.provider,
                output.status.code(),
                stderr.trim()
            )));
        }

        let response = String::from_utf8_lossy(&output.stdout).to_string();
        tracing::debug!(response_len = response.len(), "AI CLI応答");
        Ok(response)
    }
}

#[async_trait]
impl SummaryGenerator for CliSummaryGenerator {
    async fn generate(&self, code: &str, matches: &[SearchMatch]) -> Result<String> {
        let prompt = build_summary_prompt(code, matches).to_single_prompt();
        let response = self.run_cli(&prompt).await?;
        Ok(response.trim().to_string())
    }
}

/// 要約を生成し、失敗時は空文字列を返す
pub async fn summarize_or_empty(
    generator: &dyn SummaryGenerator,
    code: &str,
    matches: &[SearchMatch],
) -> String {
    match generator.generate(code, matches).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::warn!(code, error = %e, "AI要約の生成に失敗しました");
            String::new()
        }
    }
}
