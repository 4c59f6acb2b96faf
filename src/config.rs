use crate::ai_provider::AiProvider;
use crate::error::{DtcSearchError, Result};
use dtc_search_common::{ColumnLayout, ScoringConfig, SearchEngine, SuccessScorer};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 履歴に記録する利用者ID
    pub user_id: u64,
    pub ai_provider: AiProvider,
    /// AI CLIの実行ファイル（PATH外に置いた場合）
    pub ai_command: Option<String>,
    pub summary_timeout_seconds: u64,
    pub column_layout: ColumnLayout,
    /// スコアルールの上書き（省略時は既定のキーワード）
    pub scoring: Option<ScoringConfig>,
    /// 履歴ファイルの場所（省略時はデータディレクトリ）
    pub history_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| DtcSearchError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("dtc-search").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            user_id: 1,
            ai_provider: AiProvider::Claude,
            ai_command: None,
            summary_timeout_seconds: 120,
            column_layout: ColumnLayout::Header,
            scoring: None,
            history_path: None,
        }
    }

    /// 履歴ファイルのパス
    pub fn history_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.history_path {
            return Ok(path.clone());
        }
        let data = dirs::data_dir()
            .ok_or_else(|| DtcSearchError::Config("データディレクトリが見つかりません".into()))?;
        Ok(data.join("dtc-search").join("history.json"))
    }

    /// 設定からスコア計算器を構築（キーワード重複は設定エラー）
    pub fn scorer(&self) -> Result<SuccessScorer> {
        match &self.scoring {
            Some(scoring) => Ok(SuccessScorer::new(scoring.clone())?),
            None => Ok(SuccessScorer::default()),
        }
    }

    pub fn engine(&self, layout: Option<ColumnLayout>) -> Result<SearchEngine> {
        Ok(SearchEngine::new(
            layout.unwrap_or(self.column_layout),
            self.scorer()?,
        ))
    }

    pub fn set_ai_provider(&mut self, provider: AiProvider) -> Result<()> {
        self.ai_provider = provider;
        self.save()
    }

    pub fn set_user_id(&mut self, user_id: u64) -> Result<()> {
        self.user_id = user_id;
        self.save()
    }

    pub fn set_column_layout(&mut self, layout: ColumnLayout) -> Result<()> {
        self.column_layout = layout;
        self.save()
    }
}
