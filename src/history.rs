//! 検索履歴モジュール
//!
//! 読み込んだチケット表と過去の検索結果をJSONファイルに記録する。
//! ファイルが壊れている・バージョンが異なる場合は `.bak` に退避し、空の履歴として扱う。

use crate::error::{DtcSearchError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// 読み込んだチケット表の記録
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: u64,
    pub user_id: u64,
    pub file_name: String,
    /// ファイル内容のハッシュ
    pub file_key: String,
    pub row_count: usize,
    pub created_at: DateTime<Utc>,
}

/// 検索結果の記録
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    pub id: u64,
    pub user_id: u64,
    /// 対応するFileRecordのID（未登録のファイルは0）
    pub file_id: u64,
    pub search_code: String,
    /// 並び替え済み結果のJSON
    pub results_json: String,
    pub ai_summary: String,
    pub created_at: DateTime<Utc>,
}

/// 検索結果の保存先
pub trait PersistenceSink {
    fn record_search(
        &mut self,
        user_id: u64,
        file_key: &str,
        search_code: &str,
        results_json: &str,
        ai_summary: &str,
    ) -> Result<()>;
}

/// 履歴ファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HistoryFile {
    /// バージョン（互換性チェック用）
    version: u32,
    files: Vec<FileRecord>,
    searches: Vec<SearchRecord>,
}

impl HistoryFile {
    const CURRENT_VERSION: u32 = 1;

    fn next_file_id(&self) -> u64 {
        self.files.iter().map(|f| f.id).max().unwrap_or(0) + 1
    }

    fn next_search_id(&self) -> u64 {
        self.searches.iter().map(|s| s.id).max().unwrap_or(0) + 1
    }
}

impl Default for HistoryFile {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            files: Vec::new(),
            searches: Vec::new(),
        }
    }
}

/// 履歴ストア（ファイルパス＋内容）
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    data: HistoryFile,
}

impl HistoryStore {
    /// 履歴ファイルを読み込み（存在しない・壊れている場合は空）
    pub fn load(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            data: Self::read_file(path),
        }
    }

    fn read_file(path: &Path) -> HistoryFile {
        if !path.exists() {
            return HistoryFile::default();
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "履歴ファイルを開けません");
                return HistoryFile::default();
            }
        };

        match serde_json::from_reader::<_, HistoryFile>(BufReader::new(file)) {
            Ok(history) if history.version == HistoryFile::CURRENT_VERSION => history,
            Ok(history) => {
                tracing::warn!(version = history.version, "履歴バージョン不一致、再生成します");
                Self::set_aside(path);
                HistoryFile::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "履歴ファイルが壊れています、再生成します");
                Self::set_aside(path);
                HistoryFile::default()
            }
        }
    }

    /// 読めない履歴を `<名前>.bak` に退避（次の保存で上書きされないように）
    fn set_aside(path: &Path) {
        let backup = Self::backup_path(path);
        match std::fs::rename(path, &backup) {
            Ok(()) => tracing::warn!(backup = %backup.display(), "旧履歴を退避しました"),
            Err(e) => tracing::warn!(error = %e, "旧履歴を退避できません"),
        }
    }

    fn backup_path(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_os_string();
        name.push(".bak");
        PathBuf::from(name)
    }

    /// 履歴ファイルを保存
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(&self.path)
            .map_err(|e| DtcSearchError::Persistence(format!("{}: {}", self.path.display(), e)))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.data)?;
        Ok(())
    }

    /// チケット表を登録（同じ利用者・同じ内容なら既存の記録を返す）
    pub fn register_file(
        &mut self,
        user_id: u64,
        file_name: &str,
        file_key: &str,
        row_count: usize,
    ) -> Result<FileRecord> {
        if let Some(existing) = self.find_file(user_id, file_key) {
            return Ok(existing.clone());
        }

        let record = FileRecord {
            id: self.data.next_file_id(),
            user_id,
            file_name: file_name.to_string(),
            file_key: file_key.to_string(),
            row_count,
            created_at: Utc::now(),
        };
        self.data.files.push(record.clone());
        self.save()?;
        Ok(record)
    }

    /// 登録を試み、失敗しても警告のみで続行する（検索結果を優先）
    pub fn try_register_file(
        &mut self,
        user_id: u64,
        file_name: &str,
        file_key: &str,
        row_count: usize,
    ) -> Option<FileRecord> {
        match self.register_file(user_id, file_name, file_key, row_count) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(file = file_name, error = %e, "チケット表を履歴に登録できません");
                None
            }
        }
    }

    pub fn find_file(&self, user_id: u64, file_key: &str) -> Option<&FileRecord> {
        self.data
            .files
            .iter()
            .find(|f| f.user_id == user_id && f.file_key == file_key)
    }

    /// 利用者のファイル一覧（新しい順）
    pub fn files_for_user(&self, user_id: u64) -> Vec<&FileRecord> {
        let mut files: Vec<_> = self.data.files.iter().filter(|f| f.user_id == user_id).collect();
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        files
    }

    /// 利用者の検索履歴（新しい順）
    pub fn searches_for_user(&self, user_id: u64) -> Vec<&SearchRecord> {
        let mut searches: Vec<_> = self
            .data
            .searches
            .iter()
            .filter(|s| s.user_id == user_id)
            .collect();
        searches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        searches
    }
}

impl PersistenceSink for HistoryStore {
    fn record_search(
        &mut self,
        user_id: u64,
        file_key: &str,
        search_code: &str,
        results_json: &str,
        ai_summary: &str,
    ) -> Result<()> {
        let file_id = self.find_file(user_id, file_key).map(|f| f.id).unwrap_or(0);
        let record = SearchRecord {
            id: self.data.next_search_id(),
            user_id,
            file_id,
            search_code: search_code.to_string(),
            results_json: results_json.to_string(),
            ai_summary: ai_summary.to_string(),
            created_at: Utc::now(),
        };
        self.data.searches.push(record);
        self.save()
    }
}
