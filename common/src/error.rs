//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Le code défaut est requis")]
    EmptyQuery,

    #[error("Header row missing: the grid has no rows")]
    MissingHeader,

    #[error("Column not found for {field}: expected one of {expected}")]
    MissingColumn { field: String, expected: String },

    #[error("Invalid scoring config: {0}")]
    InvalidScoring(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
