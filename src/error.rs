use thiserror::Error;

#[derive(Error, Debug)]
pub enum DtcSearchError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("Excel読み込みエラー: {0}")]
    Workbook(String),

    #[error("Le fichier Excel est vide ou invalide")]
    EmptyWorkbook,

    #[error("要約生成エラー: {0}")]
    SummaryGeneration(String),

    #[error("履歴保存エラー: {0}")]
    Persistence(String),

    #[error("Excel生成エラー: {0}")]
    Export(String),

    #[error("CLI実行エラー: {0}")]
    CliExecution(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] dtc_search_common::Error),
}

impl From<calamine::Error> for DtcSearchError {
    fn from(e: calamine::Error) -> Self {
        DtcSearchError::Workbook(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for DtcSearchError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        DtcSearchError::Export(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DtcSearchError>;
