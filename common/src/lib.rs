//! DTC Search Common Library
//!
//! 故障コード検索エンジン本体（I/Oなし）。CLIから利用される。

pub mod types;
pub mod error;
pub mod normalizer;
pub mod schema;
pub mod scanner;
pub mod detector;
pub mod scorer;
pub mod ranker;
pub mod search;
pub mod prompts;

pub use types::{Cell, RawGrid, RawRow, SearchMatch, TicketRow};
pub use error::{Error, Result};
pub use normalizer::normalize_code;
pub use schema::{ColumnLayout, ColumnSchema, TicketField};
pub use scanner::{scan_rows, UNKNOWN_MODEL, UNSPECIFIED_SOLUTION};
pub use detector::CodeMatcher;
pub use scorer::{ScoreBreakdown, ScoreRule, ScoringConfig, SuccessScorer};
pub use ranker::rank_matches;
pub use search::{SearchEngine, SearchOutcome, SearchQuery};
pub use prompts::{build_summary_prompt, SummaryPrompt};
