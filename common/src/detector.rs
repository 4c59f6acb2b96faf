//! 故障コードの照合
//!
//! チケット説明を検索コードと同じ規則で正規化し、部分文字列として
//! 含まれていれば一致とみなす（前方・後方・中間一致すべて）。

use crate::normalizer::normalize_code;

/// 正規化済みコードによる照合器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeMatcher {
    code: String,
}

impl CodeMatcher {
    pub fn new(raw_code: &str) -> Self {
        Self {
            code: normalize_code(raw_code),
        }
    }

    /// 正規化済みの検索コード
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn matches(&self, description: &str) -> bool {
        normalize_code(description).contains(&self.code)
    }
}
