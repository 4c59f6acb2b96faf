//! 故障コードの正規化
//!
//! 前後の空白を除去し、大文字化し、内部の空白をすべて取り除く。
//! 記号（ハイフン等）はそのまま残す。

use regex::Regex;

lazy_static::lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// 比較用の正規形に変換
///
/// # Examples
/// ```
/// use dtc_search_common::normalize_code;
///
/// assert_eq!(normalize_code(" p15be "), "P15BE");
/// assert_eq!(normalize_code("p 15 be"), "P15BE");
/// ```
pub fn normalize_code(raw: &str) -> String {
    WHITESPACE.replace_all(&raw.trim().to_uppercase(), "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize_code("p15be"), "P15BE");
        assert_eq!(normalize_code(" P15BE "), "P15BE");
    }

    #[test]
    fn test_normalize_internal_whitespace() {
        assert_eq!(normalize_code("P 20\tEE"), "P20EE");
        assert_eq!(normalize_code("code  defaut\np20ee"), "CODEDEFAUTP20EE");
    }

    #[test]
    fn test_normalize_keeps_punctuation() {
        assert_eq!(normalize_code("u0100-87"), "U0100-87");
        assert_eq!(normalize_code("p0420.b"), "P0420.B");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_code(""), "");
        assert_eq!(normalize_code("   "), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        for raw in ["p15be", " VOYANT allumé p20ee ", "a b\tc", "", "Modèle ü"] {
            let once = normalize_code(raw);
            assert_eq!(normalize_code(&once), once);
        }
    }

    #[test]
    fn test_normalize_accented_uppercase() {
        assert_eq!(normalize_code("allumé"), "ALLUMÉ");
    }
}
