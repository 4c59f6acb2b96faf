//! 成功確率スコア
//!
//! 解決策テキスト（Q + 空白 + S）から20〜100のヒューリスティックな
//! 成功確率を計算する。
//!
//! ## 計算手順
//! 1. 基本スコア 50
//! 2. ルールを優先順に評価し、最初にキーワードが見つかったルールのスコアを採用
//!    （既定: 解決系 85 → 診断系 65）
//! 3. 文字数が200超なら +10、50未満なら -10
//! 4. 20〜100に丸める
//!
//! キーワードは設定として渡し、構築時にルール間で重複がないことを検証する。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 解決系キーワード（修理・交換などの実施を示す）
pub const RESOLUTION_KEYWORDS: &[&str] = &[
    "résolu", "réparé", "remplacé", "changé", "installé", "corrigé",
    "resolved", "repaired", "replaced", "changed", "installed", "corrected",
    "fixed", "solved", "success",
];

/// 診断系キーワード（確認・推定にとどまる）
pub const DIAGNOSTIC_KEYWORDS: &[&str] = &[
    "diagnostic", "test", "vérif", "check", "inspect",
    "à tester", "à vérifier", "possible", "likely",
];

/// キーワードルール
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRule {
    pub name: String,
    pub score: i32,
    pub keywords: Vec<String>,
}

impl ScoreRule {
    pub fn new(name: &str, score: i32, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            score,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

/// スコア計算の設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub base_score: i32,
    /// 優先順（先頭ほど強い）
    pub rules: Vec<ScoreRule>,
    pub long_text_threshold: usize,
    pub long_text_bonus: i32,
    pub short_text_threshold: usize,
    pub short_text_penalty: i32,
    pub min_score: i32,
    pub max_score: i32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_score: 50,
            rules: vec![
                ScoreRule::new("resolution", 85, RESOLUTION_KEYWORDS),
                ScoreRule::new("diagnostic", 65, DIAGNOSTIC_KEYWORDS),
            ],
            long_text_threshold: 200,
            long_text_bonus: 10,
            short_text_threshold: 50,
            short_text_penalty: 10,
            min_score: 20,
            max_score: 100,
        }
    }
}

/// スコアの内訳
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    /// 適用されたルール名（なしは基本スコア）
    pub rule: Option<String>,
    pub base: i32,
    pub length_adjustment: i32,
    pub text_length: usize,
    pub score: u8,
}

/// 成功確率の計算器
#[derive(Debug, Clone)]
pub struct SuccessScorer {
    config: ScoringConfig,
}

impl SuccessScorer {
    /// 設定を検証して構築
    pub fn new(config: ScoringConfig) -> Result<Self> {
        validate(&config)?;
        Ok(Self::from_config_unchecked(config))
    }

    fn from_config_unchecked(mut config: ScoringConfig) -> Self {
        for rule in &mut config.rules {
            for keyword in &mut rule.keywords {
                *keyword = keyword.to_lowercase();
            }
        }
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, solution: &str) -> u8 {
        self.explain(solution).score
    }

    pub fn explain(&self, solution: &str) -> ScoreBreakdown {
        let lowered = solution.to_lowercase();
        let config = &self.config;

        let fired = config.rules.iter().find(|rule| rule.matches(&lowered));
        let base = fired.map(|r| r.score).unwrap_or(config.base_score);

        let text_length = solution.chars().count();
        let length_adjustment = if text_length > config.long_text_threshold {
            config.long_text_bonus
        } else if text_length < config.short_text_threshold {
            -config.short_text_penalty
        } else {
            0
        };

        let score = (base + length_adjustment).clamp(config.min_score, config.max_score);

        ScoreBreakdown {
            rule: fired.map(|r| r.name.clone()),
            base,
            length_adjustment,
            text_length,
            score: score as u8,
        }
    }
}

impl Default for SuccessScorer {
    fn default() -> Self {
        Self::from_config_unchecked(ScoringConfig::default())
    }
}

fn validate(config: &ScoringConfig) -> Result<()> {
    if config.min_score < 0 || config.max_score > 100 || config.min_score > config.max_score {
        return Err(Error::InvalidScoring(format!(
            "score range {}..={} must lie within 0..=100",
            config.min_score, config.max_score
        )));
    }

    // 加算前に範囲を制限し、i32 のオーバーフローを起こさない
    let bounded = std::iter::once(("base_score", config.base_score))
        .chain(config.rules.iter().map(|r| (r.name.as_str(), r.score)))
        .chain([
            ("long_text_bonus", config.long_text_bonus),
            ("short_text_penalty", config.short_text_penalty),
        ]);
    for (name, value) in bounded {
        if !(0..=100).contains(&value) {
            return Err(Error::InvalidScoring(format!(
                "'{}' = {} must lie within 0..=100",
                name, value
            )));
        }
    }

    if config.short_text_threshold > config.long_text_threshold {
        return Err(Error::InvalidScoring(format!(
            "short text threshold {} exceeds long text threshold {}",
            config.short_text_threshold, config.long_text_threshold
        )));
    }

    // キーワード → 最初に現れたルール名
    let mut owners: HashMap<String, &str> = HashMap::new();
    for rule in &config.rules {
        for keyword in &rule.keywords {
            let lowered = keyword.trim().to_lowercase();
            if lowered.is_empty() {
                return Err(Error::InvalidScoring(format!(
                    "rule '{}' contains an empty keyword",
                    rule.name
                )));
            }
            match owners.get(&lowered) {
                Some(owner) if *owner != rule.name => {
                    return Err(Error::InvalidScoring(format!(
                        "keyword '{}' appears in both '{}' and '{}'",
                        lowered, owner, rule.name
                    )));
                }
                Some(_) => {}
                None => {
                    owners.insert(lowered, rule.name.as_str());
                }
            }
        }
    }

    Ok(())
}
