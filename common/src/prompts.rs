//! 要約プロンプト生成モジュール
//!
//! 検索結果からAI要約用のプロンプトを組み立てる:
//! - SUMMARY_SYSTEM_PROMPT: ホットライン向け技術アシスタントの役割
//! - build_summary_prompt: 解決策一覧を含むユーザープロンプト

use crate::types::SearchMatch;

/// システムプロンプト
pub const SUMMARY_SYSTEM_PROMPT: &str = "Tu es un assistant technique expert en diagnostic automobile. \
Tu dois générer des résumés techniques concis et directs pour les techniciens hotline.";

/// AI要約プロンプト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryPrompt {
    pub system: String,
    pub user: String,
}

impl SummaryPrompt {
    /// システム・ユーザーを1つのテキストにまとめる（CLI実行用）
    pub fn to_single_prompt(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}

/// 要約プロンプトを生成
///
/// # Arguments
/// * `code` - 技術者が入力した故障コード
/// * `matches` - 並び替え済みの検索結果
pub fn build_summary_prompt(code: &str, matches: &[SearchMatch]) -> SummaryPrompt {
    let solutions = matches
        .iter()
        .enumerate()
        .map(|(idx, m)| {
            format!(
                "Solution {}:\n- Modèle: {}\n- Échanges: {}\n- Dernier échange: {}",
                idx + 1,
                m.model,
                m.solution_q,
                m.solution_s
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let user = format!(
        "Génère un résumé technique concis (2-3 phrases maximum) pour le code défaut {code} \
basé sur les solutions trouvées:\n\n{solutions}\n\n\
Sois direct, technique et adapté à un technicien hotline automobile."
    );

    SummaryPrompt {
        system: SUMMARY_SYSTEM_PROMPT.to_string(),
        user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(model: &str, q: &str, s: &str) -> SearchMatch {
        SearchMatch {
            row_number: 2,
            code_found: "P20EE".to_string(),
            model: model.to_string(),
            subject: "PANNE MOTEUR".to_string(),
            solution_q: q.to_string(),
            solution_s: s.to_string(),
            success_probability: 85,
        }
    }

    #[test]
    fn test_build_summary_prompt_lists_solutions() {
        let matches = vec![
            sample("308", "Remplacement capteur O2", "Capteur remplacé"),
            sample("JUMPER", "F26 + BSM HS", "panne fusible f26"),
        ];
        let prompt = build_summary_prompt("P20EE", &matches);
        assert_eq!(prompt.system, SUMMARY_SYSTEM_PROMPT);
        assert!(prompt.user.contains("code défaut P20EE"));
        assert!(prompt.user.contains("Solution 1:\n- Modèle: 308"));
        assert!(prompt.user.contains("Solution 2:\n- Modèle: JUMPER"));
        assert!(prompt.user.contains("- Dernier échange: panne fusible f26"));
    }

    #[test]
    fn test_single_prompt_contains_both_parts() {
        let prompt = build_summary_prompt("P15BE", &[sample("308", "a", "b")]);
        let single = prompt.to_single_prompt();
        assert!(single.starts_with("Tu es un assistant technique"));
        assert!(single.contains("P15BE"));
    }
}
