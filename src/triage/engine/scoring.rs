use super::super::catalog::{QuestionCatalog, QuestionItem};
use super::super::domain::{AnswerSet, MatchedKeyword};

/// Sum the three evidence sources: symptom answers, risk answers and narrative phrases.
///
/// Keyword phrases are matched as substrings of the lowercased narrative, in table
/// order. Overlapping phrases each fire on their own, so `"batuk darah"` and
/// `"darah"` would both count if both were listed.
pub fn compute_score(
    symptoms: &AnswerSet,
    risk_factors: &AnswerSet,
    narrative: &str,
    catalog: &QuestionCatalog,
) -> (u32, Vec<MatchedKeyword>) {
    let mut total_score = answered_weight(catalog.symptoms(), symptoms);
    total_score += answered_weight(catalog.risk_factors(), risk_factors);

    let mut matched = Vec::new();
    let narrative = narrative.to_lowercase();
    if !narrative.trim().is_empty() {
        for keyword in catalog.keywords() {
            if narrative.contains(keyword.phrase) {
                total_score += keyword.weight;
                matched.push(MatchedKeyword {
                    phrase: keyword.phrase.to_string(),
                    weight: keyword.weight,
                });
            }
        }
    }

    (total_score, matched)
}

fn answered_weight(items: &[QuestionItem], answers: &AnswerSet) -> u32 {
    items
        .iter()
        .filter(|item| answers.is_true(item.key))
        .map(|item| item.weight)
        .sum()
}
