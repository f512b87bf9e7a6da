mod advice;
mod scoring;
mod subtypes;
mod tier;

pub use advice::{generate_recommendations, CLOSING_ADVISORIES};
pub use scoring::compute_score;
pub use subtypes::infer_subtypes;
pub use tier::{classify, TierAssessment};

use super::catalog::QuestionCatalog;
use super::domain::{AnswerSet, IntakeForm, RespondentMetadata, ScoringResult};

/// Stateless evaluator that applies the question catalog to a questionnaire.
#[derive(Debug, Clone, Default)]
pub struct TriageEngine {
    catalog: QuestionCatalog,
}

impl TriageEngine {
    pub fn new(catalog: QuestionCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    /// Score, classify, infer subtypes and build the advisory list for one respondent.
    ///
    /// The respondent metadata rides along for the caller's persistence; it never
    /// influences the result.
    pub fn analyze(
        &self,
        _respondent: &RespondentMetadata,
        symptoms: &AnswerSet,
        risk_factors: &AnswerSet,
        narrative: &str,
    ) -> ScoringResult {
        let (total_score, matched_keywords) =
            compute_score(symptoms, risk_factors, narrative, &self.catalog);
        let TierAssessment {
            tier,
            urgency,
            display_tag,
        } = classify(total_score);
        let subtypes = infer_subtypes(symptoms);
        let recommendations = generate_recommendations(total_score, &subtypes, urgency);

        ScoringResult {
            total_score,
            matched_keywords,
            tier,
            urgency: urgency.to_string(),
            display_tag,
            subtypes,
            recommendations,
        }
    }

    pub fn analyze_form(&self, form: &IntakeForm) -> ScoringResult {
        self.analyze(
            &form.respondent,
            &form.symptoms,
            &form.risk_factors,
            &form.narrative,
        )
    }
}
