use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque identifier assigned by the store when a consultation is persisted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsultationId(pub String);

impl fmt::Display for ConsultationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Yes/no answers keyed by catalog question key. Missing keys read as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<String, bool>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_true(&self, key: &str) -> bool {
        self.0.get(key).copied().unwrap_or(false)
    }

    pub fn set(&mut self, key: impl Into<String>, value: bool) {
        self.0.insert(key.into(), value);
    }

    /// Keys answered `true`, in key order.
    pub fn affirmed(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, value)| **value)
            .map(|(key, _)| key.as_str())
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(key, value)| (key.into(), value)).collect())
    }
}

/// Who filled in the questionnaire, after boundary coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespondentMetadata {
    pub name: String,
    /// `0` means the age was absent or not a whole number.
    pub age: u32,
    pub gender: String,
    pub location: String,
}

/// Ordered severity tiers. Declaration order is severity order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Minimal,
    Low,
    Moderate,
    High,
}

impl RiskTier {
    pub const fn ordered() -> [RiskTier; 4] {
        [Self::Minimal, Self::Low, Self::Moderate, Self::High]
    }

    /// Position in [`RiskTier::ordered`], used to index confusion matrices.
    pub const fn index(self) -> usize {
        match self {
            Self::Minimal => 0,
            Self::Low => 1,
            Self::Moderate => 2,
            Self::High => 3,
        }
    }

    /// Label stored alongside historical consultations.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Minimal => "RISIKO MINIMAL",
            Self::Low => "RISIKO RENDAH",
            Self::Moderate => "RISIKO SEDANG",
            Self::High => "RISIKO TINGGI",
        }
    }

    /// Accepts either the stored label (`RISIKO TINGGI`) or the tier name (`high`).
    pub fn from_label(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_uppercase();
        Self::ordered().into_iter().find(|tier| {
            tier.label() == normalized || format!("{tier:?}").to_ascii_uppercase() == normalized
        })
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Colour hint for rendering a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayTag {
    Success,
    Info,
    Warning,
    Danger,
}

/// Inferred disease site. `Unspecified` is the sentinel when no rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subtype {
    Pulmonary,
    Lymphatic,
    SkeletalJoint,
    PossibleMeningeal,
    Unspecified,
}

impl Subtype {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pulmonary => "TBC Paru",
            Self::Lymphatic => "TBC Kelenjar (Limfadenitis)",
            Self::SkeletalJoint => "TBC Tulang/Sendi",
            Self::PossibleMeningeal => "Kemungkinan TBC Selaput Otak (Meningitis TB)",
            Self::Unspecified => "Tidak terdeteksi jenis spesifik",
        }
    }
}

/// Narrative phrase that fired during scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedKeyword {
    pub phrase: String,
    pub weight: u32,
}

/// Output of one analyze run. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub total_score: u32,
    pub matched_keywords: Vec<MatchedKeyword>,
    pub tier: RiskTier,
    pub urgency: String,
    pub display_tag: DisplayTag,
    pub subtypes: Vec<Subtype>,
    pub recommendations: Vec<String>,
}

impl ScoringResult {
    pub fn subtype_labels(&self) -> Vec<&'static str> {
        self.subtypes.iter().map(|subtype| subtype.label()).collect()
    }

    /// Subtype labels joined the way the historical `jenis_tbc` column stored them.
    pub fn subtype_summary(&self) -> String {
        self.subtype_labels().join(", ")
    }
}

/// Validated questionnaire ready for the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeForm {
    pub respondent: RespondentMetadata,
    pub symptoms: AnswerSet,
    pub risk_factors: AnswerSet,
    /// Lowercased narrative text.
    pub narrative: String,
}

/// Persisted consultation. Only `ground_truth` changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultationRecord {
    pub id: ConsultationId,
    pub created_at: DateTime<Utc>,
    pub form: IntakeForm,
    pub result: ScoringResult,
    #[serde(default)]
    pub ground_truth: Option<RiskTier>,
}

impl ConsultationRecord {
    pub fn view(&self) -> ConsultationView {
        ConsultationView {
            consultation_id: self.id.clone(),
            created_at: self.created_at,
            name: self.form.respondent.name.clone(),
            total_score: self.result.total_score,
            tier: self.result.tier,
            status: self.result.tier.label(),
            color: self.result.display_tag,
            urgency: self.result.urgency.clone(),
            subtypes: self.result.subtype_labels(),
            recommendations: self.result.recommendations.clone(),
            detected_keywords: self.result.matched_keywords.clone(),
            ground_truth: self.ground_truth,
        }
    }
}

/// Response shape for a stored consultation.
#[derive(Debug, Clone, Serialize)]
pub struct ConsultationView {
    pub consultation_id: ConsultationId,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub total_score: u32,
    pub tier: RiskTier,
    pub status: &'static str,
    pub color: DisplayTag,
    pub urgency: String,
    pub subtypes: Vec<&'static str>,
    pub recommendations: Vec<String>,
    pub detected_keywords: Vec<MatchedKeyword>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ground_truth: Option<RiskTier>,
}
