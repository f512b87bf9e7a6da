use std::collections::HashSet;

use serde::Serialize;

/// Body-site grouping for symptom questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    Paru,
    Kelenjar,
    Tulang,
    SelaputOtak,
}

/// One yes/no question with the weight a `true` answer contributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionItem {
    pub key: &'static str,
    pub prompt: &'static str,
    pub weight: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<QuestionCategory>,
}

/// Lowercase narrative phrase matched by substring containment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordWeight {
    pub phrase: &'static str,
    pub weight: u32,
}

/// Which question list a caller is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Symptoms,
    RiskFactors,
}

impl QuestionKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "symptoms" | "gejala" => Some(Self::Symptoms),
            "risk_factors" | "risk-factors" | "faktor_risiko" | "risiko" => Some(Self::RiskFactors),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate question key '{key}' in {list} list")]
    DuplicateKey { list: &'static str, key: &'static str },
    #[error("duplicate keyword phrase '{0}'")]
    DuplicatePhrase(&'static str),
    #[error("keyword phrase '{0}' must be lowercase")]
    UppercasePhrase(&'static str),
}

/// Immutable question and keyword tables injected into the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionCatalog {
    symptoms: Vec<QuestionItem>,
    risk_factors: Vec<QuestionItem>,
    keywords: Vec<KeywordWeight>,
}

impl QuestionCatalog {
    pub fn new(
        symptoms: Vec<QuestionItem>,
        risk_factors: Vec<QuestionItem>,
        keywords: Vec<KeywordWeight>,
    ) -> Result<Self, CatalogError> {
        ensure_unique_keys("symptom", &symptoms)?;
        ensure_unique_keys("risk factor", &risk_factors)?;

        let mut phrases = HashSet::new();
        for keyword in &keywords {
            if keyword.phrase.to_lowercase() != keyword.phrase {
                return Err(CatalogError::UppercasePhrase(keyword.phrase));
            }
            if !phrases.insert(keyword.phrase) {
                return Err(CatalogError::DuplicatePhrase(keyword.phrase));
            }
        }

        Ok(Self {
            symptoms,
            risk_factors,
            keywords,
        })
    }

    /// The TBC screening questionnaire used in production.
    pub fn standard() -> Self {
        Self {
            symptoms: STANDARD_SYMPTOMS.to_vec(),
            risk_factors: STANDARD_RISK_FACTORS.to_vec(),
            keywords: STANDARD_KEYWORDS.to_vec(),
        }
    }

    pub fn symptoms(&self) -> &[QuestionItem] {
        &self.symptoms
    }

    pub fn risk_factors(&self) -> &[QuestionItem] {
        &self.risk_factors
    }

    pub fn keywords(&self) -> &[KeywordWeight] {
        &self.keywords
    }

    pub fn questions(&self, kind: QuestionKind) -> &[QuestionItem] {
        match kind {
            QuestionKind::Symptoms => &self.symptoms,
            QuestionKind::RiskFactors => &self.risk_factors,
        }
    }
}

impl Default for QuestionCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn ensure_unique_keys(list: &'static str, items: &[QuestionItem]) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.key) {
            return Err(CatalogError::DuplicateKey {
                list,
                key: item.key,
            });
        }
    }
    Ok(())
}

const fn symptom(
    key: &'static str,
    prompt: &'static str,
    weight: u32,
    category: QuestionCategory,
) -> QuestionItem {
    QuestionItem {
        key,
        prompt,
        weight,
        category: Some(category),
    }
}

const fn risk(key: &'static str, prompt: &'static str, weight: u32) -> QuestionItem {
    QuestionItem {
        key,
        prompt,
        weight,
        category: None,
    }
}

const fn keyword(phrase: &'static str, weight: u32) -> KeywordWeight {
    KeywordWeight { phrase, weight }
}

const STANDARD_SYMPTOMS: [QuestionItem; 13] = [
    symptom(
        "batuk_lama",
        "Apakah Anda mengalami batuk lebih dari 2-3 minggu?",
        3,
        QuestionCategory::Paru,
    ),
    symptom(
        "batuk_darah",
        "Apakah batuk disertai darah?",
        4,
        QuestionCategory::Paru,
    ),
    symptom(
        "demam",
        "Apakah mengalami demam (terutama sore/malam)?",
        2,
        QuestionCategory::Paru,
    ),
    symptom(
        "keringat_malam",
        "Apakah berkeringat banyak di malam hari?",
        2,
        QuestionCategory::Paru,
    ),
    symptom(
        "penurunan_bb",
        "Apakah mengalami penurunan berat badan tanpa sebab jelas?",
        3,
        QuestionCategory::Paru,
    ),
    symptom(
        "nafsu_makan",
        "Apakah nafsu makan menurun?",
        1,
        QuestionCategory::Paru,
    ),
    symptom(
        "sesak_napas",
        "Apakah mengalami sesak napas?",
        2,
        QuestionCategory::Paru,
    ),
    symptom(
        "nyeri_dada",
        "Apakah merasakan nyeri dada?",
        2,
        QuestionCategory::Paru,
    ),
    symptom(
        "lemah_lesu",
        "Apakah merasa lemah dan lesu berkepanjangan?",
        1,
        QuestionCategory::Paru,
    ),
    symptom(
        "benjolan_leher",
        "Apakah ada benjolan di leher/ketiak?",
        2,
        QuestionCategory::Kelenjar,
    ),
    symptom(
        "nyeri_tulang",
        "Apakah ada nyeri tulang/sendi yang persisten?",
        2,
        QuestionCategory::Tulang,
    ),
    symptom(
        "bengkak_sendi",
        "Apakah ada pembengkakan pada sendi?",
        2,
        QuestionCategory::Tulang,
    ),
    symptom(
        "sakit_kepala",
        "Apakah mengalami sakit kepala hebat/terus-menerus?",
        2,
        QuestionCategory::SelaputOtak,
    ),
];

const STANDARD_RISK_FACTORS: [QuestionItem; 7] = [
    risk(
        "kontak_tbc",
        "Apakah pernah kontak dekat dengan penderita TBC?",
        3,
    ),
    risk("riwayat_tbc", "Apakah pernah menderita TBC sebelumnya?", 3),
    risk(
        "hiv",
        "Apakah memiliki HIV/AIDS atau gangguan sistem imun?",
        4,
    ),
    risk("diabetes", "Apakah memiliki diabetes?", 2),
    risk("merokok", "Apakah Anda perokok aktif?", 1),
    risk(
        "lingkungan_padat",
        "Apakah tinggal di lingkungan padat/kurang ventilasi?",
        1,
    ),
    risk("gizi_buruk", "Apakah mengalami kekurangan gizi?", 2),
];

// Declaration order is match order.
const STANDARD_KEYWORDS: [KeywordWeight; 24] = [
    keyword("batuk darah", 4),
    keyword("batuk berdarah", 4),
    keyword("dahak berdarah", 4),
    keyword("batuk lama", 3),
    keyword("batuk terus", 3),
    keyword("batuk berkepanjangan", 3),
    keyword("demam", 2),
    keyword("panas", 2),
    keyword("keringat malam", 2),
    keyword("berkeringat malam", 2),
    keyword("berat badan turun", 3),
    keyword("kurus", 2),
    keyword("nafsu makan hilang", 1),
    keyword("sesak", 2),
    keyword("susah napas", 2),
    keyword("napas pendek", 2),
    keyword("lemas", 1),
    keyword("lemah", 1),
    keyword("capek", 1),
    keyword("lelah", 1),
    keyword("lesu", 1),
    keyword("benjolan", 2),
    keyword("nyeri tulang", 2),
    keyword("sakit kepala", 2),
];
