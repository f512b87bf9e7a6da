use super::common::*;
use crate::triage::catalog::{KeywordWeight, QuestionCatalog, QuestionItem};
use crate::triage::domain::{AnswerSet, DisplayTag, MatchedKeyword, RiskTier, Subtype};
use crate::triage::engine::{
    classify, compute_score, generate_recommendations, infer_subtypes, CLOSING_ADVISORIES,
};

#[test]
fn long_cough_and_fever_score_low_pulmonary() {
    let result = engine().analyze(
        &respondent(),
        &answers(&["batuk_lama", "demam"]),
        &AnswerSet::new(),
        "",
    );

    assert_eq!(result.total_score, 5);
    assert_eq!(result.tier, RiskTier::Low);
    assert_eq!(result.subtypes, vec![Subtype::Pulmonary]);
    assert!(result.matched_keywords.is_empty());
}

#[test]
fn bloody_cough_hiv_and_fever_narrative_score_high() {
    let result = engine().analyze(
        &respondent(),
        &answers(&["batuk_darah"]),
        &answers(&["hiv"]),
        "sering demam",
    );

    assert_eq!(result.total_score, 10);
    assert_eq!(result.tier, RiskTier::High);
    assert_eq!(result.urgency, "SEGERA");
    assert_eq!(result.display_tag, DisplayTag::Danger);
    assert_eq!(
        result.matched_keywords,
        vec![MatchedKeyword {
            phrase: "demam".to_string(),
            weight: 2
        }]
    );
}

#[test]
fn empty_questionnaire_is_minimal_and_unspecified() {
    let result = engine().analyze(&respondent(), &AnswerSet::new(), &AnswerSet::new(), "");

    assert_eq!(result.total_score, 0);
    assert_eq!(result.tier, RiskTier::Minimal);
    assert_eq!(result.subtypes, vec![Subtype::Unspecified]);
    assert_eq!(result.subtype_summary(), "Tidak terdeteksi jenis spesifik");
}

#[test]
fn narrative_matching_uses_substrings_not_tokens() {
    let catalog = QuestionCatalog::standard();
    let (total, matched) = compute_score(
        &AnswerSet::new(),
        &AnswerSet::new(),
        "batuk darah terus menerus",
        &catalog,
    );

    assert_eq!(total, 4);
    let phrases: Vec<&str> = matched.iter().map(|keyword| keyword.phrase.as_str()).collect();
    assert_eq!(phrases, vec!["batuk darah"]);
}

#[test]
fn overlapping_phrases_fire_independently_in_table_order() {
    let catalog = QuestionCatalog::standard();
    let (total, matched) = compute_score(
        &AnswerSet::new(),
        &AnswerSet::new(),
        "Saya BERKERINGAT MALAM dan lemas",
        &catalog,
    );

    // "keringat malam" sits inside "berkeringat malam"; both count.
    let phrases: Vec<&str> = matched.iter().map(|keyword| keyword.phrase.as_str()).collect();
    assert_eq!(phrases, vec!["keringat malam", "berkeringat malam", "lemas"]);
    assert_eq!(total, 2 + 2 + 1);
}

#[test]
fn unknown_and_false_answers_never_contribute() {
    let catalog = QuestionCatalog::standard();
    let mut symptoms = answers(&["tidak_ada_di_katalog"]);
    symptoms.set("batuk_lama", false);
    let (total, matched) = compute_score(&symptoms, &AnswerSet::new(), "   ", &catalog);

    assert_eq!(total, 0);
    assert!(matched.is_empty());
}

#[test]
fn total_equals_sum_of_three_evidence_sources() {
    let catalog = QuestionCatalog::standard();
    let symptom_keys = ["batuk_lama", "keringat_malam", "nyeri_tulang", "sakit_kepala"];
    let risk_keys = ["kontak_tbc", "merokok", "gizi_buruk"];
    let narrative = "batuk lama, panas, badan kurus dan capek";

    let (total, matched) = compute_score(
        &answers(&symptom_keys),
        &answers(&risk_keys),
        narrative,
        &catalog,
    );

    let weight_of = |items: &[QuestionItem], key: &str| {
        items
            .iter()
            .find(|item| item.key == key)
            .map(|item| item.weight)
            .expect("catalog key")
    };
    let symptom_sum: u32 = symptom_keys
        .iter()
        .map(|key| weight_of(catalog.symptoms(), key))
        .sum();
    let risk_sum: u32 = risk_keys
        .iter()
        .map(|key| weight_of(catalog.risk_factors(), key))
        .sum();
    let keyword_sum: u32 = catalog
        .keywords()
        .iter()
        .filter(|keyword| narrative.contains(keyword.phrase))
        .map(|keyword| keyword.weight)
        .sum();

    assert_eq!(total, symptom_sum + risk_sum + keyword_sum);
    assert_eq!(
        matched.iter().map(|keyword| keyword.weight).sum::<u32>(),
        keyword_sum
    );
}

#[test]
fn injected_catalog_drives_scoring() {
    let catalog = QuestionCatalog::new(
        vec![QuestionItem {
            key: "demam",
            prompt: "Demam?",
            weight: 7,
            category: None,
        }],
        Vec::new(),
        vec![
            KeywordWeight {
                phrase: "darah",
                weight: 1,
            },
            KeywordWeight {
                phrase: "batuk darah",
                weight: 5,
            },
        ],
    )
    .expect("valid catalog");

    let (total, matched) = compute_score(
        &answers(&["demam"]),
        &AnswerSet::new(),
        "batuk darah",
        &catalog,
    );
    assert_eq!(total, 7 + 1 + 5);
    assert_eq!(matched[0].phrase, "darah");
    assert_eq!(matched[1].phrase, "batuk darah");
}

#[test]
fn classify_thresholds_are_inclusive() {
    let cases = [
        (0, RiskTier::Minimal, "MONITOR GEJALA", DisplayTag::Success),
        (2, RiskTier::Minimal, "MONITOR GEJALA", DisplayTag::Success),
        (3, RiskTier::Low, "DALAM 1 MINGGU", DisplayTag::Info),
        (5, RiskTier::Low, "DALAM 1 MINGGU", DisplayTag::Info),
        (6, RiskTier::Moderate, "DALAM 1-2 HARI", DisplayTag::Warning),
        (9, RiskTier::Moderate, "DALAM 1-2 HARI", DisplayTag::Warning),
        (10, RiskTier::High, "SEGERA", DisplayTag::Danger),
        (57, RiskTier::High, "SEGERA", DisplayTag::Danger),
    ];

    for (score, tier, urgency, tag) in cases {
        let assessment = classify(score);
        assert_eq!(assessment.tier, tier, "score {score}");
        assert_eq!(assessment.urgency, urgency, "score {score}");
        assert_eq!(assessment.display_tag, tag, "score {score}");
    }
}

#[test]
fn classify_is_monotonic() {
    let mut previous = classify(0).tier;
    for score in 1..=100 {
        let tier = classify(score).tier;
        assert!(tier >= previous, "score {score} dropped from {previous:?} to {tier:?}");
        previous = tier;
    }
}

#[test]
fn subtype_rules_are_independent_and_ordered() {
    let subtypes = infer_subtypes(&answers(&[
        "sakit_kepala",
        "bengkak_sendi",
        "benjolan_leher",
        "demam",
    ]));
    assert_eq!(
        subtypes,
        vec![
            Subtype::Pulmonary,
            Subtype::Lymphatic,
            Subtype::SkeletalJoint,
            Subtype::PossibleMeningeal,
        ]
    );

    assert_eq!(
        infer_subtypes(&answers(&["nyeri_tulang"])),
        vec![Subtype::SkeletalJoint]
    );
    assert_eq!(
        infer_subtypes(&answers(&["keringat_malam", "penurunan_bb"])),
        vec![Subtype::Unspecified]
    );
}

#[test]
fn subtypes_are_never_empty() {
    let catalog = QuestionCatalog::standard();
    for item in catalog.symptoms() {
        let subtypes = infer_subtypes(&answers(&[item.key]));
        assert!(!subtypes.is_empty(), "{} produced no subtype", item.key);
    }
    assert!(!infer_subtypes(&AnswerSet::new()).is_empty());
}

#[test]
fn referral_block_starts_at_moderate_scores() {
    let below = generate_recommendations(5, &[Subtype::Unspecified], "DALAM 1 MINGGU");
    assert_eq!(below.len(), CLOSING_ADVISORIES.len());

    let at = generate_recommendations(6, &[Subtype::Unspecified], "DALAM 1-2 HARI");
    assert_eq!(at.len(), CLOSING_ADVISORIES.len() + 3);
    assert!(at[0].contains("DALAM 1-2 HARI"));
    assert!(at[1].contains("BTA"));
    assert!(at[2].contains("rontgen"));
}

#[test]
fn subtype_blocks_follow_label_fragments() {
    let all = [
        Subtype::Pulmonary,
        Subtype::Lymphatic,
        Subtype::SkeletalJoint,
        Subtype::PossibleMeningeal,
    ];
    let recommendations = generate_recommendations(0, &all, "MONITOR GEJALA");

    assert!(recommendations[0].contains("masker"));
    assert!(recommendations[1].contains("ventilasi"));
    assert!(recommendations[2].contains("FNAB"));
    assert!(recommendations[3].contains("ortopedi"));
    assert!(recommendations[4].contains("IGD"));
    assert_eq!(recommendations.len(), 5 + CLOSING_ADVISORIES.len());
}

#[test]
fn recommendations_always_end_with_closing_block() {
    let inputs: [(u32, &[Subtype], &str); 4] = [
        (0, &[Subtype::Unspecified], "MONITOR GEJALA"),
        (4, &[Subtype::Pulmonary], "DALAM 1 MINGGU"),
        (8, &[Subtype::Lymphatic, Subtype::SkeletalJoint], "DALAM 1-2 HARI"),
        (21, &[Subtype::PossibleMeningeal], "SEGERA"),
    ];

    for (score, subtypes, urgency) in inputs {
        let recommendations = generate_recommendations(score, subtypes, urgency);
        let tail = &recommendations[recommendations.len() - CLOSING_ADVISORIES.len()..];
        assert_eq!(tail, CLOSING_ADVISORIES.as_slice());
    }
}

#[test]
fn analyze_is_deterministic() {
    let first = engine().analyze_form(&form(&["batuk_lama"], &["diabetes"], "sesak dan lelah"));
    let second = engine().analyze_form(&form(&["batuk_lama"], &["diabetes"], "sesak dan lelah"));
    assert_eq!(first, second);
}
