use super::super::domain::{AnswerSet, Subtype};

/// Map symptom patterns to disease sites. Never returns an empty list.
pub fn infer_subtypes(symptoms: &AnswerSet) -> Vec<Subtype> {
    let mut subtypes = Vec::new();

    if symptoms.is_true("batuk_lama") || symptoms.is_true("batuk_darah") || symptoms.is_true("demam")
    {
        subtypes.push(Subtype::Pulmonary);
    }
    if symptoms.is_true("benjolan_leher") {
        subtypes.push(Subtype::Lymphatic);
    }
    if symptoms.is_true("nyeri_tulang") || symptoms.is_true("bengkak_sendi") {
        subtypes.push(Subtype::SkeletalJoint);
    }
    if symptoms.is_true("sakit_kepala") {
        subtypes.push(Subtype::PossibleMeningeal);
    }

    if subtypes.is_empty() {
        subtypes.push(Subtype::Unspecified);
    }

    subtypes
}
