use super::super::domain::{DisplayTag, RiskTier};

/// Tier, urgency phrase and display colour for a total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierAssessment {
    pub tier: RiskTier,
    pub urgency: &'static str,
    pub display_tag: DisplayTag,
}

const HIGH_THRESHOLD: u32 = 10;
const MODERATE_THRESHOLD: u32 = 6;
const LOW_THRESHOLD: u32 = 3;

/// Thresholds are inclusive at the bottom and unbounded above.
pub fn classify(total_score: u32) -> TierAssessment {
    if total_score >= HIGH_THRESHOLD {
        TierAssessment {
            tier: RiskTier::High,
            urgency: "SEGERA",
            display_tag: DisplayTag::Danger,
        }
    } else if total_score >= MODERATE_THRESHOLD {
        TierAssessment {
            tier: RiskTier::Moderate,
            urgency: "DALAM 1-2 HARI",
            display_tag: DisplayTag::Warning,
        }
    } else if total_score >= LOW_THRESHOLD {
        TierAssessment {
            tier: RiskTier::Low,
            urgency: "DALAM 1 MINGGU",
            display_tag: DisplayTag::Info,
        }
    } else {
        TierAssessment {
            tier: RiskTier::Minimal,
            urgency: "MONITOR GEJALA",
            display_tag: DisplayTag::Success,
        }
    }
}
