use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{ConsultationId, ConsultationRecord, RiskTier};
use super::intake::UNSPECIFIED;

const TOP_LIMIT: usize = 5;
const RECENT_LIMIT: usize = 10;
const MALE: &str = "Laki-laki";
const FEMALE: &str = "Perempuan";

/// Descriptive aggregates over every stored consultation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsultationStatistics {
    pub total: usize,
    pub by_tier: Vec<TierCount>,
    pub average_score: f64,
    pub male: usize,
    pub female: usize,
    pub age_buckets: Vec<AgeBucketCount>,
    pub top_locations: Vec<RankedCount>,
    pub top_subtypes: Vec<RankedCount>,
    pub recent: Vec<RecentConsultation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierCount {
    pub tier: RiskTier,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBucket {
    Under18,
    From18To29,
    From30To44,
    From45To59,
    From60,
}

impl AgeBucket {
    pub const fn ordered() -> [AgeBucket; 5] {
        [
            Self::Under18,
            Self::From18To29,
            Self::From30To44,
            Self::From45To59,
            Self::From60,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Under18 => "0-17",
            Self::From18To29 => "18-29",
            Self::From30To44 => "30-44",
            Self::From45To59 => "45-59",
            Self::From60 => "60+",
        }
    }

    /// Age 0 is the "unknown" sentinel and falls in no bucket.
    pub fn for_age(age: u32) -> Option<Self> {
        match age {
            0 => None,
            1..=17 => Some(Self::Under18),
            18..=29 => Some(Self::From18To29),
            30..=44 => Some(Self::From30To44),
            45..=59 => Some(Self::From45To59),
            _ => Some(Self::From60),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeBucketCount {
    pub bucket: AgeBucket,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentConsultation {
    pub id: ConsultationId,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub location: String,
    pub total_score: u32,
    pub status: &'static str,
    pub subtypes: String,
}

impl ConsultationStatistics {
    pub fn from_records(records: &[ConsultationRecord]) -> Self {
        let total = records.len();

        let by_tier = RiskTier::ordered()
            .into_iter()
            .map(|tier| TierCount {
                tier,
                label: tier.label(),
                count: records
                    .iter()
                    .filter(|record| record.result.tier == tier)
                    .count(),
            })
            .collect();

        let average_score = if total == 0 {
            0.0
        } else {
            let sum: u64 = records
                .iter()
                .map(|record| u64::from(record.result.total_score))
                .sum();
            round2(sum as f64 / total as f64)
        };

        let gender_count = |gender: &str| {
            records
                .iter()
                .filter(|record| record.form.respondent.gender == gender)
                .count()
        };

        let age_buckets = AgeBucket::ordered()
            .into_iter()
            .map(|bucket| AgeBucketCount {
                bucket,
                label: bucket.label(),
                count: records
                    .iter()
                    .filter(|record| AgeBucket::for_age(record.form.respondent.age) == Some(bucket))
                    .count(),
            })
            .collect();

        let top_locations = top_counts(records.iter().filter_map(|record| {
            let location = record.form.respondent.location.trim();
            (!location.is_empty() && location != UNSPECIFIED).then(|| location.to_string())
        }));

        let top_subtypes = top_counts(
            records
                .iter()
                .map(|record| record.result.subtype_summary())
                .filter(|summary| !summary.is_empty()),
        );

        let mut newest_first: Vec<&ConsultationRecord> = records.iter().collect();
        newest_first.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        let recent = newest_first
            .into_iter()
            .take(RECENT_LIMIT)
            .map(|record| RecentConsultation {
                id: record.id.clone(),
                created_at: record.created_at,
                name: record.form.respondent.name.clone(),
                location: record.form.respondent.location.clone(),
                total_score: record.result.total_score,
                status: record.result.tier.label(),
                subtypes: record.result.subtype_summary(),
            })
            .collect();

        Self {
            total,
            by_tier,
            average_score,
            male: gender_count(MALE),
            female: gender_count(FEMALE),
            age_buckets,
            top_locations,
            top_subtypes,
            recent,
        }
    }

    pub fn tier_count(&self, tier: RiskTier) -> usize {
        self.by_tier
            .iter()
            .find(|entry| entry.tier == tier)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }
}

/// Highest counts first; ties broken alphabetically so output is stable.
fn top_counts(values: impl Iterator<Item = String>) -> Vec<RankedCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }

    let mut ranked: Vec<RankedCount> = counts
        .into_iter()
        .map(|(name, count)| RankedCount { name, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(TOP_LIMIT);
    ranked
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
