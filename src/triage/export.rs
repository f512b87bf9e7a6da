use std::io::Write;

use serde::Serialize;

use super::domain::ConsultationRecord;

const COLUMNS: [&str; 12] = [
    "id",
    "created_at",
    "name",
    "age",
    "gender",
    "location",
    "total_score",
    "status",
    "subtypes",
    "keywords",
    "ground_truth",
    "narrative",
];

/// Flat CSV row for spreadsheet review and offline labeling.
#[derive(Debug, Serialize)]
struct ConsultationRow<'a> {
    id: &'a str,
    created_at: String,
    name: &'a str,
    age: u32,
    gender: &'a str,
    location: &'a str,
    total_score: u32,
    status: &'static str,
    subtypes: String,
    keywords: String,
    ground_truth: &'static str,
    narrative: &'a str,
}

impl<'a> From<&'a ConsultationRecord> for ConsultationRow<'a> {
    fn from(record: &'a ConsultationRecord) -> Self {
        Self {
            id: &record.id.0,
            created_at: record.created_at.to_rfc3339(),
            name: &record.form.respondent.name,
            age: record.form.respondent.age,
            gender: &record.form.respondent.gender,
            location: &record.form.respondent.location,
            total_score: record.result.total_score,
            status: record.result.tier.label(),
            subtypes: record.result.subtype_summary(),
            keywords: record
                .result
                .matched_keywords
                .iter()
                .map(|keyword| keyword.phrase.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            ground_truth: record.ground_truth.map(|tier| tier.label()).unwrap_or(""),
            narrative: &record.form.narrative,
        }
    }
}

/// Write consultations as CSV. The header row is written even when `records` is empty.
/// Returns the number of data rows.
pub fn write_consultations_csv<W: Write>(
    writer: W,
    records: &[ConsultationRecord],
) -> Result<usize, csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(COLUMNS)?;

    for record in records {
        csv_writer.serialize(ConsultationRow::from(record))?;
    }
    csv_writer.flush()?;
    Ok(records.len())
}
