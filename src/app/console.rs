use std::io::{self, Write};

use tbc_triage::triage::metrics::as_percent;
use tbc_triage::triage::statistics::RankedCount;
use tbc_triage::triage::{
    ConsultationId, ConsultationStatistics, EvaluationReport, QuestionItem, QuestionKind,
    RespondentMetadata, RiskTier, ScoringResult,
};

pub(crate) fn write_questions<W: Write>(
    out: &mut W,
    kind: QuestionKind,
    questions: &[QuestionItem],
) -> io::Result<()> {
    let heading = match kind {
        QuestionKind::Symptoms => "Symptoms (gejala)",
        QuestionKind::RiskFactors => "Risk factors (faktor risiko)",
    };
    writeln!(out, "{heading}: {} questions", questions.len())?;
    for question in questions {
        writeln!(
            out,
            "  {:<16} +{}  {}",
            question.key, question.weight, question.prompt
        )?;
    }
    Ok(())
}

pub(crate) fn write_assessment<W: Write>(
    out: &mut W,
    respondent: &RespondentMetadata,
    result: &ScoringResult,
    consultation_id: Option<&ConsultationId>,
) -> io::Result<()> {
    writeln!(out, "TB symptom triage")?;
    let age = if respondent.age == 0 {
        "-".to_string()
    } else {
        respondent.age.to_string()
    };
    writeln!(
        out,
        "  Respondent: {} ({}, {}, {})",
        respondent.name, age, respondent.gender, respondent.location
    )?;
    match consultation_id {
        Some(id) => writeln!(out, "  Consultation: {id}")?,
        None => writeln!(out, "  Consultation: not saved")?,
    }
    writeln!(out, "  Total score: {}", result.total_score)?;
    writeln!(out, "  Status: {} ({})", result.tier.label(), result.urgency)?;
    writeln!(out, "  Suspected type: {}", result.subtype_summary())?;

    if result.matched_keywords.is_empty() {
        writeln!(out, "  Narrative keywords: none")?;
    } else {
        let keywords: Vec<String> = result
            .matched_keywords
            .iter()
            .map(|keyword| format!("{} (+{})", keyword.phrase, keyword.weight))
            .collect();
        writeln!(out, "  Narrative keywords: {}", keywords.join(", "))?;
    }

    writeln!(out, "\nRecommendations")?;
    for line in &result.recommendations {
        writeln!(out, "  - {line}")?;
    }
    Ok(())
}

pub(crate) fn write_statistics<W: Write>(
    out: &mut W,
    statistics: &ConsultationStatistics,
) -> io::Result<()> {
    writeln!(
        out,
        "Consultations: {} (average score {:.2})",
        statistics.total, statistics.average_score
    )?;

    writeln!(out, "\nBy tier")?;
    for entry in &statistics.by_tier {
        writeln!(out, "  {:<16} {}", entry.label, entry.count)?;
    }

    writeln!(
        out,
        "\nGender: Laki-laki {}, Perempuan {}",
        statistics.male, statistics.female
    )?;

    writeln!(out, "\nAge groups")?;
    for entry in &statistics.age_buckets {
        writeln!(out, "  {:<6} {}", entry.label, entry.count)?;
    }

    write_ranking(out, "Top locations", &statistics.top_locations)?;
    write_ranking(out, "Top suspected types", &statistics.top_subtypes)?;

    if statistics.recent.is_empty() {
        writeln!(out, "\nRecent consultations: none")?;
    } else {
        writeln!(out, "\nRecent consultations")?;
        for entry in &statistics.recent {
            writeln!(
                out,
                "  {} {} {} ({}) score {} {}",
                entry.id,
                entry.created_at.format("%Y-%m-%d %H:%M"),
                entry.name,
                entry.location,
                entry.total_score,
                entry.status
            )?;
        }
    }
    Ok(())
}

fn write_ranking<W: Write>(out: &mut W, heading: &str, ranking: &[RankedCount]) -> io::Result<()> {
    if ranking.is_empty() {
        return writeln!(out, "\n{heading}: none");
    }
    writeln!(out, "\n{heading}")?;
    for entry in ranking {
        writeln!(out, "  {:<4} {}", entry.count, entry.name)?;
    }
    Ok(())
}

pub(crate) fn write_evaluation<W: Write>(out: &mut W, report: &EvaluationReport) -> io::Result<()> {
    writeln!(out, "Evaluation ({} labeled)", report.sample_count)?;
    let Some(metrics) = &report.metrics else {
        let message = report.message.as_deref().unwrap_or("not enough data");
        return writeln!(out, "  {message}");
    };

    writeln!(out, "  Accuracy:  {:.2}%", as_percent(metrics.accuracy))?;
    writeln!(out, "  F1:        {:.2}%", as_percent(metrics.f1_weighted))?;
    writeln!(out, "  Precision: {:.2}%", as_percent(metrics.precision_weighted))?;
    writeln!(out, "  Recall:    {:.2}%", as_percent(metrics.recall_weighted))?;

    writeln!(
        out,
        "\n  {:<16} {:>9} {:>9} {:>9} {:>7}",
        "tier", "precision", "recall", "f1", "support"
    )?;
    for entry in &metrics.per_tier {
        writeln!(
            out,
            "  {:<16} {:>9.2} {:>9.2} {:>9.2} {:>7}",
            entry.tier.label(),
            entry.precision,
            entry.recall,
            entry.f1,
            entry.support
        )?;
    }

    writeln!(out, "\n  Confusion matrix (rows actual, columns predicted)")?;
    let header: Vec<String> = RiskTier::ordered()
        .iter()
        .map(|tier| format!("{:>8}", short_name(*tier)))
        .collect();
    writeln!(out, "  {:<8}{}", "", header.concat())?;
    for tier in RiskTier::ordered() {
        let row: Vec<String> = metrics.confusion_matrix[tier.index()]
            .iter()
            .map(|count| format!("{count:>8}"))
            .collect();
        writeln!(out, "  {:<8}{}", short_name(tier), row.concat())?;
    }
    Ok(())
}

fn short_name(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::Minimal => "MINIMAL",
        RiskTier::Low => "RENDAH",
        RiskTier::Moderate => "SEDANG",
        RiskTier::High => "TINGGI",
    }
}
