use crate::app::console::{write_assessment, write_evaluation, write_questions, write_statistics};
use crate::app::infra::{consultation_service, open_store};
use crate::app::server;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tbc_triage::config::AppConfig;
use tbc_triage::error::AppError;
use tbc_triage::telemetry;
use tbc_triage::triage::export::write_consultations_csv;
use tbc_triage::triage::router::StatisticsReportView;
use tbc_triage::triage::{
    ConsultationId, ConsultationRequest, ConsultationServiceError, QuestionKind, TriageEngine,
};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "TB Symptom Triage",
    about = "Score TB symptom questionnaires and report on triage accuracy",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// List the questionnaire items and their weights
    Questions(QuestionsArgs),
    /// Score one questionnaire from the command line
    Assess(AssessArgs),
    /// Attach or clear the reviewer label on a stored consultation
    Label(LabelArgs),
    /// Print descriptive statistics and evaluation metrics
    Report(ReportArgs),
    /// Write every stored consultation to CSV
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
struct QuestionsArgs {
    /// Only list one question set
    #[arg(long, value_enum)]
    kind: Option<QuestionSet>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum QuestionSet {
    Symptoms,
    RiskFactors,
}

impl From<QuestionSet> for QuestionKind {
    fn from(value: QuestionSet) -> Self {
        match value {
            QuestionSet::Symptoms => QuestionKind::Symptoms,
            QuestionSet::RiskFactors => QuestionKind::RiskFactors,
        }
    }
}

#[derive(Args, Debug, Default)]
struct AssessArgs {
    /// Respondent name (defaults to Anonim)
    #[arg(long)]
    name: Option<String>,
    /// Respondent age in years
    #[arg(long)]
    age: Option<u32>,
    /// Respondent gender, e.g. Laki-laki or Perempuan
    #[arg(long)]
    gender: Option<String>,
    /// Respondent city or district
    #[arg(long)]
    location: Option<String>,
    /// Symptom key answered "yes"; repeat for each symptom
    #[arg(long = "symptom", value_name = "KEY")]
    symptoms: Vec<String>,
    /// Risk factor key answered "yes"; repeat for each factor
    #[arg(long = "risk", value_name = "KEY")]
    risk_factors: Vec<String>,
    /// Free-text description of the complaint
    #[arg(long)]
    story: Option<String>,
    /// Persist the consultation to the configured store
    #[arg(long)]
    save: bool,
}

#[derive(Args, Debug)]
struct LabelArgs {
    /// Consultation id, e.g. cst-000001
    id: String,
    /// Tier label such as "RISIKO TINGGI" or "high"
    #[arg(required_unless_present = "clear")]
    ground_truth: Option<String>,
    /// Remove an existing label instead of setting one
    #[arg(long, conflicts_with = "ground_truth")]
    clear: bool,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Emit the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Destination file (defaults to stdout)
    #[arg(long, short)]
    output: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(config, args).await,
        Command::Questions(args) => run_questions(args),
        Command::Assess(args) => run_assess(&config, args),
        Command::Label(args) => run_label(&config, args),
        Command::Report(args) => run_report(&config, args),
        Command::Export(args) => run_export(&config, args),
    }
}

fn run_questions(args: QuestionsArgs) -> Result<(), AppError> {
    let engine = TriageEngine::default();
    let kinds = match args.kind {
        Some(kind) => vec![kind.into()],
        None => vec![QuestionKind::Symptoms, QuestionKind::RiskFactors],
    };

    let mut out = io::stdout().lock();
    for (position, kind) in kinds.into_iter().enumerate() {
        if position > 0 {
            writeln!(out)?;
        }
        write_questions(&mut out, kind, engine.catalog().questions(kind))?;
    }
    Ok(())
}

fn run_assess(config: &AppConfig, args: AssessArgs) -> Result<(), AppError> {
    let engine = TriageEngine::default();
    warn_unknown_keys(&engine, QuestionKind::Symptoms, &args.symptoms);
    warn_unknown_keys(&engine, QuestionKind::RiskFactors, &args.risk_factors);

    let save = args.save;
    let request = request_from_args(args);
    let mut out = io::stdout().lock();

    if save {
        let service = consultation_service(open_store(&config.storage)?);
        let record = service.submit(request)?;
        write_assessment(
            &mut out,
            &record.form.respondent,
            &record.result,
            Some(&record.id),
        )?;
    } else {
        let form = tbc_triage::triage::IntakeGuard
            .form_from_request(request)
            .map_err(ConsultationServiceError::from)?;
        let result = engine.analyze_form(&form);
        write_assessment(&mut out, &form.respondent, &result, None)?;
    }
    Ok(())
}

fn run_label(config: &AppConfig, args: LabelArgs) -> Result<(), AppError> {
    let service = consultation_service(open_store(&config.storage)?);
    let label = if args.clear {
        None
    } else {
        args.ground_truth.as_deref()
    };

    let record = service.label(&ConsultationId(args.id), label)?;
    match record.ground_truth {
        Some(tier) => println!("{} labeled {}", record.id, tier.label()),
        None => println!("{} label cleared", record.id),
    }
    Ok(())
}

fn run_report(config: &AppConfig, args: ReportArgs) -> Result<(), AppError> {
    let service = consultation_service(open_store(&config.storage)?);
    let statistics = service.statistics()?;
    let evaluation = service.evaluation()?;

    let mut out = io::stdout().lock();
    if args.json {
        let view = StatisticsReportView {
            statistics,
            evaluation,
        };
        serde_json::to_writer_pretty(&mut out, &view)?;
        writeln!(out)?;
    } else {
        write_statistics(&mut out, &statistics)?;
        writeln!(out)?;
        write_evaluation(&mut out, &evaluation)?;
    }
    Ok(())
}

fn run_export(config: &AppConfig, args: ExportArgs) -> Result<(), AppError> {
    let service = consultation_service(open_store(&config.storage)?);
    let records = service.consultations()?;

    let written = match &args.output {
        Some(path) => {
            let file = BufWriter::new(File::create(path)?);
            let written = write_consultations_csv(file, &records)?;
            info!(path = %path.display(), rows = written, "consultations exported");
            written
        }
        None => write_consultations_csv(io::stdout().lock(), &records)?,
    };

    if written == 0 {
        warn!("no consultations to export");
    }
    Ok(())
}

fn request_from_args(args: AssessArgs) -> ConsultationRequest {
    ConsultationRequest {
        name: args.name.map(Value::String),
        age: args.age.map(Value::from),
        gender: args.gender.map(Value::String),
        location: args.location.map(Value::String),
        symptoms: Some(affirmed(args.symptoms)),
        risk_factors: Some(affirmed(args.risk_factors)),
        narrative: args.story.map(Value::String),
    }
}

fn affirmed(keys: Vec<String>) -> Value {
    Value::Object(
        keys.into_iter()
            .map(|key| (key, Value::Bool(true)))
            .collect::<Map<String, Value>>(),
    )
}

fn warn_unknown_keys(engine: &TriageEngine, kind: QuestionKind, keys: &[String]) {
    let questions = engine.catalog().questions(kind);
    for key in keys {
        if !questions.iter().any(|question| question.key == key.as_str()) {
            warn!(key = %key, kind = ?kind, "unknown question key ignored");
        }
    }
}
