use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use opencred::config::AppConfig;
use opencred::error::AppError;
use opencred::lending::HttpLoanBackend;
use opencred::telemetry;

use crate::commands::{apply, assistant, chat, letter, manager, register, tracking};

#[derive(Parser, Debug)]
#[command(
    name = "opencred",
    about = "Apply for, track and review OpenCred loans from the command line",
    version
)]
struct Cli {
    /// Override OPENCRED_API_URL for this run
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Override OPENCRED_POLL_INTERVAL_MS for this run
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    poll_interval_ms: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check sign-up details; passwords are read from stdin
    Register(RegisterArgs),
    /// Fill in the application form, submit it and follow the decision
    Apply(ApplyArgs),
    /// Fetch the current status of a loan once
    Status(LoanArgs),
    /// Poll a loan until a decision with an explanation arrives
    Track(LoanArgs),
    /// Talk to the AI intake assistant; saves a session for `apply --session`
    Assistant(AssistantArgs),
    /// Chat with the manager reviewing a loan
    Chat(ChatArgs),
    /// Review the pending-approval queue
    Manager {
        #[command(subcommand)]
        command: ManagerCommand,
    },
    /// Print the sanction letter of an approved loan
    Letter(LetterArgs),
}

#[derive(Subcommand, Debug)]
pub(crate) enum ManagerCommand {
    /// List loans awaiting a decision
    Pending(PendingArgs),
    /// Approve a pending loan
    Approve(ApproveArgs),
    /// Reject a pending loan
    Reject(RejectArgs),
}

#[derive(Args, Debug)]
pub(crate) struct RegisterArgs {
    #[arg(long)]
    pub(crate) name: Option<String>,
    #[arg(long)]
    pub(crate) email: Option<String>,
    #[arg(long)]
    pub(crate) phone: Option<String>,
    #[arg(long)]
    pub(crate) pan: Option<String>,
    /// Accept the Terms & Conditions
    #[arg(long)]
    pub(crate) agree_terms: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ApplyArgs {
    /// Seed the form from a session saved by `opencred assistant`
    #[arg(long)]
    pub(crate) session: Option<PathBuf>,
    #[arg(long)]
    pub(crate) name: Option<String>,
    #[arg(long)]
    pub(crate) email: Option<String>,
    #[arg(long)]
    pub(crate) phone: Option<String>,
    /// PAN number, e.g. ABCDE1234F
    #[arg(long)]
    pub(crate) pan: Option<String>,
    #[arg(long)]
    pub(crate) address: Option<String>,
    /// Salaried, Self-Employed, Business Owner, ...
    #[arg(long)]
    pub(crate) employment_type: Option<String>,
    /// Monthly income in rupees
    #[arg(long)]
    pub(crate) income: Option<String>,
    /// Requested amount in rupees
    #[arg(long)]
    pub(crate) amount: Option<String>,
    #[arg(long)]
    pub(crate) purpose: Option<String>,
    /// e.g. "24 Months" or 24
    #[arg(long)]
    pub(crate) tenure: Option<String>,
    /// Accept the Terms & Conditions
    #[arg(long)]
    pub(crate) agree_terms: bool,
    /// PAN card scan (JPG, PNG or PDF, up to 5MB)
    #[arg(long)]
    pub(crate) pan_doc: Option<PathBuf>,
    /// Aadhaar card scan (JPG, PNG or PDF, up to 5MB)
    #[arg(long)]
    pub(crate) aadhaar_doc: Option<PathBuf>,
    #[arg(long)]
    pub(crate) bank_statement: Option<PathBuf>,
    #[arg(long)]
    pub(crate) salary_slips: Option<PathBuf>,
    /// Submit and exit without waiting for a decision
    #[arg(long)]
    pub(crate) no_track: bool,
}

#[derive(Args, Debug)]
pub(crate) struct LoanArgs {
    pub(crate) loan_id: String,
}

#[derive(Args, Debug)]
pub(crate) struct AssistantArgs {
    /// Where to save the hand-off session
    #[arg(long, default_value = "opencred-session.json")]
    pub(crate) session_out: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct ChatArgs {
    pub(crate) loan_id: String,
    /// Name the manager greets you with
    #[arg(long, default_value = "there")]
    pub(crate) name: String,
}

#[derive(Args, Debug)]
pub(crate) struct PendingArgs {
    /// Also write the queue to this CSV file
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ApproveArgs {
    pub(crate) loan_id: String,
    #[arg(long)]
    pub(crate) comments: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct RejectArgs {
    pub(crate) loan_id: String,
    /// Reason shown to the applicant (required)
    #[arg(long)]
    pub(crate) reason: String,
}

#[derive(Args, Debug)]
pub(crate) struct LetterArgs {
    pub(crate) loan_id: String,
    /// Approval date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
}

/// Resolved configuration plus the backend every command talks to.
pub(crate) struct Context {
    pub(crate) config: AppConfig,
    pub(crate) backend: Arc<HttpLoanBackend>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(url) = cli.api_url.as_deref() {
        config.backend.set_base_url(url)?;
    }
    if let Some(interval_ms) = cli.poll_interval_ms {
        config.polling.interval = Duration::from_millis(interval_ms);
    }
    telemetry::init(&config.telemetry, config.environment)?;

    let backend = Arc::new(HttpLoanBackend::from_config(&config.backend)?);
    tracing::debug!(api = %backend.base_url(), "using loan service");
    let context = Context { config, backend };

    match cli.command {
        Command::Register(args) => register::run(args).await,
        Command::Apply(args) => apply::run(&context, args).await,
        Command::Status(args) => tracking::status(&context, args).await,
        Command::Track(args) => tracking::track(&context, args).await,
        Command::Assistant(args) => assistant::run(&context, args).await,
        Command::Chat(args) => chat::run(&context, args).await,
        Command::Manager { command } => manager::run(&context, command).await,
        Command::Letter(args) => letter::run(&context, args).await,
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|err| format!("invalid date '{raw}': {err}"))
}
