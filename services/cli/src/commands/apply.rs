use std::path::{Path, PathBuf};

use chrono::Utc;
use opencred::error::{AppError, SessionUnavailable};
use opencred::lending::assistant::ApplicationSession;
use opencred::lending::intake::{ApplicationForm, DocumentSlot, FormStep, UploadedDocument};
use opencred::lending::tracking::StatusPoller;
use tracing::info;

use super::tracking;
use crate::cli::{ApplyArgs, Context};

pub(crate) async fn run(context: &Context, args: ApplyArgs) -> Result<(), AppError> {
    let mut form = match args.session.as_deref() {
        Some(path) => form_from_session(path).await?,
        None => ApplicationForm::default(),
    };
    fill(&mut form, &args);

    if form.step() == FormStep::PersonalInfo {
        form.advance()?;
    }
    for (slot, path) in documents(&args) {
        form.attach(slot, UploadedDocument::from_path(path)?);
    }
    let application = form.to_application()?;

    let mut poller = StatusPoller::new(context.backend.clone(), context.config.polling.policy());
    let loan_id = poller.submit(application).await?;
    println!("Application submitted. Loan ID: {loan_id}");

    if args.no_track {
        println!("Follow it with `opencred track {loan_id}`.");
        return Ok(());
    }
    tracking::follow(poller).await
}

/// Load a saved assistant session and consume it. The cleared session is written back
/// so the same file cannot seed a second application.
async fn form_from_session(path: &Path) -> Result<ApplicationForm, AppError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let mut session: ApplicationSession = serde_json::from_str(&raw)?;

    let unavailable = SessionUnavailable::of(&session);
    let fields = session.take_fields(Utc::now());
    tokio::fs::write(path, serde_json::to_vec_pretty(&session)?).await?;

    let fields = fields.ok_or(unavailable)?;
    info!(fields = fields.len(), "form seeded from assistant session");
    Ok(ApplicationForm::from_collected(&fields))
}

fn fill(form: &mut ApplicationForm, args: &ApplyArgs) {
    let overrides = [
        (&mut form.full_name, &args.name),
        (&mut form.email, &args.email),
        (&mut form.phone, &args.phone),
        (&mut form.pan, &args.pan),
        (&mut form.address, &args.address),
        (&mut form.employment_type, &args.employment_type),
        (&mut form.income, &args.income),
        (&mut form.amount, &args.amount),
        (&mut form.purpose, &args.purpose),
        (&mut form.tenure, &args.tenure),
    ];
    for (field, value) in overrides {
        if let Some(value) = value {
            *field = value.clone();
        }
    }
    form.agree_to_terms |= args.agree_terms;
}

fn documents(args: &ApplyArgs) -> Vec<(DocumentSlot, &PathBuf)> {
    [
        (DocumentSlot::Pan, &args.pan_doc),
        (DocumentSlot::Aadhaar, &args.aadhaar_doc),
        (DocumentSlot::BankStatement, &args.bank_statement),
        (DocumentSlot::SalarySlips, &args.salary_slips),
    ]
    .into_iter()
    .filter_map(|(slot, path)| path.as_ref().map(|path| (slot, path)))
    .collect()
}
