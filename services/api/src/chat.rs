use clap::Args;
use mortgage_assistant::config::AppConfig;
use mortgage_assistant::error::AppError;
use mortgage_assistant::telemetry;
use mortgage_assistant::workflows::mortgage::{
    check_amount, evaluate_csv_path, ChatServiceError, EligibilityEvaluator, GroqResponder,
    JsonFileSessionRepository, MortgageChatService, ProfileField, SessionId, SessionRepository,
    Speaker, TranscriptEntry,
};
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

#[derive(Args, Debug)]
pub(crate) struct ChatArgs {
    /// Session name; its snapshot lives in MORTGAGE_SNAPSHOT_DIR
    #[arg(long, default_value = "local")]
    pub(crate) session: String,
}

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Monthly income
    #[arg(long, value_parser = amount_arg)]
    pub(crate) income: f64,
    /// Credit score
    #[arg(long)]
    pub(crate) credit_score: u32,
    /// Requested loan amount
    #[arg(long, value_parser = amount_arg)]
    pub(crate) loan_amount: f64,
    /// Value of the property
    #[arg(long, value_parser = amount_arg)]
    pub(crate) property_value: f64,
}

fn amount_arg(raw: &str) -> Result<f64, String> {
    let value = raw.trim().parse::<f64>().map_err(|err| err.to_string())?;
    check_amount(ProfileField::Income, value)
        .map_err(|err| format!("{} is not a finite, non-negative amount", err.value))
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV with income,credit_score,loan_amount,property_value columns
    pub(crate) csv: PathBuf,
}

pub(crate) async fn run_chat(args: ChatArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let id = SessionId::parse(&args.session)?;
    let repository = Arc::new(JsonFileSessionRepository::new(
        config.sessions.snapshot_dir.clone(),
    ));
    let responder = Arc::new(GroqResponder::from_config(&config.responder)?);
    let service = MortgageChatService::new(
        repository,
        responder,
        EligibilityEvaluator::new(config.policy.clone()),
    );

    let session = service.open(&id)?;
    if session.transcript.is_empty() {
        println!("{}", assistant_line(service.greeting()));
    } else {
        for entry in &session.transcript {
            println!("{}", render_entry(entry));
        }
    }
    println!("(type 'reset' to start over, 'quit' to leave)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("you> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text.eq_ignore_ascii_case("quit") || text.eq_ignore_ascii_case("exit") {
            break;
        }
        if text.eq_ignore_ascii_case("reset") {
            service.reset(&id)?;
            println!("{}", assistant_line(service.greeting()));
            continue;
        }

        match service.reply(&id, text).await {
            Ok(turn) => println!("{}", assistant_line(&turn.turn.reply)),
            Err(ChatServiceError::ResponderUnavailable(err)) => {
                warn!(error = %err, "free-text reply failed");
                println!("! {err}");
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let evaluator = EligibilityEvaluator::new(config.policy);
    let verdict = evaluator.evaluate_values(
        args.income,
        args.credit_score,
        args.loan_amount,
        args.property_value,
    )?;
    println!("{}", serde_json::to_string_pretty(&verdict)?);
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let evaluator = EligibilityEvaluator::new(config.policy);
    let report = evaluate_csv_path(&args.csv, &evaluator)?;

    for row in &report.rows {
        println!("{}", serde_json::to_string(row)?);
    }
    println!(
        "{}",
        json!({
            "rows": report.rows.len(),
            "eligible": report.eligible,
            "ineligible": report.ineligible,
        })
    );
    Ok(())
}

pub(crate) fn run_reset(session: &str) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let id = SessionId::parse(session)?;
    JsonFileSessionRepository::new(config.sessions.snapshot_dir).delete(&id)?;
    println!("session '{id}' cleared");
    Ok(())
}

fn assistant_line(text: &str) -> String {
    format!("assistant> {text}")
}

fn render_entry(entry: &TranscriptEntry) -> String {
    match entry.speaker {
        Speaker::Assistant => assistant_line(&entry.content),
        Speaker::User => format!("you> {}", entry.content),
    }
}
