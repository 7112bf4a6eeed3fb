use crate::chat::{run_batch, run_chat, run_check, run_reset, BatchArgs, ChatArgs, CheckArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use mortgage_assistant::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Mortgage Eligibility Assistant",
    about = "Check mortgage eligibility over HTTP, in the terminal, or in bulk",
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
    /// Talk to the assistant in the terminal; the session is resumed on the next run
    Chat(ChatArgs),
    /// Evaluate a single applicant and print the verdict as JSON
    Check(CheckArgs),
    /// Evaluate every applicant in a CSV file
    Batch(BatchArgs),
    /// Delete a saved terminal session
    Reset(ResetArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Keep sessions in memory instead of writing snapshots
    #[arg(long)]
    pub(crate) ephemeral: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ResetArgs {
    /// Session to delete
    #[arg(long, default_value = "local")]
    pub(crate) session: String,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Chat(args) => run_chat(args).await,
        Command::Check(args) => run_check(args),
        Command::Batch(args) => run_batch(args),
        Command::Reset(args) => run_reset(&args.session),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["mortgage-assistant-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_check_arguments() {
        let cli = Cli::try_parse_from([
            "mortgage-assistant-api",
            "check",
            "--income",
            "50000",
            "--credit-score",
            "700",
            "--loan-amount",
            "200000",
            "--property-value",
            "300000",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Check(args)) => {
                assert_eq!(args.income, 50_000.0);
                assert_eq!(args.credit_score, 700);
            }
            other => panic!("expected check command, got {other:?}"),
        }
    }

    #[test]
    fn check_rejects_nan_and_negative_amounts() {
        let nan = Cli::try_parse_from([
            "mortgage-assistant-api",
            "check",
            "--income",
            "NaN",
            "--credit-score",
            "700",
            "--loan-amount",
            "200000",
            "--property-value",
            "300000",
        ]);
        assert!(nan.is_err());

        let negative = Cli::try_parse_from([
            "mortgage-assistant-api",
            "check",
            "--income",
            "50000",
            "--credit-score",
            "700",
            "--loan-amount=-1",
            "--property-value",
            "300000",
        ]);
        assert!(negative.is_err());
    }

    #[test]
    fn chat_session_defaults_to_local() {
        let cli = Cli::try_parse_from(["mortgage-assistant-api", "chat"]).expect("parses");
        match cli.command {
            Some(Command::Chat(args)) => assert_eq!(args.session, "local"),
            other => panic!("expected chat command, got {other:?}"),
        }
    }
}
