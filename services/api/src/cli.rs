use crate::demo::{run_demo, DemoArgs};
use crate::server;
use crate::validate::{run_validate, ValidateArgs};
use clap::{Args, Parser, Subcommand};
use marketplace_guard::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Marketplace Guard",
    about = "Validate and sanitize marketplace form submissions from the command line or over HTTP",
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
    /// Validate a single JSON record read from a file or stdin
    Validate(ValidateArgs),
    /// Walk through representative submissions for each entity kind
    Demo(DemoArgs),
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

/// How a command finished when it did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// The command ran but the submitted record did not pass validation.
    Rejected,
}

pub(crate) async fn run() -> Result<Outcome, AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await.map(|()| Outcome::Completed),
        Command::Validate(args) => run_validate(args),
        Command::Demo(args) => run_demo(args).map(|()| Outcome::Completed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_entity_and_file() {
        let cli = Cli::try_parse_from([
            "marketplace-guard",
            "validate",
            "--entity",
            "job",
            "--file",
            "listing.json",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Validate(args)) => {
                assert_eq!(args.entity, "job");
                assert_eq!(
                    args.file.as_deref(),
                    Some(std::path::Path::new("listing.json"))
                );
            }
            other => panic!("expected validate command, got {other:?}"),
        }
    }

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::try_parse_from(["marketplace-guard"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
