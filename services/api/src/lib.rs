mod cli;
mod demo;
mod infra;
mod routes;
mod server;
mod validate;

pub use cli::Outcome;
use marketplace_guard::error::AppError;

pub async fn run() -> Result<Outcome, AppError> {
    cli::run().await
}
