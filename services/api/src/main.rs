use marketplace_guard_api::{run, Outcome};

#[tokio::main]
async fn main() {
    match run().await {
        Ok(Outcome::Completed) => {}
        Ok(Outcome::Rejected) => std::process::exit(2),
        Err(err) => {
            eprintln!("application error: {err}");
            std::process::exit(1);
        }
    }
}
