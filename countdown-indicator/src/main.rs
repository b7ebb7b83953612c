use clap::Parser;
use countdown_indicator::{Cli, run};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), countdown_indicator::AppError> {
    run(Cli::parse()).await
}
