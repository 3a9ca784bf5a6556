use std::process::ExitCode;

use clap::Parser;
use fxdash_web::{logging, router, AppState, Cli, WebError};
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), WebError> {
    logging::init(cli.log_format)?;

    let state = AppState::from_cli(&cli)?;
    let listener = tokio::net::TcpListener::bind(cli.bind).await?;
    info!(address = %listener.local_addr()?, "dashboard listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
