mod app;
mod config;
mod error;

use std::process::ExitCode;

use crate::error::Result;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let (config, command) = config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "isay={level},isay_sync={level}",
            level = config.log_level
        ))
        .with_writer(std::io::stderr)
        .init();

    let mut app = app::App::new(&config)?;
    if let Err(err) = app.run(command).await {
        tracing::debug!("command failed: {err}");
        eprintln!("{}", app::message_for_error(&err));
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
