mod api;
mod cli;
mod database;
mod services;

use cli::cli;
use services::shared::{
    env::{check_for_env_variables, Settings},
    logger::init_logger,
};

async fn run_fxbox() -> anyhow::Result<()> {
    init_logger();
    let settings = Settings::from_env()?;
    check_for_env_variables(&settings);
    cli(settings).await?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    run_fxbox().await?;
    Ok(())
}
