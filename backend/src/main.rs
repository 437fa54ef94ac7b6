use anyhow::Context;
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

use noteapp::config::Settings;

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("noteapp=info,rocket=warn")),
        )
        .init();

    let settings = Settings::from_env()?;
    let pool = noteapp::db::connect(&settings)
        .await
        .context("Failed to connect to database")?;

    let _rocket = noteapp::rocket(pool).launch().await?;

    Ok(())
}
