use std::process::ExitCode;

use log::{debug, error, info, warn};

use mailtriage::config;
use mailtriage::logging::{self, LogFormat};
use mailtriage::{
    load_rules_or_empty, BatchRunner, Database, GmailClient, MessageSync, Result, RuleEngine,
    SessionManager, Settings,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Loaded before logging so the env file can choose the log format.
    let dotenv = config::load_dotenv();

    if let Err(e) = logging::init(LogFormat::from_env()) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match dotenv {
        Ok(Some(path)) => debug!("Loaded environment from {}", path.display()),
        Ok(None) => {}
        Err(e) => warn!("{}", e),
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let settings = Settings::from_env()?;

    let engine = RuleEngine::from(load_rules_or_empty(&settings.rules_path));
    if engine.is_empty() {
        info!("No rules to apply, exiting");
        return Ok(());
    }

    let db = Database::open(&settings.database_path)?;

    let session = SessionManager::new(&db, &settings.user_email, settings.client_secret)?;
    let access_token = session.access_token().await?;
    let client = GmailClient::with_base_url(access_token, settings.api_base)?;

    if settings.fetch > 0 {
        MessageSync::new(&client, &db).run(settings.fetch).await?;
    }

    BatchRunner::new(&engine, &db, &client)
        .run(settings.limit)
        .await?;
    Ok(())
}
