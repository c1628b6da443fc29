use anyhow::Context;
use tracing::{info, warn};

use volley_client::{
    application::models::common::PageQuery,
    application::models::team::TeamFilter,
    config::Config,
    utils::logger::setup_logger,
    VolleyClient,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logger();

    // Reads VOLLEY_API_BASE_URL, VOLLEY_API_TIMEOUT and VOLLEY_SESSION_FILE
    let config = Config::new();
    info!("Configuration loaded: {}", config);

    let client = VolleyClient::from_config(&config)
        .await
        .context("failed to open the session file")?;

    if !client.auth().is_authenticated().await? {
        let email = std::env::var("VOLLEY_EMAIL").context("VOLLEY_EMAIL is not set")?;
        let password = std::env::var("VOLLEY_PASSWORD").context("VOLLEY_PASSWORD is not set")?;
        let user = client.auth().login(&email, &password).await?;
        info!("Logged in as {}", user.full_name());
    }

    let filter = TeamFilter {
        page: PageQuery::page(1, 20),
        ..TeamFilter::default()
    };
    let teams = client.teams().list(&filter).await?;
    if teams.is_empty() {
        warn!("No teams found");
    }
    for team in &teams.data {
        let roster = client.teams().athletes(team.id).await?;
        info!("{} ({} athletes)", team.name, roster.len());
    }

    let unread = client.notifications().unread_count().await?;
    info!("Unread notifications: {}", unread);
    Ok(())
}
