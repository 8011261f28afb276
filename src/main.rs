use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use serenity::all::{Client, GatewayIntents};
use tokio::signal::ctrl_c;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use firka_autoreply::config::Args;
use firka_autoreply::handler::Handler;
use firka_autoreply::processing::{OpenRouterJudge, Pipeline, RelevanceClassifier, RemoteJudge};
use firka_autoreply::state::{JsonCounterStore, MemoryCooldown};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter())))
        .init();

    let settings = args
        .into_settings()
        .inspect_err(|e| error!(error = %e, "Invalid configuration"))?;

    let judge: Option<Arc<dyn RemoteJudge>> = match &settings.remote {
        Some(remote) => {
            info!(model = %remote.model, "AI confirmation enabled");
            let judge = OpenRouterJudge::new(&remote.api_url, &remote.api_key, &remote.model, remote.timeout)
                .context("Failed to build classifier HTTP client")?;
            Some(Arc::new(judge))
        }
        None => {
            info!("AI confirmation disabled, answering on keyword matches");
            None
        }
    };

    let counters = JsonCounterStore::load(&settings.counters_file);
    let pipeline = Pipeline::new(
        RelevanceClassifier::new(judge, settings.classifier.clone()),
        Arc::new(MemoryCooldown::new(settings.cooldown)),
        Arc::new(counters),
        settings.cooldown_policy,
    );
    info!(
        cooldown = ?settings.cooldown,
        policy = ?settings.cooldown_policy,
        link_filter = ?settings.classifier.link_filter,
        counters = %settings.counters_file.display(),
        "Pipeline ready"
    );

    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT;
    let mut client = Client::builder(&settings.discord_token, intents)
        .event_handler(Handler::new(Arc::new(pipeline)))
        .await
        .context("Failed to create Discord client")?;

    let shard_manager = Arc::clone(&client.shard_manager);
    tokio::spawn(async move {
        if let Ok(()) = ctrl_c().await {
            info!("Received Ctrl+C, shutting down");
            shard_manager.shutdown_all().await;
        }
    });

    client.start().await.context("Discord client stopped")?;
    Ok(())
}
