use crate::commands::{coach_api, open_store};
use crate::config::Config;
use crate::error::Result;
use crate::offline::{CoachApi, Connectivity, OfflineEngine, ResponseSource};
use crate::storage::LocalStore;
use colored::Colorize;
use std::sync::Arc;

/// Build an offline engine over the configured API and local store
///
/// Connectivity starts from a health probe unless `force_offline` is set.
pub async fn build_engine(config: &Config, force_offline: bool) -> Result<OfflineEngine> {
    let store: Arc<dyn LocalStore> = Arc::new(open_store(config)?);
    let api = Arc::new(coach_api(config)?);

    let online = if force_offline {
        false
    } else {
        api.health().await
    };
    tracing::info!(online, "Connectivity determined");

    Ok(OfflineEngine::open(
        api,
        store,
        Arc::new(Connectivity::new(online)),
        config.client.language,
        config.client.cache_ttl_days,
    ))
}

/// Ask one question and print the answer
///
/// Continues the latest stored session unless `chat` names one or `new`
/// is set.
pub async fn run_ask(
    config: Config,
    query: String,
    offline: bool,
    chat: Option<u64>,
    new: bool,
) -> Result<()> {
    let engine = build_engine(&config, offline).await?;

    match (chat, new) {
        (Some(id), _) => engine.resume_chat(id).await?,
        (None, true) => engine.new_chat().await,
        (None, false) => {
            if let Some(id) = engine.resume_latest().await? {
                tracing::debug!("Continuing chat session {}", id);
            }
        }
    }

    let outcome = engine.handle_query(&query).await?;

    let tag = match outcome.source {
        ResponseSource::Network => outcome.source.as_str().green(),
        ResponseSource::Cache => outcome.source.as_str().cyan(),
        ResponseSource::Queued => outcome.source.as_str().yellow(),
        ResponseSource::NetworkError => outcome.source.as_str().red(),
    };
    println!("{} [{}]", config.client.language.colored_tag(), tag);
    println!();
    println!("{}", outcome.response);
    println!();

    if let Some(id) = engine.active_chat_id().await {
        println!("{}", format!("Chat session {}", id).dimmed());
    }
    if outcome.source == ResponseSource::Queued {
        println!(
            "Run {} when you are back online.",
            "saathi pending sync".cyan()
        );
    }

    Ok(())
}
