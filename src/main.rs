mod bridge;
mod classify;
mod engine;
mod notify;
mod score;

use bridge::StdioRegistry;
use clap::{Parser, Subcommand};
use engine::Engine;
use notify::StdioNotifier;
use std::sync::Arc;
use tabwarden_core::{config, traits::Notifier};
use tabwarden_store::{NotificationLog, Store};

#[derive(Parser)]
#[command(
    name = "tabwarden",
    version,
    about = "Tabwarden — browser tab reminder daemon"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "tabwarden.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the reminder daemon on stdio.
    Start,
    /// Show store stats, armed reminders, and recent notifications.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cfg.warden.log_level.clone())),
        )
        // The bridge protocol owns stdout; keep logs on stderr.
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start => {
            if !cfg.scheduler.enabled {
                anyhow::bail!("scheduler is disabled in {}", cli.config);
            }

            let store = Store::new(&cfg.store).await?;
            let notifier = build_notifier(&cfg)?;
            let registry = Arc::new(StdioRegistry::new());

            let engine = Engine::new(store, notifier, &cfg.scheduler);
            engine.run(registry).await?;
        }
        Commands::Status => {
            let store = Store::new(&cfg.store).await?;

            println!("Tabwarden — Status\n");
            println!("Config: {}", cli.config);
            println!("Database: {}", config::shellexpand(&cfg.store.db_path));
            println!("Database size: {} bytes", store.db_size().await?);

            let interval = store.interval().await?;
            if interval > 0 {
                println!("Global interval: {}", score::format_time_left(interval));
            } else {
                println!("Global interval: off");
            }
            println!();

            let now = chrono::Utc::now().timestamp_millis();
            let armed = store.armed_reminders().await?;
            if armed.is_empty() {
                println!("No armed reminders.");
            } else {
                // Order like the popup: most important and most neglected first.
                let mut rows = Vec::with_capacity(armed.len());
                for entry in armed {
                    let activity = store.activity(entry.tab_id).await?.unwrap_or_default();
                    let tab = store.tab(entry.tab_id).await?.unwrap_or_default();
                    let category = classify::classify(&tab.url, &tab.title);
                    let importance = score::importance_score(category, &activity, now);
                    let idle = score::idle_score(activity.last_active, now);
                    let rank = score::combined_score(importance, idle);
                    rows.push((rank, category, entry, activity));
                }
                rows.sort_by(|a, b| b.0.total_cmp(&a.0));

                println!("Armed reminders:");
                for (rank, category, entry, activity) in rows {
                    let left = entry
                        .end_time
                        .map(|end| score::format_time_left(end - now))
                        .unwrap_or_else(|| "?".to_string());
                    let recurring = if entry.recurring { " (recurring)" } else { "" };
                    println!(
                        "  tab {} [{}]: due in {left}, last active {}, score {rank:.2}{recurring}",
                        entry.tab_id,
                        category.as_str(),
                        score::format_last_active(activity.last_active, now),
                    );
                }
            }
            println!();

            let log = NotificationLog::new(store.pool().clone());
            let recent = log.recent(10).await?;
            if recent.is_empty() {
                println!("No notifications fired yet.");
            } else {
                println!("Recent notifications:");
                for (fired_at, tab_id, title, category, message) in recent {
                    let label = if title.is_empty() { "(untitled)" } else { &title };
                    println!("  {fired_at}  tab {tab_id} [{category}] {label}: {message}");
                }
            }
        }
    }

    Ok(())
}

/// Build the configured notification backend.
fn build_notifier(cfg: &config::Config) -> anyhow::Result<Arc<dyn Notifier>> {
    match cfg.notifier.kind.as_str() {
        "stdio" => Ok(Arc::new(StdioNotifier::new())),
        other => anyhow::bail!("unsupported notifier: {other}"),
    }
}
