use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use twochat_checker::client::{ChatApi, TwoChatClient};
use twochat_checker::config::{Config, DEFAULT_MAX_PAGES};
use twochat_checker::export::{sanitize_stem, write_export};
use twochat_checker::history::fetch_all_messages;
use twochat_checker::models::{is_valid_phone_number, Group, GroupFetch};
use twochat_checker::search::{search_number, search_numbers};
use twochat_checker::server::{serve, AppState};

#[derive(Parser)]
#[command(name = "twochat-checker", version)]
#[command(about = "Check WhatsApp groups and chat history through the 2Chat API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve,
    /// List WhatsApp groups for a phone number
    Groups { phone_number: String },
    /// Fetch the full message history for one group
    History {
        group_uuid: String,
        #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
        max_pages: u32,
        /// Save the result as JSON under the export directory
        #[arg(long)]
        export: bool,
    },
    /// Search one number's groups by title and fetch matching histories
    Search {
        phone_number: String,
        group_title: String,
        #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
        max_pages: u32,
        #[arg(long)]
        export: bool,
    },
    /// Search every configured number, optionally filtered by group title
    SearchAll {
        #[arg(long)]
        title: Option<String>,
        #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
        max_pages: u32,
        #[arg(long)]
        export: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let client = TwoChatClient::new(&config.base_url, &config.api_key);

    match cli.command {
        Commands::Serve => {
            let state = Arc::new(AppState {
                api: Arc::new(client),
                config,
            });
            serve(state).await?;
        }
        Commands::Groups { phone_number } => {
            check_phone(&phone_number)?;
            let groups = client.list_groups(&phone_number).await?;
            print_groups(&phone_number, &groups);
        }
        Commands::History {
            group_uuid,
            max_pages,
            export,
        } => {
            let messages = fetch_all_messages(&client, &group_uuid, max_pages).await?;
            println!("Found {} message(s) for group {}", messages.len(), group_uuid);

            if export {
                let payload = json!({
                    "groupUuid": group_uuid,
                    "messagesCount": messages.len(),
                    "messages": messages,
                });
                let stem = format!("chat-history-{group_uuid}");
                let info = write_export(&config.export_dir, &stem, &payload)?;
                println!("Chat history exported to {}", info.path.display());
            }
        }
        Commands::Search {
            phone_number,
            group_title,
            max_pages,
            export,
        } => {
            check_phone(&phone_number)?;
            let outcome = search_number(&client, &phone_number, &group_title, max_pages).await?;

            if outcome.matching_groups_count == 0 {
                println!("No groups found matching '{group_title}'");
                return Ok(());
            }
            println!(
                "{} matching group(s) for '{}':",
                outcome.matching_groups_count, group_title
            );
            print_results(&outcome.results);

            if export {
                let stem = format!("search-results-{}", sanitize_stem(&group_title));
                let info = write_export(&config.export_dir, &stem, &outcome)?;
                println!("Results exported to {}", info.path.display());
            }
        }
        Commands::SearchAll {
            title,
            max_pages,
            export,
        } => {
            let report = search_numbers(
                &client,
                &config.search_numbers,
                title.as_deref(),
                max_pages,
            )
            .await;

            println!(
                "Searched {} number(s): {} group result(s), {} number(s) failed",
                report.numbers_searched,
                report.results.len(),
                report.errors.len()
            );
            print_results(&report.results);
            for error in &report.errors {
                println!("  {} failed: {}", error.phone_number, error.error);
            }

            if export {
                let stem = format!(
                    "search-all-numbers-{}",
                    sanitize_stem(title.as_deref().unwrap_or("all-groups"))
                );
                let info = write_export(&config.export_dir, &stem, &report)?;
                println!("Results exported to {}", info.path.display());
            }
        }
    }

    Ok(())
}

fn check_phone(phone_number: &str) -> Result<()> {
    if !is_valid_phone_number(phone_number) {
        bail!("Invalid phone number format. Use international format (e.g., +1234567890)");
    }
    Ok(())
}

fn print_groups(phone_number: &str, groups: &[Group]) {
    if groups.is_empty() {
        println!("No groups found for {phone_number}");
        return;
    }
    println!("Found {} group(s) for {}:", groups.len(), phone_number);
    for (index, group) in groups.iter().enumerate() {
        println!(
            "{}. {}",
            index + 1,
            group.name.as_deref().unwrap_or("Unnamed Group")
        );
        println!("   UUID: {}", group.uuid);
        println!("   Subject: {}", group.subject.as_deref().unwrap_or("No subject"));
        println!("   Size: {} participants", group.size);
        if let Some(created_at) = &group.created_at {
            println!("   Created: {created_at}");
        }
    }
}

fn print_results(results: &[GroupFetch]) {
    for result in results {
        let name = result.group().name.as_deref().unwrap_or("Unnamed Group");
        match result {
            GroupFetch::Success(history) => {
                println!("  {} ({}): {} message(s)", name, history.group.uuid, history.messages_count);
            }
            GroupFetch::Failure(failure) => {
                println!(
                    "  {} ({}): failed [{}] {}",
                    name, failure.group.uuid, failure.error_type, failure.error
                );
            }
        }
    }
}
