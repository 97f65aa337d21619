//! CLI administration tool for link-shortener.
//!
//! Operates directly on the storage backend selected by the environment,
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List all links
//! cargo run --bin admin -- list
//!
//! # Show one link
//! cargo run --bin admin -- show 63
//!
//! # Create a link (short id derived from the URL unless given)
//! cargo run --bin admin -- create http://example.com --hash-id promo
//!
//! # Delete a link
//! cargo run --bin admin -- delete 63
//!
//! # Print the short id a URL would get
//! cargo run --bin admin -- hash http://example.com
//!
//! # Check the storage backend
//! cargo run --bin admin -- check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `STORAGE_BACKEND`, `DATA_DIR`, `REDIS_URL`, ...

use link_shortener::application::services::LinkService;
use link_shortener::config::{self, StorageBackend};
use link_shortener::domain::entities::Link;
use link_shortener::domain::repositories::LinkRepository;
use link_shortener::infrastructure::persistence::build_repository;
use link_shortener::utils::code_generator::shorten;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;

/// CLI tool for managing link-shortener storage.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all links
    List,

    /// Show a single link without counting a view
    Show {
        /// Short id of the link
        hash_id: String,
    },

    /// Create a link
    Create {
        /// Destination URL
        url: String,

        /// Custom short id (derived from the URL if omitted)
        #[arg(long)]
        hash_id: Option<String>,
    },

    /// Delete a link
    Delete {
        /// Short id of the link
        hash_id: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Print the short id generated for an input
    Hash {
        /// Input string, usually a URL
        input: String,
    },

    /// Check that the storage backend is reachable
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Commands::Hash { input } = &cli.command {
        println!("{}", shorten(input));
        return Ok(());
    }

    let config = config::load_from_env()?;
    if config.storage_backend == StorageBackend::Memory {
        println!(
            "{}",
            "⚠️  STORAGE_BACKEND is 'memory': changes are lost when this command exits".yellow()
        );
        println!();
    }

    let repository = build_repository(&config)
        .await
        .with_context(|| format!("Failed to open {} storage", config.storage_backend))?;
    let service = LinkService::new(repository);

    match cli.command {
        Commands::List => list_links(&service).await?,
        Commands::Show { hash_id } => show_link(&service, &hash_id).await?,
        Commands::Create { url, hash_id } => {
            create_link(&service, &config.base_url, url, hash_id).await?
        }
        Commands::Delete { hash_id, yes } => delete_link(&service, &hash_id, yes).await?,
        Commands::Check => check_storage(&service, config.storage_backend).await?,
        Commands::Hash { input } => println!("{}", shorten(&input)),
    }

    Ok(())
}

/// Lists every link as a table.
///
/// # Output Format
///
/// ```text
/// 📋 Links
///
///   Short id         Views    Created              URL
///   ───────────────────────────────────────────────────────────────────────────
///   63               4        2024-01-15 10:30     http://example.com
/// ```
async fn list_links(service: &LinkService<dyn LinkRepository>) -> Result<()> {
    println!("{}", "📋 Links".bright_blue().bold());
    println!();

    let links = service
        .list_links()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<16} {:<8} {:<20} {}",
        "Short id".bright_white().bold(),
        "Views".bright_white().bold(),
        "Created".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<16} {:<8} {:<20} {}",
            link.hash_id.cyan(),
            link.views,
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.url
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

fn print_link(link: &Link) {
    println!("  Short id: {}", link.hash_id.cyan());
    println!("  URL:      {}", link.url);
    println!("  Created:  {}", link.created_at.to_rfc3339().bright_black());
    println!("  Views:    {}", link.views.to_string().bright_white().bold());
}

async fn show_link(service: &LinkService<dyn LinkRepository>, hash_id: &str) -> Result<()> {
    let link = service
        .get_link(hash_id)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("{}", "🔗 Link".bright_blue().bold());
    println!();
    print_link(&link);
    println!();

    Ok(())
}

async fn create_link(
    service: &LinkService<dyn LinkRepository>,
    base_url: &str,
    url: String,
    hash_id: Option<String>,
) -> Result<()> {
    let link = service
        .create_link(url, hash_id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

    println!("{}", "✅ Link created".green().bold());
    println!();
    print_link(&link);
    println!(
        "  Short:    {}",
        service.short_url(base_url, &link.hash_id).bright_yellow()
    );
    println!();

    Ok(())
}

/// Deletes a link after confirmation (default: No).
async fn delete_link(
    service: &LinkService<dyn LinkRepository>,
    hash_id: &str,
    skip_confirm: bool,
) -> Result<()> {
    let link = service
        .get_link(hash_id)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("{}", "🗑  Delete Link".bright_blue().bold());
    println!();
    print_link(&link);
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .delete_link(hash_id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    println!("{}", "✅ Link deleted".green().bold());
    Ok(())
}

async fn check_storage(
    service: &LinkService<dyn LinkRepository>,
    backend: StorageBackend,
) -> Result<()> {
    if service.storage_healthy().await {
        println!("{} {} backend reachable", "✅".green(), backend);
        Ok(())
    } else {
        anyhow::bail!("{} backend unreachable", backend)
    }
}
