//! CLI administration tool for tour-redirects.
//!
//! Provides commands for issuing the admin API token, inspecting redirect
//! rules, and checking the database without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Generate a new admin token and its hash
//! cargo run --bin admin -- token generate
//!
//! # Hash an existing token
//! cargo run --bin admin -- token hash "my-admin-token"
//!
//! # List active rules (add --all to include inactive ones)
//! cargo run --bin admin -- rules list
//!
//! # Show which rule a path resolves to
//! cargo run --bin admin -- rules resolve /Summer-Tours/
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `TOKEN_SIGNING_SECRET`: required by the `token` commands
//! - `DATABASE_URL`: required by the `rules` and `db` commands
//!
//! Rules are read-only here; changes go through the admin API so the running
//! server invalidates its cache.

use tour_redirects::application::services::RedirectService;
use tour_redirects::application::services::auth_service::hash_token;
use tour_redirects::domain::entities::RedirectRule;
use tour_redirects::domain::repositories::RedirectRepository;
use tour_redirects::infrastructure::cache::RedirectCache;
use tour_redirects::infrastructure::persistence::PgRedirectRepository;
use tour_redirects::utils::path_normalizer::{decode_request_path, normalize_path};

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use clap::{Parser, Subcommand};
use colored::*;
use rand::RngCore;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

/// CLI tool for managing tour-redirects.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Issue admin API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Inspect redirect rules
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Generate a random token and print it with its hash
    Generate,

    /// Print the hash of an existing token
    Hash {
        /// Raw token value
        token: String,
    },
}

#[derive(Subcommand)]
enum RulesAction {
    /// List redirect rules
    List {
        /// Include inactive rules
        #[arg(short, long)]
        all: bool,
    },

    /// Resolve a request path the way the server does
    Resolve {
        /// Request path, e.g. /summer-tours/
        path: String,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Token { action } => handle_token_action(action)?,
        Commands::Rules { action } => handle_rules_action(action, &connect().await?).await?,
        Commands::Db { action } => handle_db_action(action, &connect().await?).await?,
    }

    Ok(())
}

async fn connect() -> Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")
}

fn handle_token_action(action: TokenAction) -> Result<()> {
    let secret =
        std::env::var("TOKEN_SIGNING_SECRET").context("TOKEN_SIGNING_SECRET must be set")?;

    match action {
        TokenAction::Generate => {
            let token = generate_token();

            println!("{}", "🔑 Admin API Token".bright_blue().bold());
            println!();
            println!("  Token:           {}", token.bright_yellow().bold());
            println!("  ADMIN_TOKEN_HASH={}", hash_token(&secret, &token).cyan());
            println!();
            println!(
                "{}",
                "⚠️  IMPORTANT: Save this token now! Only the hash goes into the server environment."
                    .red()
                    .bold()
            );
            println!();
            println!("{}", "Example:".bright_white());
            println!(
                "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/redirects",
                token.bright_yellow()
            );
        }
        TokenAction::Hash { token } => {
            // Plain output so it can be used in `$(...)`.
            println!("{}", hash_token(&secret, &token));
        }
    }

    Ok(())
}

async fn handle_rules_action(action: RulesAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgRedirectRepository::new(Arc::new(pool.clone())));

    match action {
        RulesAction::List { all } => list_rules(repo, all).await?,
        RulesAction::Resolve { path } => resolve_path(repo, &path).await?,
    }

    Ok(())
}

/// Lists redirect rules.
///
/// # Output Format
///
/// ```text
/// 📋 Redirect Rules
///
///   ID   Source                         Destination                    Kind       Hits     Status
///   ──────────────────────────────────────────────────────────────────────────────────────────────
///   1    /summer-tours                  /tours/summer                  permanent  1042     ACTIVE
/// ```
async fn list_rules(repo: Arc<PgRedirectRepository>, all: bool) -> Result<()> {
    println!("{}", "📋 Redirect Rules".bright_blue().bold());
    println!();

    let rules = if all {
        repo.list().await
    } else {
        repo.fetch_active().await
    }
    .map_err(|e| anyhow::anyhow!("Failed to load rules: {}", e))?;

    if rules.is_empty() {
        println!("{}", "  No rules found".yellow());
        return Ok(());
    }

    println!(
        "  {:<4} {:<30} {:<30} {:<10} {:<8} {}",
        "ID".bright_white().bold(),
        "Source".bright_white().bold(),
        "Destination".bright_white().bold(),
        "Kind".bright_white().bold(),
        "Hits".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(94).bright_black());

    for rule in &rules {
        print_rule_row(rule);
    }

    println!();
    println!("  Total: {}", rules.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

fn print_rule_row(rule: &RedirectRule) {
    let status = if rule.is_active {
        "ACTIVE".green()
    } else {
        "INACTIVE".red()
    };

    println!(
        "  {:<4} {:<30} {:<30} {:<10} {:<8} {}",
        rule.id.to_string().bright_black(),
        rule.source_path.cyan(),
        rule.destination_path,
        rule.kind.to_string(),
        rule.hit_count,
        status
    );
}

/// Resolves a path through a fresh [`RedirectCache`], matching exactly
/// what the server would answer once its cache is loaded.
///
/// An unreachable database is reported as an error rather than as a miss.
async fn resolve_path(repo: Arc<PgRedirectRepository>, path: &str) -> Result<()> {
    let repository: Arc<dyn RedirectRepository> = repo;
    let cache = Arc::new(RedirectCache::new(
        repository.clone(),
        Duration::from_secs(60),
    ));
    let service = RedirectService::new(repository, cache);

    println!(
        "  Path: {}  (key {})",
        path.cyan(),
        normalize_path(&decode_request_path(path)).bright_black()
    );

    let resolved = service
        .resolve(path)
        .await
        .map_err(|e| anyhow::anyhow!("Cannot resolve, database unavailable: {}", e))?;

    match resolved {
        Some(rule) => {
            println!(
                "  {} {} → {} ({})",
                "✅".green(),
                rule.id.to_string().bright_black(),
                rule.destination_path.bright_yellow(),
                rule.kind
            );
        }
        None => {
            println!("  {}", "No redirect, request falls through".yellow());
        }
    }

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let active: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM redirect_rules WHERE is_active")
                    .fetch_one(pool)
                    .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!(
                "  Active rules: {}",
                active.to_string().bright_green().bold()
            );
        }
    }

    Ok(())
}

/// Generates a cryptographically random token.
///
/// 32 random bytes, URL-safe base64 without padding (43 characters).
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
