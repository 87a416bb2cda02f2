//! CLI administration tool for user-directory.
//!
//! Provides commands for managing users, access tokens and cached entries
//! without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # Create a user, generating a password
//! cargo run --bin admin -- user create --generate-password
//!
//! # List all users
//! cargo run --bin admin -- user list
//!
//! # Delete a user by id or email
//! cargo run --bin admin -- user delete ana@example.com
//!
//! # List tokens of one user
//! cargo run --bin admin -- token list --user 1
//!
//! # Revoke a token
//! cargo run --bin admin -- token revoke 12
//!
//! # Drop cached entries of a user
//! cargo run --bin admin -- cache flush-user 1
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server (see `user_directory::config`). User changes made here go
//! through the caching repository, so the server never serves stale entries
//! as long as both share the Redis instance and key prefix.

use user_directory::application::services::UserService;
use user_directory::config::{self, Config};
use user_directory::domain::entities::User;
use user_directory::domain::repositories::{TokenRepository, UserRepository};
use user_directory::infrastructure::cache::{CacheService, CachingUserRepository, keys};
use user_directory::infrastructure::persistence::{PgTokenRepository, PgUserRepository};
use user_directory::server::{connect_cache, connect_database};
use user_directory::state::DynUserService;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing user-directory.
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
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage access tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Cache maintenance
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// User management subcommands.
#[derive(Subcommand)]
enum UserAction {
    /// List all users
    List,

    /// Create a user
    Create {
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        /// Generate a random password instead of prompting for one
        #[arg(short = 'g', long)]
        generate_password: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Delete a user
    Delete {
        /// User ID or email
        id_or_email: String,
    },
}

/// Token management subcommands.
#[derive(Subcommand)]
enum TokenAction {
    /// List tokens
    List {
        /// Only tokens of this user
        #[arg(short, long)]
        user: Option<i64>,
    },

    /// Revoke a token
    Revoke {
        /// Token ID
        id: i64,
    },
}

/// Cache subcommands.
#[derive(Subcommand)]
enum CacheAction {
    /// Drop every cached entry derived from a user
    FlushUser {
        /// User ID
        id: i64,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

/// Connections shared by all commands.
struct Admin {
    pool: PgPool,
    pg_users: Arc<PgUserRepository>,
    users: Arc<CachingUserRepository<PgUserRepository>>,
    cache: Arc<dyn CacheService>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;
    let ctx = connect(&config).await?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &ctx).await?,
        Commands::Token { action } => handle_token_action(action, &ctx).await?,
        Commands::Cache { action } => handle_cache_action(action, &ctx).await?,
        Commands::Db { action } => handle_db_action(action, &ctx.pool).await?,
    }

    Ok(())
}

async fn connect(config: &Config) -> Result<Admin> {
    let pool = connect_database(config).await?;
    let cache = connect_cache(config).await;

    let pg_users = Arc::new(PgUserRepository::new(Arc::new(pool.clone())));
    let users = Arc::new(CachingUserRepository::new(
        pg_users.clone(),
        cache.clone(),
        config.cache_ttl(),
    ));

    Ok(Admin {
        pool,
        pg_users,
        users,
        cache,
    })
}

/// Dispatches user management commands.
async fn handle_user_action(action: UserAction, ctx: &Admin) -> Result<()> {
    let users: Arc<dyn UserRepository> = ctx.users.clone();
    let service = UserService::new(users);

    match action {
        UserAction::List => list_users(&service).await?,
        UserAction::Create {
            name,
            email,
            generate_password,
            yes,
        } => create_user(&service, name, email, generate_password, yes).await?,
        UserAction::Delete { id_or_email } => delete_user(&service, id_or_email).await?,
    }

    Ok(())
}

/// Lists all users.
///
/// # Output Format
///
/// ```text
/// 👥 Users
///
///   ID    Name                      Email                          Created
///   ────────────────────────────────────────────────────────────────────────────────
///   1     Ana                       ana@example.com                2025-01-15 10:30
/// ```
async fn list_users(service: &DynUserService) -> Result<()> {
    println!("{}", "👥 Users".bright_blue().bold());
    println!();

    let users = service
        .all_users()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<5} {:<25} {:<30} {:<16}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Email".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "─".repeat(80).bright_black());

    for user in &users {
        println!(
            "  {:<5} {:<25} {:<30} {}",
            user.id.to_string().bright_black(),
            user.name.cyan(),
            user.email,
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Creates a user with interactive prompts.
///
/// # Flow
///
/// 1. Prompt for name and email (or use provided)
/// 2. Generate a password or prompt for one
/// 3. Confirm creation (unless `--yes` flag)
/// 4. Store through the caching repository
async fn create_user(
    service: &DynUserService,
    name: Option<String>,
    email: Option<String>,
    generate_password: bool,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "👤 Create User".bright_blue().bold());
    println!();

    let name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Name").interact_text()?,
    };

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };

    let password = if generate_password {
        let generated = generate_password_value();
        println!("{}", "✨ Generated password".green());
        generated
    } else {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Repeat password", "Passwords do not match")
            .interact()?
    };

    println!();
    println!("{}", "User details:".bright_white().bold());
    println!("  Name:  {}", name.cyan());
    println!("  Email: {}", email.cyan());
    if generate_password {
        println!("  Password: {}", password.bright_yellow().bold());
        println!();
        println!(
            "{}",
            "⚠️  IMPORTANT: Save this password now! It is stored hashed."
                .red()
                .bold()
        );
    }
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this user?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let user = service
        .create(name, email, &password)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    println!();
    println!(
        "{} (id {})",
        "✅ User created successfully!".green().bold(),
        user.id.to_string().bright_white()
    );
    println!();

    Ok(())
}

/// Deletes a user by ID or email with confirmation prompt.
///
/// # Lookup
///
/// - If input is numeric, lookup by ID
/// - Otherwise, lookup by email (exact match)
///
/// Access tokens of the user are removed with it.
async fn delete_user(service: &DynUserService, id_or_email: String) -> Result<()> {
    println!("{}", "🗑️  Delete User".bright_blue().bold());
    println!();

    let user = match id_or_email.parse::<i64>() {
        Ok(id) => service.user_by_id(id).await,
        Err(_) => service.user_by_email(&id_or_email).await,
    }
    .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    let user = user.context("User not found")?;

    print_user(&user);

    let confirmed = Confirm::new()
        .with_prompt("Delete this user?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    let deleted = service
        .delete(user.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete user: {}", e))?;

    println!();
    if deleted {
        println!("{}", "✅ User deleted successfully!".green().bold());
    } else {
        println!("{}", "⚠️  User was already gone".yellow());
    }
    println!();

    Ok(())
}

fn print_user(user: &User) {
    println!("  User:  {}", user.name.cyan());
    println!("  Email: {}", user.email.cyan());
    println!("  ID:    {}", user.id.to_string().bright_black());
    println!();
}

/// Dispatches token management commands.
async fn handle_token_action(action: TokenAction, ctx: &Admin) -> Result<()> {
    let repo = PgTokenRepository::new(Arc::new(ctx.pool.clone()));

    match action {
        TokenAction::List { user } => list_tokens(&repo, user).await?,
        TokenAction::Revoke { id } => revoke_token(&repo, id).await?,
    }

    Ok(())
}

/// Lists access tokens with status indicators.
///
/// # Output Format
///
/// ```text
/// 📋 Access Tokens
///
///   ID    User   Name                 Created            Last used          Status
///   ────────────────────────────────────────────────────────────────────────────────
///   1     1      auth_token           2025-01-15 10:30   2025-01-15 11:02   ACTIVE
///   2     1      auth_token           2025-01-14 09:12   never              REVOKED
/// ```
async fn list_tokens(repo: &PgTokenRepository, user: Option<i64>) -> Result<()> {
    println!("{}", "📋 Access Tokens".bright_blue().bold());
    println!();

    let tokens = repo
        .list_tokens(user)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    if tokens.is_empty() {
        println!("{}", "  No tokens found".yellow());
        println!();
        return Ok(());
    }

    println!(
        "  {:<5} {:<6} {:<20} {:<18} {:<18} {:<10}",
        "ID".bright_white().bold(),
        "User".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Last used".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(80).bright_black());

    for token in &tokens {
        let status = if token.revoked_at.is_some() {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };

        let last_used = token
            .last_used_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "  {:<5} {:<6} {:<20} {:<18} {:<18} {}",
            token.id.to_string().bright_black(),
            token.user_id.to_string(),
            token.name.cyan(),
            token
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            last_used.bright_black(),
            status
        );
    }

    println!();
    println!(
        "  Total: {}",
        tokens.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Revokes a token by ID with confirmation prompt.
async fn revoke_token(repo: &PgTokenRepository, id: i64) -> Result<()> {
    println!("{}", "🔒 Revoke Access Token".bright_blue().bold());
    println!();

    let confirmed = Confirm::new()
        .with_prompt(format!("Revoke token {id}?"))
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    let revoked = repo
        .revoke_by_id(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    println!();
    if revoked {
        println!("{}", "✅ Token revoked successfully!".green().bold());
    } else {
        println!("{}", "⚠️  Token not found or already revoked".yellow());
    }
    println!();

    Ok(())
}

/// Handles cache maintenance commands.
async fn handle_cache_action(action: CacheAction, ctx: &Admin) -> Result<()> {
    match action {
        CacheAction::FlushUser { id } => {
            println!(
                "{} ({})",
                "🧹 Flushing cached user entries".bright_blue(),
                ctx.cache.backend()
            );

            // Read from Postgres directly so the lookup does not repopulate the cache.
            let user = ctx
                .pg_users
                .find_by_id(id)
                .await
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

            match user {
                Some(user) => {
                    ctx.users
                        .evict_user(&user)
                        .await
                        .map_err(|e| anyhow::anyhow!("Cache error: {}", e))?;
                }
                None => {
                    for key in [keys::by_id(id), keys::ALL_USERS.to_string()] {
                        ctx.cache.delete(&key).await?;
                    }
                }
            }

            println!("{}", "✅ Cache entries removed".green().bold());
        }
    }

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
                .fetch_one(pool)
                .await?;

            let tokens_count: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM access_tokens WHERE revoked_at IS NULL",
            )
            .fetch_one(pool)
            .await?;

            println!("  PostgreSQL:    {}", version.bright_white());
            println!(
                "  Users:         {}",
                users_count.to_string().bright_green().bold()
            );
            println!(
                "  Active tokens: {}",
                tokens_count.to_string().bright_green().bold()
            );
            println!();
        }
    }

    Ok(())
}

/// Generates a random password.
///
/// # Format
///
/// - Length: 20 characters
/// - Character set: A-Z, a-z, 0-9
fn generate_password_value() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const PASSWORD_LEN: usize = 20;

    let mut rng = rand::rng();

    (0..PASSWORD_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
