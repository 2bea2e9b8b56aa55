//! Command-line client for a personal Monzo account.
//!
//! Reads the OAuth client registration from the environment:
//!
//! - `MONZO_CLIENT_ID`
//! - `MONZO_CLIENT_SECRET`
//! - `MONZO_REDIRECT_URL` (default `http://localhost:8080/auth/callback`)
//!
//! The first run opens the authorization flow and stores the token under the
//! user config directory; later runs reuse and refresh it.
//!
//! Run with: cargo run --example cli -- list-accounts

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

use monzo_rs::auth::{CallbackHandle, CallbackParams};
use monzo_rs::models::Pagination;
use monzo_rs::{
    AccountId, AuthorizationFlow, ClientConfig, MonzoClient, OAuthConfig, Session, Token,
};

const APP_DIR: &str = "my-monzo-cli";
const TOKEN_FILE: &str = "token.json";

/// `my-monzo-cli` arguments.
#[derive(Debug, Parser)]
#[command(name = "my-monzo-cli", about = "Inspect your Monzo accounts", version)]
struct Cli {
    /// OAuth client id from the Monzo developer portal.
    #[arg(long, env = "MONZO_CLIENT_ID")]
    client_id: String,
    /// OAuth client secret.
    #[arg(long, env = "MONZO_CLIENT_SECRET", hide_env_values = true)]
    client_secret: String,
    /// Redirect URI registered with the client.
    #[arg(
        long,
        env = "MONZO_REDIRECT_URL",
        default_value = "http://localhost:8080/auth/callback"
    )]
    redirect_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check authentication and show user and client ids.
    Whoami,
    /// List all your accounts.
    ListAccounts,
    /// Show the balance of an account.
    Balance { account_id: String },
    /// List the pots of an account.
    Pots { account_id: String },
    /// List recent transactions of an account.
    Transactions {
        account_id: String,
        /// Maximum number of transactions.
        #[arg(long)]
        limit: Option<i32>,
        /// RFC 3339 timestamp or transaction id to start after.
        #[arg(long)]
        since: Option<String>,
        /// RFC 3339 timestamp to end before.
        #[arg(long)]
        before: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let oauth = OAuthConfig::new(&cli.client_id, &cli.client_secret, &cli.redirect_url);
    let token_path = token_path()?;

    let token = match read_token(&token_path) {
        Ok(token) => {
            tracing::info!(path = %token_path.display(), "using saved token");
            token
        }
        Err(err) => {
            tracing::info!(reason = %err, "no usable token file, starting browser authentication");
            let token = authorize(oauth.clone()).await?;
            save_token(&token_path, &token)?;
            token
        }
    };

    let session = Session::new(token, Some(oauth));
    let client = MonzoClient::from_session(session.clone(), ClientConfig::default())?;
    let outcome = run(&client, cli.command).await;

    // Keep whatever refresh happened during the command.
    save_token(&token_path, &session.token().await)?;
    outcome
}

async fn run(client: &MonzoClient, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Whoami => {
            let who = client.identity().whoami().await.context("failed to check auth")?;
            if who.authenticated {
                println!("Authenticated.");
                println!("User ID:   {}", who.user_id);
                println!("Client ID: {}", who.client_id);
            } else {
                println!("Not authenticated. The token may be invalid.");
            }
        }
        Command::ListAccounts => {
            let accounts = client
                .accounts()
                .list(None)
                .await
                .context("failed to list accounts")?;
            if accounts.is_empty() {
                println!("No accounts found.");
            }
            for account in accounts {
                println!("  - ID:          {}", account.id);
                println!("    Description: {}", account.description);
                println!("    Created:     {}", account.created.with_timezone(&chrono::Local));
                println!("    ---");
            }
        }
        Command::Balance { account_id } => {
            let balance = client
                .balances()
                .get(&AccountId::new(account_id))
                .await
                .context("failed to get balance")?;
            println!("Balance:     {}", format_money(balance.balance, &balance.currency));
            println!("Total:       {}", format_money(balance.total_balance, &balance.currency));
            println!("Spent today: {}", format_money(balance.spend_today, &balance.currency));
        }
        Command::Pots { account_id } => {
            let pots = client
                .pots()
                .list(&AccountId::new(account_id))
                .await
                .context("failed to list pots")?;
            for pot in pots.iter().filter(|pot| !pot.deleted) {
                println!("  - {} ({})", pot.name, pot.id);
                println!("    Balance: {}", format_money(pot.balance, &pot.currency));
            }
        }
        Command::Transactions {
            account_id,
            limit,
            since,
            before,
        } => {
            let mut page = Pagination::new();
            if let Some(limit) = limit {
                page = page.limit(limit);
            }
            if let Some(since) = since {
                page = page.since(since);
            }
            if let Some(before) = before {
                page = page.before(before);
            }
            let transactions = client
                .transactions()
                .list(&AccountId::new(account_id), Some(&page))
                .await
                .context("failed to list transactions")?;
            for tx in transactions {
                let status = if tx.is_settled() { "" } else { " (pending)" };
                println!(
                    "  {}  {:>12}  {}{}",
                    tx.created.format("%Y-%m-%d"),
                    format_money(tx.amount, &tx.currency),
                    tx.description,
                    status
                );
            }
        }
    }
    Ok(())
}

/// Number of decimal places in the currency's minor unit (ISO 4217).
fn minor_unit_digits(currency: &str) -> u32 {
    match currency.to_ascii_uppercase().as_str() {
        "BIF" | "CLP" | "DJF" | "GNF" | "ISK" | "JPY" | "KMF" | "KRW" | "PYG" | "RWF"
        | "UGX" | "UYI" | "VND" | "VUV" | "XAF" | "XOF" | "XPF" => 0,
        "BHD" | "IQD" | "JOD" | "KWD" | "LYD" | "OMR" | "TND" => 3,
        _ => 2,
    }
}

fn format_money(minor_units: i64, currency: &str) -> String {
    let sign = if minor_units < 0 { "-" } else { "" };
    let abs = minor_units.unsigned_abs();
    let digits = minor_unit_digits(currency);
    if digits == 0 {
        return format!("{sign}{abs} {currency}");
    }
    let divisor = 10u64.pow(digits);
    format!(
        "{sign}{}.{:0width$} {currency}",
        abs / divisor,
        abs % divisor,
        width = digits as usize
    )
}

/// Run the browser flow with a temporary local callback server.
async fn authorize(oauth: OAuthConfig) -> anyhow::Result<Token> {
    let redirect = url::Url::parse(&oauth.redirect_url).context("invalid redirect URL")?;
    let port = redirect
        .port_or_known_default()
        .ok_or_else(|| anyhow!("redirect URL has no port"))?;
    let callback_path = redirect.path().to_string();

    let flow = AuthorizationFlow::new(oauth);
    let authorize_url = flow.authorize_url()?;

    let app = Router::new()
        .route(&callback_path, get(callback))
        .with_state(flow.callback_handle());
    let listener = TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to listen on port {port}"))?;
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
    });

    println!("Please open this URL in your browser to log in:\n\n{authorize_url}\n");
    tracing::info!(port, "waiting for the authorization redirect");

    let token = tokio::select! {
        token = flow.wait() => token.context("authentication failed"),
        _ = tokio::signal::ctrl_c() => Err(anyhow!("interrupted")),
    };

    shutdown_tx.send(()).ok();
    server.await.context("callback server panicked")??;
    let token = token?;
    tracing::info!("authentication successful");
    Ok(token)
}

async fn callback(
    State(handle): State<CallbackHandle>,
    Query(params): Query<CallbackParams>,
) -> (StatusCode, String) {
    match handle.complete(&params) {
        Ok(()) => (
            StatusCode::OK,
            "Authentication successful! You can close this window and return to your terminal."
                .to_string(),
        ),
        Err(err) => {
            tracing::warn!(error = %err, "authorization callback rejected");
            (StatusCode::BAD_REQUEST, err.to_string())
        }
    }
}

/// `<config_dir>/my-monzo-cli/token.json`
fn token_path() -> anyhow::Result<PathBuf> {
    let dir = dirs::config_dir().ok_or_else(|| anyhow!("could not locate config directory"))?;
    Ok(dir.join(APP_DIR).join(TOKEN_FILE))
}

fn read_token(path: &Path) -> anyhow::Result<Token> {
    let bytes = fs::read(path)?;
    let token = serde_json::from_slice(&bytes)
        .with_context(|| format!("malformed token file {}", path.display()))?;
    Ok(token)
}

fn save_token(path: &Path, token: &Token) -> anyhow::Result<()> {
    let Some(dir) = path.parent() else {
        bail!("token path {} has no parent", path.display());
    };
    create_private_dir(dir)?;

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    file.write_all(&serde_json::to_vec_pretty(token)?)?;
    tracing::debug!(path = %path.display(), "token saved");
    Ok(())
}

fn create_private_dir(dir: &Path) -> anyhow::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder
        .create(dir)
        .with_context(|| format!("failed to create {}", dir.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money_uses_currency_exponent() {
        assert_eq!(format_money(-510, "GBP"), "-5.10 GBP");
        assert_eq!(format_money(5, "EUR"), "0.05 EUR");
        assert_eq!(format_money(1500, "JPY"), "1500 JPY");
        assert_eq!(format_money(-1234, "KWD"), "-1.234 KWD");
    }
}
