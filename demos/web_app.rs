//! Minimal web app that logs in with Monzo and lists your accounts.
//!
//! Reads `MONZO_CLIENT_ID`, `MONZO_CLIENT_SECRET` and `MONZO_REDIRECT_URL`
//! (default `http://localhost:8080/auth/callback`) from the environment.
//!
//! Run with: cargo run --example web_app

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

use monzo_rs::auth::CallbackParams;
use monzo_rs::webhook::parse_transaction_created;
use monzo_rs::{AuthorizationFlow, ClientConfig, MonzoClient, OAuthConfig, Session, Token};

const TOKEN_COOKIE: &str = "monzo-token";

/// How long a login may sit on Monzo's consent page before its flow is dropped.
const PENDING_TTL: Duration = Duration::from_secs(10 * 60);

/// Upper bound on flows awaiting a redirect.
const MAX_PENDING: usize = 1024;

/// `web_app` arguments.
#[derive(Debug, Parser)]
#[command(name = "web_app", about = "Log in with Monzo and list your accounts")]
struct Args {
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
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:8080")]
    listen: String,
}

#[derive(Clone)]
struct AppState {
    oauth: OAuthConfig,
    pending: Arc<Mutex<PendingFlows>>,
}

/// Flows waiting for their redirect, keyed by state token.
///
/// Abandoned logins expire after [`PENDING_TTL`]; when the map is full the
/// oldest flow is dropped to make room.
#[derive(Default)]
struct PendingFlows {
    flows: HashMap<String, (Instant, AuthorizationFlow)>,
}

impl PendingFlows {
    fn insert(&mut self, flow: AuthorizationFlow, now: Instant) {
        self.flows
            .retain(|_, (created, _)| now.duration_since(*created) < PENDING_TTL);
        if self.flows.len() >= MAX_PENDING {
            let oldest = self
                .flows
                .iter()
                .min_by_key(|(_, (created, _))| *created)
                .map(|(state, _)| state.clone());
            if let Some(state) = oldest {
                tracing::warn!("too many pending logins, dropping the oldest");
                self.flows.remove(&state);
            }
        }
        self.flows.insert(flow.state().to_string(), (now, flow));
    }

    /// Remove the flow for `state` unless it has expired.
    fn take(&mut self, state: &str, now: Instant) -> Option<AuthorizationFlow> {
        let (created, flow) = self.flows.remove(state)?;
        (now.duration_since(created) < PENDING_TTL).then_some(flow)
    }

    fn len(&self) -> usize {
        self.flows.len()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let state = AppState {
        oauth: OAuthConfig::new(args.client_id, args.client_secret, args.redirect_url),
        pending: Arc::new(Mutex::new(PendingFlows::default())),
    };

    let listener = TcpListener::bind(&args.listen).await?;
    tracing::info!(addr = %args.listen, "starting example server");
    axum::serve(listener, app(state)).await?;
    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/auth/login", get(login))
        .route("/auth/callback", get(callback))
        .route("/dashboard", get(dashboard))
        .route("/logout", get(logout))
        .route("/webhook", post(webhook))
        .with_state(state)
}

async fn home(headers: HeaderMap) -> Html<&'static str> {
    if token_cookie(&headers).is_some() {
        Html(
            r#"<h2>Monzo API Example App</h2>
<p>You are already logged in.</p>
<p><a href="/dashboard">Go to Dashboard</a></p>
<p><a href="/logout">Logout</a></p>"#,
        )
    } else {
        Html(
            r#"<h2>Monzo API Example App</h2>
<p>Click the link below to log in with your Monzo account.</p>
<a href="/auth/login">Login with Monzo</a>"#,
        )
    }
}

async fn login(State(state): State<AppState>) -> Response {
    let flow = AuthorizationFlow::new(state.oauth.clone());
    let url = match flow.authorize_url() {
        Ok(url) => url,
        Err(err) => {
            tracing::error!(error = %err, "cannot build authorization URL");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    let mut pending = state.pending.lock().await;
    pending.insert(flow, Instant::now());
    tracing::debug!(pending = pending.len(), "login started");
    drop(pending);
    Redirect::temporary(url.as_str()).into_response()
}

async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Response {
    let Some(flow) = state
        .pending
        .lock()
        .await
        .take(&params.state, Instant::now())
    else {
        tracing::warn!("invalid state token");
        return (StatusCode::FORBIDDEN, "Invalid state token.").into_response();
    };
    if params.code.is_empty() {
        return (StatusCode::BAD_REQUEST, "No code returned.").into_response();
    }

    let token = match flow.finish(&params).await {
        Ok(token) => token,
        Err(err) => {
            tracing::error!(error = %err, "failed to exchange token");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to exchange token.")
                .into_response();
        }
    };

    // Only the access token is kept; this example does not refresh.
    let cookie = format!(
        "{TOKEN_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
        token.access_token
    );
    tracing::info!("token exchanged and saved to cookie");
    (
        [(header::SET_COOKIE, cookie)],
        Redirect::temporary("/dashboard"),
    )
        .into_response()
}

async fn dashboard(headers: HeaderMap) -> Response {
    let Some(access_token) = token_cookie(&headers) else {
        tracing::info!("no token cookie found, redirecting to home");
        return Redirect::temporary("/").into_response();
    };

    let session = Session::new(Token::bearer(access_token), None);
    let client = match MonzoClient::from_session(session, ClientConfig::default()) {
        Ok(client) => client,
        Err(err) => {
            tracing::error!(error = %err, "cannot build client");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match client.accounts().list(None).await {
        Ok(accounts) => {
            let mut page = String::from(
                "<h2>Successfully Fetched Accounts!</h2>\n<p>Your Accounts:</p><ul>\n",
            );
            for account in accounts {
                page.push_str(&format!(
                    "<li>{} ({})</li>\n",
                    escape_html(&account.description),
                    escape_html(account.id.as_str())
                ));
            }
            page.push_str("</ul>\n<p><a href=\"/logout\">Logout</a></p>\n");
            Html(page).into_response()
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to list accounts (needs approval?)");
            Html(format!(
                "<h2>Error Fetching Accounts</h2>\n\
                 <p>Could not fetch your accounts. This is normal if it's your first time logging in.</p>\n\
                 <p><b>ACTION REQUIRED:</b> Please open your Monzo app on your phone and approve this application.</p>\n\
                 <p>Once approved, just refresh this page.</p>\n\
                 <hr><p>Error details: {}</p>\n",
                escape_html(&err.to_string())
            ))
            .into_response()
        }
    }
}

async fn logout() -> impl IntoResponse {
    tracing::info!("user logged out");
    (
        [(
            header::SET_COOKIE,
            format!("{TOKEN_COOKIE}=; Path=/; Max-Age=0"),
        )],
        Redirect::temporary("/"),
    )
}

/// Accepts every delivery so Monzo does not retry; rejections are logged.
async fn webhook(body: Bytes) -> StatusCode {
    match parse_transaction_created(&body) {
        Ok(tx) => tracing::info!(
            id = %tx.id,
            amount = tx.amount,
            currency = %tx.currency,
            description = %tx.description,
            "transaction created"
        ),
        Err(err) => tracing::warn!(error = %err, "webhook rejected"),
    }
    StatusCode::OK
}

fn token_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow() -> AuthorizationFlow {
        AuthorizationFlow::new(OAuthConfig::new(
            "client",
            "secret",
            "http://localhost:8080/auth/callback",
        ))
    }

    #[test]
    fn test_pending_flows_expire() {
        let start = Instant::now();
        let mut pending = PendingFlows::default();
        let stale = flow();
        let stale_state = stale.state().to_string();
        pending.insert(stale, start);

        let later = start + PENDING_TTL + Duration::from_secs(1);
        let fresh = flow();
        let fresh_state = fresh.state().to_string();
        pending.insert(fresh, later);

        // The stale flow was evicted on insert.
        assert_eq!(pending.len(), 1);
        assert!(pending.take(&stale_state, later).is_none());
        assert!(pending.take(&fresh_state, later).is_some());
        assert!(pending.take(&fresh_state, later).is_none());
    }

    #[test]
    fn test_expired_flow_is_not_returned() {
        let start = Instant::now();
        let mut pending = PendingFlows::default();
        let f = flow();
        let state = f.state().to_string();
        pending.insert(f, start);
        assert!(pending.take(&state, start + PENDING_TTL).is_none());
        assert_eq!(pending.len(), 0);
    }

    #[test]
    fn test_pending_flows_are_capped() {
        let start = Instant::now();
        let mut pending = PendingFlows::default();
        let first = flow();
        let first_state = first.state().to_string();
        pending.insert(first, start);
        for i in 1..=MAX_PENDING {
            pending.insert(flow(), start + Duration::from_millis(i as u64));
        }
        assert_eq!(pending.len(), MAX_PENDING);
        assert!(pending.take(&first_state, start).is_none());
    }
}
