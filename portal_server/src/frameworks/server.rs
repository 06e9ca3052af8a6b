use crate::domain::CookiePolicy;
use crate::frameworks::config::{Config, VerifierMode};
use crate::interface_adapters::clients::IdentityClient;
use crate::interface_adapters::routes;
use crate::interface_adapters::state::{AppState, SystemClock};
use crate::use_cases::session_gate::SessionGate;
use crate::use_cases::verifiers::{
    LocalDecodeVerifier, NetworkVerifier, PrecheckedVerifier, SessionVerifier,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

// Per-call budget for provider requests. A refresh makes two calls in a row,
// and both must finish inside the gate's timeout, otherwise a consumed
// single-use refresh token could be thrown away with the rotated cookie.
pub(crate) fn provider_call_timeout(verify_timeout: Duration) -> Duration {
    verify_timeout * 2 / 5
}

// Build the shared state: provider client, verifier chain and gate.
pub fn build_state(config: &Config) -> Result<Arc<AppState>, reqwest::Error> {
    let cookies = CookiePolicy {
        session_cookie_name: config.session_cookie_name.clone(),
        secure: config.secure_cookies,
    };
    let identity = Arc::new(IdentityClient::new(
        config.identity_url.clone(),
        config.identity_anon_key.clone(),
        cookies.clone(),
        provider_call_timeout(config.verify_timeout),
    )?);

    let local = LocalDecodeVerifier {
        cookie_name: config.session_cookie_name.clone(),
        clock: SystemClock,
    };
    let verifier: Arc<dyn SessionVerifier> = match config.verifier {
        VerifierMode::Layered => Arc::new(PrecheckedVerifier {
            precheck: local,
            authority: NetworkVerifier {
                provider: identity.clone(),
            },
        }),
        VerifierMode::Network => Arc::new(NetworkVerifier {
            provider: identity.clone(),
        }),
        VerifierMode::LocalUnverified => {
            tracing::warn!(
                "SESSION_VERIFIER=local-unverified: session token signatures are not checked"
            );
            Arc::new(local)
        }
    };

    let gate = SessionGate::new(
        verifier,
        config.session_cookie_name.clone(),
        config.verify_timeout,
    );

    Ok(Arc::new(AppState {
        gate,
        identity,
        clock: Arc::new(SystemClock),
        cookies,
    }))
}

// Serve the app on an already bound listener (tests bind an ephemeral port).
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    let app = routes::app(state);
    axum::serve(listener, app).await
}

pub async fn run() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing();

    // Misconfigured auth is fatal at startup, never a per-request surprise.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };
    tracing::debug!(
        identity_url = %config.identity_url,
        session_cookie = %config.session_cookie_name,
        verifier = ?config.verifier,
        "identity provider configured."
    );

    let state = match build_state(&config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "failed to build identity client");
            std::process::exit(1);
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, "listening");

    // Bind TCP listener with error handling.
    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(%addr, error = %e, "failed to bind");
            return; // Abort startup on bind failure.
        }
    };

    // Serve app and report errors rather than panicking.
    if let Err(e) = serve(listener, state).await {
        tracing::error!(error = %e, "server error");
    }
}
