//! Tandem coordinator server.
//!
//! Pairs users for shared drawing / chat sessions and relays room events over
//! WebSocket.
//!
//! Run with:
//! ```not_rust
//! JWT_SECRET=changeme cargo run --bin tandem-server
//! cargo run --bin tandem-server -- --host 0.0.0.0 --port 3000 --jwt-secret changeme
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use tandem_server::{
    infrastructure::{
        identity::JwtIdentityVerifier, message_pusher::WebSocketMessagePusher,
        repository::InMemorySessionStore,
    },
    ui::Server,
    usecase::{Coordinator, CoordinatorConfig},
};
use tandem_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "tandem-server")]
#[command(about = "Real-time matchmaking and session relay server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "TANDEM_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "TANDEM_PORT", default_value = "8080")]
    port: u16,

    /// Shared secret used to verify HS256 session tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// Upper bound on a single store call, in milliseconds
    #[arg(long, env = "TANDEM_STORE_TIMEOUT_MS", default_value = "5000")]
    store_timeout_ms: u64,

    /// Report out-of-order actions to the client instead of ignoring them
    #[arg(long, env = "TANDEM_STRICT_ORDERING")]
    strict_ordering: bool,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = CoordinatorConfig {
        store_timeout: Duration::from_millis(args.store_timeout_ms),
        strict_ordering: args.strict_ordering,
    };
    tracing::info!(
        store_timeout_ms = args.store_timeout_ms,
        strict_ordering = config.strict_ordering,
        "starting coordinator"
    );

    // 1. Store, transport and identity service
    let store = Arc::new(InMemorySessionStore::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::new());
    let identity_verifier = Arc::new(JwtIdentityVerifier::new(&args.jwt_secret));

    // 2. Coordinator
    let coordinator = Arc::new(Coordinator::new(
        store,
        message_pusher,
        identity_verifier,
        Arc::new(SystemClock),
        config,
    ));

    // 3. Server
    let server = Server::new(coordinator);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
