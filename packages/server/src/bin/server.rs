//! Live code-pairing server for mentor/student sessions.
//!
//! Keeps one shared editor per room in sync across connections, arbitrates
//! the mentor role, relays chat, and announces solution matches.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin codesync-server
//! cargo run --bin codesync-server -- --host 0.0.0.0 --port 3000
//! cargo run --bin codesync-server -- --codeblocks ./codeblocks.json
//! ```

use std::{path::PathBuf, sync::Arc};

use clap::Parser;

use codesync_server::{
    infrastructure::{InMemoryCodeBlockStore, InMemorySessionRegistry, WebSocketRoomPusher},
    ui::Server,
    usecase::{
        DisconnectUseCase, JoinRoomUseCase, LeaveRoomUseCase, SendMessageUseCase,
        UpdateCodeUseCase,
    },
};
use codesync_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "codesync-server")]
#[command(about = "Real-time code-pairing server for mentor/student sessions", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Path to a JSON file with code block definitions (uses the built-in
    /// exercises when omitted)
    #[arg(long)]
    codeblocks: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. CodeBlockStore
    // 2. SessionRegistry
    // 3. RoomPusher
    // 4. UseCases
    // 5. Server

    // 1. Create CodeBlockStore (exercise definitions)
    let store = match &args.codeblocks {
        Some(path) => match InMemoryCodeBlockStore::from_json_file(path) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::error!("Failed to load code blocks from {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Arc::new(InMemoryCodeBlockStore::seeded()),
    };

    // 2. Create SessionRegistry (in-memory room state, hydrated lazily)
    let registry = Arc::new(InMemorySessionRegistry::new(store.clone()));

    // 3. Create RoomPusher (WebSocket implementation)
    let pusher = Arc::new(WebSocketRoomPusher::new());

    // 4. Create UseCases
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(registry.clone(), pusher.clone()));
    let update_code_usecase = Arc::new(UpdateCodeUseCase::new(registry.clone(), pusher.clone()));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        registry.clone(),
        Arc::new(SystemClock),
    ));
    let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(registry.clone(), pusher.clone()));
    let disconnect_usecase = Arc::new(DisconnectUseCase::new(
        leave_room_usecase.clone(),
        pusher.clone(),
    ));

    // 5. Create and run the server
    let server = Server::new(
        join_room_usecase,
        update_code_usecase,
        send_message_usecase,
        leave_room_usecase,
        disconnect_usecase,
        store,
        registry,
        pusher,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
