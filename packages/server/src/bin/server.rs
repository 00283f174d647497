//! WebRTC signaling relay server.
//!
//! Clients join a room over the control API, then exchange signaling
//! messages with the other room member over the websocket endpoint.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kakehashi-server
//! cargo run --bin kakehashi-server -- --api-addr 0.0.0.0:8080 --signal-addr 0.0.0.0:8888
//! ```

use std::sync::Arc;

use clap::Parser;

use kakehashi_server::{
    infrastructure::store::InMemoryRoomStore,
    switch::Switch,
    ui::{Server, handler::PumpConfig},
    usecase::{CreateSessionUseCase, DeleteSessionUseCase, JoinRoomUseCase, ListRoomsUseCase},
};
use kakehashi_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "kakehashi-server")]
#[command(about = "WebRTC signaling relay with room-scoped message routing", long_about = None)]
struct Args {
    /// API listen address
    #[arg(short = 'a', long, default_value = "127.0.0.1:8080")]
    api_addr: String,

    /// WebSocket signaling listen address
    #[arg(short = 'w', long, default_value = "127.0.0.1:8888")]
    signal_addr: String,

    /// Log level
    #[arg(short = 'l', long, default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing; an unparsable level is fatal.
    if let Err(e) = setup_logger(&["kakehashi_server", "kakehashi_shared"], &args.log_level) {
        eprintln!("failed to parse log level '{}': {}", args.log_level, e);
        std::process::exit(1);
    }

    // Initialize dependencies in order:
    // 1. RoomStore (in-memory database)
    // 2. Switch (message router)
    // 3. UseCases
    // 4. Server

    // 1. Create RoomStore
    let store = Arc::new(InMemoryRoomStore::new());

    // 2. Create Switch
    let switch = Arc::new(Switch::new());

    // 3. Create UseCases
    let create_session_usecase = Arc::new(CreateSessionUseCase::new(store.clone(), switch.clone()));
    let delete_session_usecase = Arc::new(DeleteSessionUseCase::new(switch.clone()));
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(store.clone()));
    let list_rooms_usecase = Arc::new(ListRoomsUseCase::new(store.clone()));

    // 4. Create and run the server
    let server = Server::new(
        create_session_usecase,
        delete_session_usecase,
        join_room_usecase,
        list_rooms_usecase,
        PumpConfig::default(),
    );
    if let Err(e) = server.run(args.api_addr, args.signal_addr).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
