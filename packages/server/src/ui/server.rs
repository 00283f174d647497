//! Server execution logic.
//!
//! The relay exposes two listeners: the control-plane API (room joins,
//! health, room listing) and the websocket signaling endpoint. Both shut
//! down gracefully on Ctrl+C/SIGTERM, bounded by a fixed deadline after
//! which pending closes are abandoned.

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::usecase::{
    CreateSessionUseCase, DeleteSessionUseCase, JoinRoomUseCase, ListRoomsUseCase,
};

use super::{
    handler::{PumpConfig, get_rooms, health_check, join_room, websocket::signal_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// How long graceful shutdown may take before pending connections are
/// abandoned.
const SHUTDOWN_DEADLINE: Duration = Duration::from_secs(10);

/// WebRTC signaling relay server
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(
        create_session_usecase: Arc<CreateSessionUseCase>,
        delete_session_usecase: Arc<DeleteSessionUseCase>,
        join_room_usecase: Arc<JoinRoomUseCase>,
        list_rooms_usecase: Arc<ListRoomsUseCase>,
        pump: PumpConfig,
    ) -> Self {
        Self {
            state: Arc::new(AppState {
                create_session_usecase,
                delete_session_usecase,
                join_room_usecase,
                list_rooms_usecase,
                pump,
            }),
        }
    }

    fn api_router(&self) -> Router {
        // Browser clients are served from a different origin, hence the
        // permissive CORS policy on the control plane.
        Router::new()
            .route("/api/room", post(join_room))
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    fn signal_router(&self) -> Router {
        Router::new()
            .route("/signal/room/{room_id}/user/{user_id}", get(signal_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind both listeners and serve until Ctrl+C/SIGTERM.
    ///
    /// Failing to bind either listener is the only process-fatal error.
    pub async fn run(
        &self,
        api_addr: String,
        signal_addr: String,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let api_listener = TcpListener::bind(&api_addr).await?;
        let signal_listener = TcpListener::bind(&signal_addr).await?;

        let shutdown = CancellationToken::new();
        let trigger = shutdown.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received");
            trigger.cancel();
        });

        self.run_with_listeners(api_listener, signal_listener, shutdown)
            .await
    }

    /// Serve on already-bound listeners until `shutdown` is cancelled
    /// (exposed for the integration tests).
    pub async fn run_with_listeners(
        &self,
        api_listener: TcpListener,
        signal_listener: TcpListener,
        shutdown: CancellationToken,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        tracing::info!("API server listening on {}", api_listener.local_addr()?);
        tracing::info!(
            "Signaling server listening on {}",
            signal_listener.local_addr()?
        );

        let api_router = self.api_router();
        let signal_router = self.signal_router();
        let api_shutdown = shutdown.clone().cancelled_owned();
        let signal_shutdown = shutdown.clone().cancelled_owned();

        let servers = async {
            tokio::try_join!(
                async {
                    axum::serve(api_listener, api_router)
                        .with_graceful_shutdown(api_shutdown)
                        .await
                },
                async {
                    axum::serve(signal_listener, signal_router)
                        .with_graceful_shutdown(signal_shutdown)
                        .await
                },
            )
        };

        let deadline = async {
            shutdown.cancelled().await;
            tokio::time::sleep(SHUTDOWN_DEADLINE).await;
        };

        tokio::select! {
            result = servers => {
                result?;
                tracing::info!("Server shutdown complete");
            }
            _ = deadline => {
                tracing::warn!("Shutdown deadline exceeded, abandoning pending connections");
            }
        }
        Ok(())
    }
}
