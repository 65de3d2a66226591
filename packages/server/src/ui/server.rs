//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{
    domain::{CodeBlockStore, RoomPusher, SessionRegistry},
    usecase::{
        DisconnectUseCase, JoinRoomUseCase, LeaveRoomUseCase, SendMessageUseCase,
        UpdateCodeUseCase,
    },
};

use super::{
    handler::{debug_room_state, get_codeblocks, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Live code-pairing server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     join_room_usecase,
///     update_code_usecase,
///     send_message_usecase,
///     leave_room_usecase,
///     disconnect_usecase,
///     store,
///     registry,
///     pusher,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// JoinRoomUseCase（ルーム参加のユースケース）
    join_room_usecase: Arc<JoinRoomUseCase>,
    /// UpdateCodeUseCase（コード更新のユースケース）
    update_code_usecase: Arc<UpdateCodeUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    send_message_usecase: Arc<SendMessageUseCase>,
    /// LeaveRoomUseCase（ルーム退出のユースケース）
    leave_room_usecase: Arc<LeaveRoomUseCase>,
    /// DisconnectUseCase（切断処理のユースケース）
    disconnect_usecase: Arc<DisconnectUseCase>,
    /// CodeBlockStore（課題データアクセスの抽象化）
    store: Arc<dyn CodeBlockStore>,
    /// SessionRegistry（ルーム状態管理の抽象化）
    registry: Arc<dyn SessionRegistry>,
    /// RoomPusher（メッセージ通知の抽象化）
    pusher: Arc<dyn RoomPusher>,
}

impl Server {
    /// Create a new Server instance
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        join_room_usecase: Arc<JoinRoomUseCase>,
        update_code_usecase: Arc<UpdateCodeUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        leave_room_usecase: Arc<LeaveRoomUseCase>,
        disconnect_usecase: Arc<DisconnectUseCase>,
        store: Arc<dyn CodeBlockStore>,
        registry: Arc<dyn SessionRegistry>,
        pusher: Arc<dyn RoomPusher>,
    ) -> Self {
        Self {
            join_room_usecase,
            update_code_usecase,
            send_message_usecase,
            leave_room_usecase,
            disconnect_usecase,
            store,
            registry,
            pusher,
        }
    }

    /// Run the live code-pairing server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            join_room_usecase: self.join_room_usecase,
            update_code_usecase: self.update_code_usecase,
            send_message_usecase: self.send_message_usecase,
            leave_room_usecase: self.leave_room_usecase,
            disconnect_usecase: self.disconnect_usecase,
            store: self.store,
            registry: self.registry,
            pusher: self.pusher,
        });

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/codeblocks", get(get_codeblocks))
            .route("/debug/rooms/{room_id}", get(debug_room_state))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "Live code-pairing server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
