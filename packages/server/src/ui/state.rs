//! Server state shared across handlers.

use std::sync::Arc;

use crate::{
    domain::{CodeBlockStore, RoomPusher, SessionRegistry},
    usecase::{
        DisconnectUseCase, JoinRoomUseCase, LeaveRoomUseCase, SendMessageUseCase,
        UpdateCodeUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// JoinRoomUseCase（ルーム参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// UpdateCodeUseCase（コード更新のユースケース）
    pub update_code_usecase: Arc<UpdateCodeUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// LeaveRoomUseCase（ルーム退出のユースケース）
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    /// DisconnectUseCase（切断処理のユースケース）
    pub disconnect_usecase: Arc<DisconnectUseCase>,
    /// CodeBlockStore（課題データアクセスの抽象化）
    pub store: Arc<dyn CodeBlockStore>,
    /// SessionRegistry（ルーム状態管理の抽象化）
    pub registry: Arc<dyn SessionRegistry>,
    /// RoomPusher（メッセージ通知の抽象化）
    pub pusher: Arc<dyn RoomPusher>,
}
