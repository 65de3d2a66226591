//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectUseCase::execute() メソッド
//! - 接続が属する全ルームからの退出と登録解除
//!
//! ### なぜこのテストが必要か
//! - メンター切断時の回復（リセット + mentorLeft 通知）を保証
//! - 切断後に is_live が false になり、stale ID の回収が可能になることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：単一ルームのメンター/学生の切断
//! - エッジケース：複数ルームに参加している接続の切断、どのルームにも
//!   参加していない接続の切断

use std::sync::Arc;

use crate::domain::{ConnectionId, RoomId, RoomPusher};

use super::{LeaveOutcome, LeaveRoomUseCase};

/// 切断のユースケース
///
/// 明示的な leaveRoom と違いルーム ID を伴わない：接続が属している
/// 全ルームに対して退出処理を適用し、最後に push チャンネルの登録を
/// 解除する。
pub struct DisconnectUseCase {
    /// ルーム単位の退出処理（leaveRoom と共通）
    leave_room: Arc<LeaveRoomUseCase>,
    /// RoomPusher（pub/sub とメッセージ通知の抽象化）
    pusher: Arc<dyn RoomPusher>,
}

impl DisconnectUseCase {
    /// 新しい DisconnectUseCase を作成
    pub fn new(leave_room: Arc<LeaveRoomUseCase>, pusher: Arc<dyn RoomPusher>) -> Self {
        Self { leave_room, pusher }
    }

    /// 切断を実行
    ///
    /// # Returns
    ///
    /// ルームごとの退出結果。UI 層はこれを元に mentorLeft または
    /// studentCountChanged を各ルームへブロードキャストする。
    pub async fn execute(&self, connection_id: &ConnectionId) -> Vec<(RoomId, LeaveOutcome)> {
        let rooms = self.pusher.rooms_of(connection_id).await;

        let mut outcomes = Vec::with_capacity(rooms.len());
        for room_id in rooms {
            let outcome = self.leave_room.execute(connection_id, &room_id).await;
            outcomes.push((room_id, outcome));
        }

        self.pusher.unregister_client(connection_id).await;
        tracing::info!(
            "Connection '{}' disconnected from {} room(s)",
            connection_id.as_str(),
            outcomes.len()
        );

        outcomes
    }
}
