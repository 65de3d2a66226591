//! UseCase: ルーム退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//! - メンター退出時の状態リセットと学生退出時の学生数再計算
//!
//! ### なぜこのテストが必要か
//! - メンター離脱からの回復（コード再読込・チャットクリア）を保証
//! - 学生退出がルーム状態をリセットしないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：メンターの明示的退出、学生の明示的退出
//! - エッジケース：参加していない接続の退出

use std::sync::Arc;

use crate::domain::{ConnectionId, RoomId, RoomPusher, SessionRegistry, student_count};

/// Result of a connection leaving a room, telling the UI layer which
/// signal to broadcast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LeaveOutcome {
    /// The mentor departed: room state was reset, broadcast `mentorLeft`.
    MentorLeft,
    /// A student (or unjoined connection) departed: broadcast the
    /// recomputed student count.
    StudentLeft { student_count: usize },
}

/// ルーム退出のユースケース（明示的な leaveRoom と切断時の両方から使われる）
pub struct LeaveRoomUseCase {
    /// Registry（セッション状態の抽象化）
    registry: Arc<dyn SessionRegistry>,
    /// RoomPusher（pub/sub とメッセージ通知の抽象化）
    pusher: Arc<dyn RoomPusher>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(registry: Arc<dyn SessionRegistry>, pusher: Arc<dyn RoomPusher>) -> Self {
        Self { registry, pusher }
    }

    /// ルーム退出を実行
    ///
    /// 接続をブロードキャストグループから外した上で、メンターだった場合は
    /// ルーム状態をリセットする。学生だった場合は残りの学生数を返す。
    pub async fn execute(&self, connection_id: &ConnectionId, room_id: &RoomId) -> LeaveOutcome {
        // 1. ルームの操作ロックを取得（mentor 照会と reset をまたぐため）
        let _guard = self.registry.lock_room(room_id).await;

        // 2. ブロードキャストグループから除去
        self.pusher.leave(connection_id, room_id).await;

        // 3. メンターだったかどうかで分岐
        let was_mentor = self.registry.mentor(room_id).await.as_ref() == Some(connection_id);
        if was_mentor {
            self.registry.reset(room_id).await;
            tracing::info!(
                "Mentor '{}' left room '{}', state reset",
                connection_id.as_str(),
                room_id.as_str()
            );
            return LeaveOutcome::MentorLeft;
        }

        // 4. 学生退出：学生数を再計算
        let members = self.pusher.room_size(room_id).await;
        let mentor_assigned = self.registry.mentor(room_id).await.is_some();
        LeaveOutcome::StudentLeft {
            student_count: student_count(members, mentor_assigned),
        }
    }
}
