//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - ロール調停（最初の参加者がメンター、以降は学生）と学生数の計算
//!
//! ### なぜこのテストが必要か
//! - 不変条件の検証：1 ルームにメンターは常に高々 1 人
//! - 死んだメンター接続の ID が次の参加者に回収されることを保証
//! - init スナップショット（コード・チャット履歴・学生数）の正しさを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ルームへの最初の参加（メンター）、2 人目以降（学生）
//! - エッジケース：切断済みメンターの ID が残っている状態での参加、
//!   同一ルームへの同時参加（調停はルーム操作ロック下で直列化される）

use std::sync::Arc;

use crate::domain::{
    ChatMessage, ConnectionId, Role, RoomId, RoomPusher, SessionRegistry, student_count,
};

/// Result of a join: the payload for the `init` reply plus the room-wide
/// student count to broadcast.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    pub role: Role,
    /// Point-in-time snapshot; later updates are not retroactively applied.
    pub current_code: String,
    pub student_count: usize,
    pub chat_log: Vec<ChatMessage>,
}

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Registry（セッション状態の抽象化）
    registry: Arc<dyn SessionRegistry>,
    /// RoomPusher（pub/sub とメッセージ通知の抽象化）
    pusher: Arc<dyn RoomPusher>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(registry: Arc<dyn SessionRegistry>, pusher: Arc<dyn RoomPusher>) -> Self {
        Self { registry, pusher }
    }

    /// ルーム参加を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 参加する接続の ID
    /// * `room_id` - 参加先ルームの ID
    ///
    /// # Returns
    ///
    /// 参加結果のスナップショット（`init` 応答と studentCount 通知の元データ）
    pub async fn execute(&self, connection_id: &ConnectionId, room_id: &RoomId) -> JoinOutcome {
        // 1. ルームの操作ロックを取得
        //    調停は get_or_create / set_mentor をまたぐ read-check-write なので、
        //    ガードなしでは同時参加の双方がメンターになり得る
        let _guard = self.registry.lock_room(room_id).await;

        // 2. ブロードキャストグループに追加
        self.pusher.join(connection_id, room_id).await;

        // 3. Registry エントリを取得・作成（初回は定義ストアからハイドレーション）
        let state = self.registry.get_or_create(room_id).await;

        // 4. ロール調停: メンターが未設定、または設定済みでもその接続が
        //    既に切断されている場合、参加者がメンターになる
        let role = match &state.mentor {
            Some(mentor) if self.pusher.is_live(mentor).await => Role::Student,
            _ => {
                self.registry
                    .set_mentor(room_id, connection_id.clone())
                    .await;
                tracing::info!(
                    "Connection '{}' assigned mentor role in room '{}'",
                    connection_id.as_str(),
                    room_id.as_str()
                );
                Role::Mentor
            }
        };

        // 5. 学生数 = グループサイズ - (メンターがいれば 1)
        let members = self.pusher.room_size(room_id).await;
        let mentor_assigned = self.registry.mentor(room_id).await.is_some();
        let count = student_count(members, mentor_assigned);

        JoinOutcome {
            role,
            current_code: state.current_code,
            student_count: count,
            chat_log: state.chat_log,
        }
    }
}
