//! UseCase: チャットメッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - メッセージのタイムスタンプ付与と履歴への追記
//!
//! ### なぜこのテストが必要か
//! - チャット履歴が到着順に保たれることを保証
//! - タイムスタンプが受信時刻で付与されることを確認（Clock 注入で検証）
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージの追記と全員（送信者含む）への配信データ生成
//! - エッジケース：まだ誰も参加していないルームへの送信

use std::sync::Arc;

use codesync_shared::time::Clock;

use crate::domain::{ChatMessage, ConnectionId, RoomId, SessionRegistry, Timestamp};

/// チャットメッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Registry（セッション状態の抽象化）
    registry: Arc<dyn SessionRegistry>,
    /// Clock（受信時刻の取得、テスト時は固定時刻に差し替え）
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(registry: Arc<dyn SessionRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self { registry, clock }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `from` - 送信元接続の ID
    /// * `room_id` - 送信先ルームの ID
    /// * `text` - メッセージ本文
    ///
    /// # Returns
    ///
    /// 履歴に追記されたメッセージ（送信者を含む全メンバーへの配信用）
    pub async fn execute(&self, from: ConnectionId, room_id: &RoomId, text: String) -> ChatMessage {
        let message = ChatMessage::new(from, text, Timestamp::new(self.clock.now_millis()));
        self.registry.append_message(room_id, message.clone()).await;
        message
    }
}
