//! UseCase: コード更新処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - UpdateCodeUseCase::execute() メソッド
//! - last-writer-wins のコード上書きと解答一致判定、ルーム全体への配信
//!
//! ### なぜこのテストが必要か
//! - 不変条件の検証：全メンバーに見える currentCode は常にサーバーが
//!   最後に受理した値（最後の codeUpdated 配信 = 最終状態）
//! - 一致判定が更新のたびに再評価されることを保証（初回遷移のみではない）
//!
//! ### どのような状況を想定しているか
//! - 正常系：上書きと一致/不一致の判定、codeUpdated → solutionMatched の順序
//! - エッジケース：同一ペイロードの連続送信、未知のルームへの更新

use std::sync::Arc;

use crate::domain::{RoomId, RoomPusher, SessionRegistry, codes_match};

/// Result of a code update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateOutcome {
    /// Whether the new code matches the reference solution. The match
    /// signal fires on every matching update, not just the first.
    pub matched: bool,
}

/// コード更新のユースケース
///
/// 送信元のロールは確認しない：メンターが編集しないのはクライアント UI の
/// 規約であり、サーバーは呼び出し元を信頼する。
pub struct UpdateCodeUseCase {
    /// Registry（セッション状態の抽象化）
    registry: Arc<dyn SessionRegistry>,
    /// RoomPusher（pub/sub とメッセージ通知の抽象化）
    pusher: Arc<dyn RoomPusher>,
}

impl UpdateCodeUseCase {
    /// 新しい UpdateCodeUseCase を作成
    pub fn new(registry: Arc<dyn SessionRegistry>, pusher: Arc<dyn RoomPusher>) -> Self {
        Self { registry, pusher }
    }

    /// コード更新を実行
    ///
    /// `current_code` を無条件に上書きし（last-writer-wins）、呼び出し元が
    /// シリアライズ済みの `codeUpdated` / `solutionMatched` ペイロードを
    /// ルーム全体へ配信する。上書きと配信はルーム操作ロック下で行われ、
    /// 最後に配信された `codeUpdated` が常に最終状態のコードと一致する。
    pub async fn execute(
        &self,
        room_id: &RoomId,
        new_code: &str,
        code_updated_json: String,
        solution_matched_json: String,
    ) -> UpdateOutcome {
        let _guard = self.registry.lock_room(room_id).await;

        let solution = self
            .registry
            .set_current_code(room_id, new_code.to_string())
            .await;

        if let Err(e) = self.pusher.publish(room_id, &code_updated_json).await {
            tracing::warn!(
                "Failed to publish code update to room '{}': {}",
                room_id.as_str(),
                e
            );
        }

        let matched = codes_match(new_code, &solution);
        if matched {
            tracing::info!("Solution matched in room '{}'", room_id.as_str());
            if let Err(e) = self.pusher.publish(room_id, &solution_matched_json).await {
                tracing::warn!(
                    "Failed to publish solution match to room '{}': {}",
                    room_id.as_str(),
                    e
                );
            }
        }

        UpdateOutcome { matched }
    }
}
