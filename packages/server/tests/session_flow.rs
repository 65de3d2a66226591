//! Integration tests for full pairing-session flows over the real
//! in-memory registry and pusher.
//!
//! Each test wires the in-memory infrastructure exactly as the server
//! binary does and drives the use cases directly, asserting on the JSON
//! each connection's push channel receives.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use codesync_server::{
    domain::{
        CodeBlock, CodeBlockStore, ConnectionId, Role, RoomId, RoomPusher, SessionRegistry,
        StoreError,
    },
    infrastructure::{
        InMemoryCodeBlockStore, InMemorySessionRegistry, WebSocketRoomPusher,
        dto::websocket::ServerEvent,
    },
    usecase::{
        DisconnectUseCase, JoinRoomUseCase, LeaveOutcome, LeaveRoomUseCase, SendMessageUseCase,
        UpdateCodeUseCase, UpdateOutcome,
    },
};
use codesync_shared::time::FixedClock;

/// The full stack wired the way `bin/server.rs` wires it.
struct TestStack {
    registry: Arc<InMemorySessionRegistry>,
    pusher: Arc<WebSocketRoomPusher>,
    join_room: Arc<JoinRoomUseCase>,
    update_code: Arc<UpdateCodeUseCase>,
    send_message: Arc<SendMessageUseCase>,
    leave_room: Arc<LeaveRoomUseCase>,
    disconnect: Arc<DisconnectUseCase>,
}

impl TestStack {
    fn new() -> Self {
        Self::with_store(Arc::new(InMemoryCodeBlockStore::seeded()))
    }

    fn with_store(store: Arc<dyn CodeBlockStore>) -> Self {
        let registry = Arc::new(InMemorySessionRegistry::new(store));
        let pusher = Arc::new(WebSocketRoomPusher::new());

        let join_room = Arc::new(JoinRoomUseCase::new(registry.clone(), pusher.clone()));
        let update_code = Arc::new(UpdateCodeUseCase::new(registry.clone(), pusher.clone()));
        let send_message = Arc::new(SendMessageUseCase::new(
            registry.clone(),
            Arc::new(FixedClock::new(1_700_000_000_000)),
        ));
        let leave_room = Arc::new(LeaveRoomUseCase::new(registry.clone(), pusher.clone()));
        let disconnect = Arc::new(DisconnectUseCase::new(leave_room.clone(), pusher.clone()));

        Self {
            registry,
            pusher,
            join_room,
            update_code,
            send_message,
            leave_room,
            disconnect,
        }
    }

    /// Register a connection and hand back the receiver its pushes land on.
    async fn connect(&self, id: &str) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let connection_id = ConnectionId::new(id.to_string()).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        self.pusher.register_client(connection_id.clone(), tx).await;
        (connection_id, rx)
    }

    /// Drive a code update the way the WebSocket handler does: serialize
    /// the broadcast payloads, then let the usecase overwrite and publish.
    async fn push_code(&self, room_id: &RoomId, new_code: &str) -> UpdateOutcome {
        let code_updated_json = serde_json::to_string(&ServerEvent::CodeUpdated {
            new_code: new_code.to_string(),
        })
        .unwrap();
        let solution_matched_json = serde_json::to_string(&ServerEvent::SolutionMatched).unwrap();
        self.update_code
            .execute(room_id, new_code, code_updated_json, solution_matched_json)
            .await
    }
}

/// Store wrapper whose reads give the scheduler a chance to interleave
/// tasks, the way a real database read would.
struct SlowStore {
    inner: InMemoryCodeBlockStore,
}

#[async_trait]
impl CodeBlockStore for SlowStore {
    async fn find_by_id(&self, id: &RoomId) -> Result<Option<CodeBlock>, StoreError> {
        tokio::task::yield_now().await;
        self.inner.find_by_id(id).await
    }

    async fn list(&self) -> Result<Vec<CodeBlock>, StoreError> {
        self.inner.list().await
    }
}

fn room(id: &str) -> RoomId {
    RoomId::new(id.to_string()).unwrap()
}

/// Drain everything currently buffered on a receiver.
fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
    let mut out = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        out.push(msg);
    }
    out
}

#[tokio::test]
async fn test_first_join_becomes_mentor_second_becomes_student() {
    // テスト項目: 最初の参加者がメンター、2人目が生徒になる
    // given (前提条件): 空のルーム
    let stack = TestStack::new();
    let room_id = room("async-case");
    let (mentor, _mentor_rx) = stack.connect("mentor-1").await;
    let (student, _student_rx) = stack.connect("student-1").await;

    // when (操作): 2つの接続が順に参加する
    let first = stack.join_room.execute(&mentor, &room_id).await;
    let second = stack.join_room.execute(&student, &room_id).await;

    // then (期待する結果): 役割と生徒数が正しい
    assert_eq!(first.role, Role::Mentor);
    assert_eq!(first.student_count, 0);
    assert_eq!(second.role, Role::Student);
    assert_eq!(second.student_count, 1);
}

#[tokio::test]
async fn test_join_snapshot_carries_starter_code_and_chat_log() {
    // テスト項目: 参加スナップショットに現在コードとチャット履歴が含まれる
    // given (前提条件): メンターがコードを編集しチャットを送信済み
    let stack = TestStack::new();
    let room_id = room("promises");
    let (mentor, _mentor_rx) = stack.connect("mentor-1").await;
    stack.join_room.execute(&mentor, &room_id).await;
    stack.push_code(&room_id, "const p = fetch(url);").await;
    stack
        .send_message
        .execute(mentor.clone(), &room_id, "start here".to_string())
        .await;

    // when (操作): 生徒が後から参加する
    let (student, _student_rx) = stack.connect("student-1").await;
    let outcome = stack.join_room.execute(&student, &room_id).await;

    // then (期待する結果): 編集後のコードと履歴1件が見える
    assert_eq!(outcome.current_code, "const p = fetch(url);");
    assert_eq!(outcome.chat_log.len(), 1);
    assert_eq!(outcome.chat_log[0].text, "start here");
}

#[tokio::test]
async fn test_code_update_matches_solution_with_formatting_differences() {
    // テスト項目: 空白やクォートが違ってもソリューション一致を検出する
    // given (前提条件): メンターと生徒が参加済みのルーム
    let stack = TestStack::new();
    let room_id = room("async-case");
    let (mentor, _mentor_rx) = stack.connect("mentor-1").await;
    stack.join_room.execute(&mentor, &room_id).await;
    let state = stack.registry.get_or_create(&room_id).await;
    let solution = state.reference_solution.clone();

    // when (操作): ソリューションを空白だけ変えて送る
    let reformatted = format!("  {}  ", solution);
    let outcome = stack.push_code(&room_id, &reformatted).await;

    // then (期待する結果): 一致と判定される
    assert!(outcome.matched);
}

#[tokio::test]
async fn test_match_refires_and_clears_on_divergence() {
    // テスト項目: 一致は更新のたびに再判定され、逸脱すると消える
    // given (前提条件): ソリューションと一致済みのルーム
    let stack = TestStack::new();
    let room_id = room("async-case");
    let (mentor, _mentor_rx) = stack.connect("mentor-1").await;
    stack.join_room.execute(&mentor, &room_id).await;
    let solution = stack
        .registry
        .get_or_create(&room_id)
        .await
        .reference_solution
        .clone();
    assert!(stack.push_code(&room_id, &solution).await.matched);

    // when (操作): 逸脱した後、再び一致させる
    let diverged = stack.push_code(&room_id, "let x = 1;").await;
    let rematched = stack.push_code(&room_id, &solution).await;

    // then (期待する結果): 逸脱は不一致、再送は再び一致する
    assert!(!diverged.matched);
    assert!(rematched.matched);
}

#[tokio::test]
async fn test_chat_message_is_published_to_all_members_including_sender() {
    // テスト項目: チャットは送信者を含む全メンバーへ配信される
    // given (前提条件): メンターと生徒が同じルームにいる
    let stack = TestStack::new();
    let room_id = room("callbacks");
    let (mentor, mut mentor_rx) = stack.connect("mentor-1").await;
    let (student, mut student_rx) = stack.connect("student-1").await;
    stack.join_room.execute(&mentor, &room_id).await;
    stack.join_room.execute(&student, &room_id).await;
    drain(&mut mentor_rx);
    drain(&mut student_rx);

    // when (操作): 生徒がメッセージを送り、ハンドラと同じ経路で配信する
    let message = stack
        .send_message
        .execute(student.clone(), &room_id, "done?".to_string())
        .await;
    let payload = serde_json::to_string(&ServerEvent::NewMessage(message.into())).unwrap();
    stack.pusher.publish(&room_id, &payload).await.unwrap();

    // then (期待する結果): 両方の接続が同じペイロードを受け取る
    assert_eq!(drain(&mut mentor_rx), vec![payload.clone()]);
    assert_eq!(drain(&mut student_rx), vec![payload]);
}

#[tokio::test]
async fn test_mentor_disconnect_resets_room_and_next_join_is_promoted() {
    // テスト項目: メンター切断でルームが初期化され、次の参加者がメンターになる
    // given (前提条件): メンターと生徒が参加し、コードが編集済み
    let stack = TestStack::new();
    let room_id = room("closures");
    let (mentor, _mentor_rx) = stack.connect("mentor-1").await;
    let (student, _student_rx) = stack.connect("student-1").await;
    stack.join_room.execute(&mentor, &room_id).await;
    stack.join_room.execute(&student, &room_id).await;
    stack.push_code(&room_id, "scribbles").await;

    // when (操作): メンターの接続が切れる
    let outcomes = stack.disconnect.execute(&mentor).await;

    // then (期待する結果): mentorLeft が報告され、状態がスターターに戻り、
    // 残った生徒が再参加するとメンターへ昇格する
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].0, room_id);
    assert!(matches!(outcomes[0].1, LeaveOutcome::MentorLeft));

    let state = stack.registry.get_or_create(&room_id).await;
    assert!(state.mentor.is_none());
    assert_ne!(state.current_code, "scribbles");
    assert!(state.chat_log.is_empty());

    let rejoined = stack.join_room.execute(&student, &room_id).await;
    assert_eq!(rejoined.role, Role::Mentor);
}

#[tokio::test]
async fn test_stale_mentor_slot_is_reclaimed_by_next_joiner() {
    // テスト項目: 登録が消えたメンター枠は次の参加者が引き継ぐ
    // given (前提条件): メンターが退出処理を経ずに登録だけ消えている
    let stack = TestStack::new();
    let room_id = room("async-case");
    let (mentor, _mentor_rx) = stack.connect("mentor-1").await;
    stack.join_room.execute(&mentor, &room_id).await;
    stack.pusher.unregister_client(&mentor).await;

    // when (操作): 新しい接続が参加する
    let (newcomer, _newcomer_rx) = stack.connect("mentor-2").await;
    let outcome = stack.join_room.execute(&newcomer, &room_id).await;

    // then (期待する結果): 新しい接続がメンターになる
    assert_eq!(outcome.role, Role::Mentor);
    assert_eq!(stack.registry.mentor(&room_id).await, Some(newcomer));
}

#[tokio::test]
async fn test_student_leave_reports_remaining_count() {
    // テスト項目: 生徒の退出で残り生徒数が報告される
    // given (前提条件): メンター1人と生徒2人のルーム
    let stack = TestStack::new();
    let room_id = room("promises");
    let (mentor, _mentor_rx) = stack.connect("mentor-1").await;
    let (student_a, _a_rx) = stack.connect("student-a").await;
    let (student_b, _b_rx) = stack.connect("student-b").await;
    stack.join_room.execute(&mentor, &room_id).await;
    stack.join_room.execute(&student_a, &room_id).await;
    stack.join_room.execute(&student_b, &room_id).await;

    // when (操作): 生徒が1人明示的に退出する
    let outcome = stack.leave_room.execute(&student_a, &room_id).await;

    // then (期待する結果): 残り生徒数1が報告され、メンターは変わらない
    assert_eq!(outcome, LeaveOutcome::StudentLeft { student_count: 1 });
    assert_eq!(stack.registry.mentor(&room_id).await, Some(mentor));
}

#[tokio::test]
async fn test_disconnect_covers_every_joined_room() {
    // テスト項目: 切断処理は参加中の全ルームを退出させる
    // given (前提条件): 1つの接続が2つのルームに参加している
    let stack = TestStack::new();
    let room_a = room("async-case");
    let room_b = room("promises");
    let (conn, _rx) = stack.connect("roamer").await;
    stack.join_room.execute(&conn, &room_a).await;
    stack.join_room.execute(&conn, &room_b).await;

    // when (操作): 接続が切れる
    let outcomes = stack.disconnect.execute(&conn).await;

    // then (期待する結果): 両ルームから退出し、登録も消える
    assert_eq!(outcomes.len(), 2);
    assert!(!stack.pusher.is_live(&conn).await);
    assert!(stack.pusher.rooms_of(&conn).await.is_empty());
}

#[tokio::test]
async fn test_concurrent_joins_assign_exactly_one_mentor() {
    // テスト項目: 同一ルームへの同時参加でもメンターは高々 1 人
    // given (前提条件): ストア読込中にタスクが交錯し得る環境で 2 つの接続を用意する
    let stack = TestStack::with_store(Arc::new(SlowStore {
        inner: InMemoryCodeBlockStore::seeded(),
    }));
    let room_id = room("async-case");
    let (first, _first_rx) = stack.connect("racer-1").await;
    let (second, _second_rx) = stack.connect("racer-2").await;

    // when (操作): 2 つの join を同時に実行する
    let (outcome_a, outcome_b) = tokio::join!(
        stack.join_room.execute(&first, &room_id),
        stack.join_room.execute(&second, &room_id),
    );

    // then (期待する結果): どちらか一方だけがメンターになる
    let mentors = [outcome_a.role, outcome_b.role]
        .iter()
        .filter(|role| **role == Role::Mentor)
        .count();
    assert_eq!(mentors, 1);
    assert!(stack.registry.mentor(&room_id).await.is_some());
}

#[tokio::test]
async fn test_concurrent_updates_last_broadcast_carries_terminal_code() {
    // テスト項目: 更新が競合しても最後の codeUpdated 配信は最終状態のコードを運ぶ
    // given (前提条件): 購読中のメンバーが 1 人いるルーム
    let stack = TestStack::with_store(Arc::new(SlowStore {
        inner: InMemoryCodeBlockStore::seeded(),
    }));
    let room_id = room("promises");
    let (member, mut member_rx) = stack.connect("watcher").await;
    stack.join_room.execute(&member, &room_id).await;
    drain(&mut member_rx);

    // when (操作): 2 つの更新を同時に実行する
    tokio::join!(
        stack.push_code(&room_id, "version one"),
        stack.push_code(&room_id, "version two"),
    );

    // then (期待する結果): 最後に配信された newCode が registry の最終状態と一致する
    let broadcasts = drain(&mut member_rx);
    assert_eq!(broadcasts.len(), 2);
    let last: ServerEvent = serde_json::from_str(broadcasts.last().unwrap()).unwrap();
    let terminal = stack.registry.get_or_create(&room_id).await.current_code;
    assert_eq!(last, ServerEvent::CodeUpdated { new_code: terminal });
}

#[tokio::test]
async fn test_unknown_room_degrades_to_empty_state() {
    // テスト項目: 未定義ルームでも空状態で参加できる
    // given (前提条件): ストアに存在しないルームID
    let stack = TestStack::new();
    let room_id = room("no-such-exercise");
    let (conn, _rx) = stack.connect("mentor-1").await;

    // when (操作): 参加してからコードを送る
    let joined = stack.join_room.execute(&conn, &room_id).await;
    let outcome = stack.push_code(&room_id, "anything").await;

    // then (期待する結果): 空コードで参加でき、一致は発生しない
    assert_eq!(joined.role, Role::Mentor);
    assert_eq!(joined.current_code, "");
    assert!(!outcome.matched);
}
