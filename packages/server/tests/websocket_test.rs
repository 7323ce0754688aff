//! End-to-end tests: an in-process server driven by WebSocket and HTTP clients.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use chrono::TimeDelta;
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tandem_server::{
    domain::{GenderTag, UserId},
    infrastructure::{
        identity::{JwtIdentityVerifier, default_token_ttl},
        message_pusher::WebSocketMessagePusher,
        repository::InMemorySessionStore,
    },
    ui::Server,
    usecase::{Coordinator, CoordinatorConfig},
};
use tandem_shared::time::SystemClock;
use tokio::{net::TcpStream, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

const SECRET: &str = "integration-secret";
const RECV_TIMEOUT: Duration = Duration::from_secs(5);
const SILENCE: Duration = Duration::from_millis(300);

/// Helper struct to manage the in-process server lifecycle
struct TestServer {
    addr: SocketAddr,
    verifier: Arc<JwtIdentityVerifier>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server on an ephemeral port
    async fn start() -> Self {
        let verifier = Arc::new(JwtIdentityVerifier::new(SECRET));
        let coordinator = Arc::new(Coordinator::new(
            Arc::new(InMemorySessionStore::new()),
            Arc::new(WebSocketMessagePusher::new()),
            verifier.clone(),
            Arc::new(SystemClock),
            CoordinatorConfig::default(),
        ));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let handle = tokio::spawn(async move {
            let result = Server::new(coordinator)
                .serve(listener, std::future::pending())
                .await;
            if let Err(e) = result {
                eprintln!("test server stopped: {}", e);
            }
        });

        TestServer {
            addr,
            verifier,
            handle,
        }
    }

    fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    fn token(&self, user: u64, gender: GenderTag) -> String {
        self.verifier
            .sign(UserId::new(user), gender, default_token_ttl())
            .expect("Failed to sign token")
    }

    async fn debug_state(&self) -> Value {
        reqwest::get(self.http_url("/debug/state"))
            .await
            .expect("debug request failed")
            .json()
            .await
            .expect("debug body is not JSON")
    }

    /// Connect a client and authenticate it as `user`
    async fn login(&self, user: u64, gender: GenderTag) -> TestClient {
        let mut client = TestClient::connect(&self.ws_url()).await;
        client
            .send(json!({"event": "authenticate", "data": self.token(user, gender)}))
            .await;
        let ack = client.recv_event("authenticated").await;
        assert_eq!(ack["data"]["userId"], user);
        client
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Helper struct wrapping one WebSocket connection
struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    async fn connect(url: &str) -> Self {
        let (stream, _) = connect_async(url).await.expect("Failed to connect");
        TestClient { stream }
    }

    async fn send(&mut self, frame: Value) {
        self.send_raw(&frame.to_string()).await;
    }

    async fn send_raw(&mut self, text: &str) {
        self.stream
            .send(Message::Text(text.to_string().into()))
            .await
            .expect("Failed to send frame");
    }

    /// Next text frame as JSON
    async fn recv(&mut self) -> Value {
        loop {
            let msg = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("Timed out waiting for a frame")
                .expect("Connection closed")
                .expect("WebSocket error");
            if let Message::Text(text) = msg {
                return serde_json::from_str(text.as_str()).expect("Frame is not JSON");
            }
        }
    }

    /// Next frame, which must be the named event
    async fn recv_event(&mut self, name: &str) -> Value {
        let frame = self.recv().await;
        assert_eq!(frame["event"], name, "unexpected frame: {frame}");
        frame
    }

    /// Assert nothing arrives for a short while
    async fn assert_silent(&mut self) {
        if let Ok(Some(Ok(Message::Text(text)))) =
            tokio::time::timeout(SILENCE, self.stream.next()).await
        {
            panic!("expected no frame, got {}", text.as_str());
        }
    }

    async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}

/// Match U1 (A) with U2 (B) and put both in the resulting room
async fn matched_pair(server: &TestServer) -> (TestClient, TestClient, u64) {
    let mut u1 = server.login(1, GenderTag::A).await;
    let mut u2 = server.login(2, GenderTag::B).await;

    u1.send(json!({"event": "findMatch"})).await;
    u1.recv_event("waitingForMatch").await;
    u2.send(json!({"event": "findMatch"})).await;
    let session_id = u2.recv_event("matchFound").await["data"]["sessionId"]
        .as_u64()
        .expect("sessionId is not a number");
    u1.recv_event("matchFound").await;

    u1.send(json!({"event": "joinSession", "data": {"sessionId": session_id}}))
        .await;
    // sessionId may also arrive as a numeric string
    u2.send(json!({"event": "joinSession", "data": {"sessionId": session_id.to_string()}}))
        .await;
    let joined = u1.recv_event("userJoined").await;
    assert_eq!(joined["data"], json!({"userId": 2, "gender": "B"}));

    (u1, u2, session_id)
}

#[tokio::test]
async fn test_health_check() {
    // テスト項目: ヘルスチェックが成功する
    let server = TestServer::start().await;

    let body: Value = reqwest::get(server.http_url("/api/health"))
        .await
        .expect("health request failed")
        .json()
        .await
        .expect("health body is not JSON");

    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_match_pairs_opposite_users_into_one_session() {
    // テスト項目: 反対側のユーザー同士が一つのセッションにマッチする
    // given (前提条件):
    let server = TestServer::start().await;
    let mut u1 = server.login(1, GenderTag::A).await;
    let mut u2 = server.login(2, GenderTag::B).await;

    // when (操作): U1 が先に探す
    u1.send(json!({"event": "findMatch"})).await;
    u1.recv_event("waitingForMatch").await;

    // then (期待する結果): U1 が待ち行列に入る
    let state = server.debug_state().await;
    assert_eq!(state["waiting"]["A"], json!([1]));

    // when (操作): U2 が探す
    u2.send(json!({"event": "findMatch"})).await;

    // then (期待する結果): 二人に同じセッションが届き、待ち行列は空になる
    let found_u2 = u2.recv_event("matchFound").await;
    let found_u1 = u1.recv_event("matchFound").await;
    assert_eq!(found_u1["data"]["sessionId"], found_u2["data"]["sessionId"]);
    let state = server.debug_state().await;
    assert_eq!(state["waiting"], json!({"A": [], "B": []}));
}

#[tokio::test]
async fn test_cancel_match() {
    // テスト項目: マッチのキャンセル
    // given (前提条件):
    let server = TestServer::start().await;
    let mut u1 = server.login(1, GenderTag::A).await;
    u1.send(json!({"event": "findMatch"})).await;
    u1.recv_event("waitingForMatch").await;

    // when (操作):
    u1.send(json!({"event": "cancelMatch"})).await;

    // then (期待する結果):
    u1.recv_event("matchCancelled").await;
    let state = server.debug_state().await;
    assert_eq!(state["waiting"]["A"], json!([]));
}

#[tokio::test]
async fn test_chat_reaches_every_member_including_sender() {
    // テスト項目: チャットは送信者を含む全メンバーに届く
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut u1, mut u2, _) = matched_pair(&server).await;

    // when (操作):
    u1.send(json!({"event": "chatMessage", "data": "hi"})).await;

    // then (期待する結果):
    for client in [&mut u1, &mut u2] {
        let frame = client.recv_event("chatMessage").await;
        assert_eq!(frame["data"]["userId"], 1);
        assert_eq!(frame["data"]["content"], "hi");
        let timestamp = frame["data"]["timestamp"].as_str().expect("timestamp");
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }
}

#[tokio::test]
async fn test_draw_excludes_sender_and_music_includes_sender() {
    // テスト項目: 描画は送信者を除き、音楽操作は送信者を含めて届く
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut u1, mut u2, _) = matched_pair(&server).await;
    let stroke = json!({
        "x": 1.5, "y": 2.0, "color": "#000000", "size": 4.0, "eventType": "start",
        "pressure": 0.8, "strokeId": "s-1"
    });

    // when (操作): U1 が描画する
    u1.send(json!({"event": "draw", "data": stroke})).await;

    // then (期待する結果): U2 だけがストロークを受け取る
    let frame = u2.recv_event("draw").await;
    assert_eq!(frame["data"], stroke);
    u1.assert_silent().await;

    // when (操作): U2 が他人になりすまして再生を操作する
    u2.send(json!({"event": "musicControl", "data": {"action": "play", "userId": 99}}))
        .await;

    // then (期待する結果): 二人とも受け取り、送信者は U2 になっている
    for client in [&mut u1, &mut u2] {
        let frame = client.recv_event("musicControl").await;
        assert_eq!(frame["data"], json!({"userId": 2, "action": "play"}));
    }
}

#[tokio::test]
async fn test_disconnect_notifies_room() {
    // テスト項目: 切断が部屋のメンバーに通知される
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut u1, u2, session_id) = matched_pair(&server).await;

    // when (操作):
    u2.close().await;

    // then (期待する結果):
    let frame = u1.recv_event("userLeft").await;
    assert_eq!(frame["data"], json!({"userId": 2}));
    let state = server.debug_state().await;
    assert_eq!(state["rooms"], json!([{"sessionId": session_id, "members": 1}]));
}

#[tokio::test]
async fn test_malformed_frame_is_reported() {
    // テスト項目: 不正なフレームはエラーとして通知される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = TestClient::connect(&server.ws_url()).await;

    // when (操作):
    client.send_raw("{\"event\": \"teleport\"}").await;

    // then (期待する結果):
    let frame = client.recv_event("error").await;
    assert_eq!(frame["data"]["kind"], "validation");
}

#[tokio::test]
async fn test_expired_token_is_rejected_and_connection_stays_open() {
    // テスト項目: 期限切れのトークンは拒否されるが接続は維持される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = TestClient::connect(&server.ws_url()).await;
    let expired = server
        .verifier
        .sign(UserId::new(1), GenderTag::A, TimeDelta::hours(-1))
        .expect("Failed to sign token");

    // when (操作):
    client
        .send(json!({"event": "authenticate", "data": expired}))
        .await;

    // then (期待する結果): エラーが返り、同じソケットで有効なトークンは通る
    let frame = client.recv_event("error").await;
    assert_eq!(frame["data"]["kind"], "authentication");
    client
        .send(json!({"event": "authenticate", "data": server.token(1, GenderTag::A)}))
        .await;
    client.recv_event("authenticated").await;
}

#[tokio::test]
async fn test_out_of_order_actions_are_ignored_by_default() {
    // テスト項目: 既定では順序違反の操作は無視される
    // given (前提条件): 未認証の接続
    let server = TestServer::start().await;
    let mut client = TestClient::connect(&server.ws_url()).await;

    // when (操作):
    client.send(json!({"event": "findMatch"})).await;
    client.send(json!({"event": "chatMessage", "data": "hello?"})).await;

    // then (期待する結果):
    client.assert_silent().await;
    let state = server.debug_state().await;
    assert_eq!(state["connections"], 1);
    assert_eq!(state["authenticated"], 0);
}
