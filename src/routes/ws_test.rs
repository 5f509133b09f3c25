use super::*;
use crate::message::DEFAULT_GREETING;
use crate::routes::app;
use crate::state::test_helpers;
use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::time::{Duration, timeout};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;

type Client = tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

async fn spawn_server(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = app(state, None);
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("ws://{addr}/api/chat/ws")
}

async fn connect(url: &str) -> Client {
    let (client, _) = connect_async(url).await.unwrap();
    client
}

async fn next_snapshot(client: &mut Client) -> Value {
    loop {
        let msg = timeout(Duration::from_secs(2), client.next())
            .await
            .expect("snapshot receive timed out")
            .expect("socket closed")
            .expect("socket error");
        if let WsMessage::Text(text) = msg {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

/// Read snapshots until one satisfies `pred`; intermediate states may coalesce.
async fn snapshot_matching(client: &mut Client, pred: impl Fn(&Value) -> bool) -> Value {
    loop {
        let snapshot = next_snapshot(client).await;
        if pred(&snapshot) {
            return snapshot;
        }
    }
}

async fn send_command(client: &mut Client, command: Value) {
    client.send(WsMessage::Text(command.to_string().into())).await.unwrap();
}

fn message_count(snapshot: &Value) -> usize {
    snapshot["messages"].as_array().map_or(0, Vec::len)
}

#[tokio::test]
async fn connect_pushes_current_snapshot() {
    let url = spawn_server(test_helpers::test_app_state()).await;
    let mut client = connect(&url).await;

    let snapshot = next_snapshot(&mut client).await;
    assert_eq!(snapshot["busy"], false);
    assert_eq!(message_count(&snapshot), 1);
    assert_eq!(snapshot["messages"][0]["text"], DEFAULT_GREETING);
}

#[tokio::test]
async fn send_command_streams_settled_reply() {
    let url = spawn_server(test_helpers::test_app_state()).await;
    let mut client = connect(&url).await;
    next_snapshot(&mut client).await;

    send_command(&mut client, json!({ "op": "send", "text": "Hello" })).await;
    let settled = snapshot_matching(&mut client, |s| s["busy"] == false && message_count(s) == 3).await;
    assert_eq!(settled["messages"][1]["text"], "Hello");
    assert_eq!(settled["messages"][1]["author"], "user");
    assert_eq!(settled["messages"][2]["text"], "echo: Hello");
    assert_eq!(settled["messages"][2]["pending"], false);
}

#[tokio::test]
async fn clear_command_resets_transcript() {
    let state = test_helpers::test_app_state();
    state.session.send_message("before").await;
    let url = spawn_server(state).await;
    let mut client = connect(&url).await;
    assert_eq!(message_count(&next_snapshot(&mut client).await), 3);

    send_command(&mut client, json!({ "op": "clear" })).await;
    let cleared = snapshot_matching(&mut client, |s| message_count(s) == 1).await;
    assert_eq!(cleared["messages"][0]["text"], DEFAULT_GREETING);
}

#[tokio::test]
async fn changes_from_rest_reach_socket_clients() {
    let state = test_helpers::test_app_state();
    let url = spawn_server(state.clone()).await;
    let mut client = connect(&url).await;
    next_snapshot(&mut client).await;

    state.session.send_message("via rest").await;
    let settled = snapshot_matching(&mut client, |s| message_count(s) == 3 && s["busy"] == false).await;
    assert_eq!(settled["messages"][2]["text"], "echo: via rest");
}

#[tokio::test]
async fn unknown_command_is_ignored() {
    let url = spawn_server(test_helpers::test_app_state()).await;
    let mut client = connect(&url).await;
    next_snapshot(&mut client).await;

    send_command(&mut client, json!({ "op": "dance" })).await;
    send_command(&mut client, json!({ "op": "send", "text": "still works" })).await;
    let settled = snapshot_matching(&mut client, |s| message_count(s) == 3 && s["busy"] == false).await;
    assert_eq!(settled["messages"][1]["text"], "still works");
}

#[test]
fn command_parsing() {
    let send: WsCommand = serde_json::from_str(r#"{"op":"send","text":"hi"}"#).unwrap();
    assert!(matches!(send, WsCommand::Send { ref text } if text == "hi"));
    let clear: WsCommand = serde_json::from_str(r#"{"op":"clear"}"#).unwrap();
    assert!(matches!(clear, WsCommand::Clear));
    assert!(serde_json::from_str::<WsCommand>(r#"{"op":"send"}"#).is_err());
}
