use chat_relay::core::connection::Connection;
use chat_relay::core::message::{ChatMessage, ServerEvent};
use chat_relay::core::registry::RoomRegistry;

use tokio::sync::mpsc;
use warp::ws::Message as WsMessage;

// Build a registered-style connection backed by a bare channel, so the
// registry can be exercised without a live socket
fn test_connection(id: &str) -> (Connection, mpsc::UnboundedReceiver<WsMessage>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Connection::with_id(id.to_string(), None, tx), rx)
}

fn message(user: &str, text: &str, room: &str, time: &str) -> ChatMessage {
    ChatMessage {
        user: user.to_string(),
        text: text.to_string(),
        room: room.to_string(),
        time: time.to_string(),
    }
}

// Drain the next frame from a fake socket and decode the chat payload
fn next_message(rx: &mut mpsc::UnboundedReceiver<WsMessage>) -> Option<ChatMessage> {
    let frame = rx.try_recv().ok()?;
    let event: ServerEvent = serde_json::from_str(frame.to_str().unwrap()).unwrap();
    match event {
        ServerEvent::ReceiveMessage(msg) => Some(msg),
        other => panic!("Expected receiveMessage event, got {:?}", other),
    }
}

#[tokio::test]
async fn test_member_receives_broadcasts_until_disconnect() {
    let registry = RoomRegistry::new();
    let (conn, mut rx) = test_connection("c1");
    registry.register(conn).await;
    registry.join("c1", "general").await;

    registry.broadcast(&message("alice", "first", "general", "t1")).await;
    assert_eq!(next_message(&mut rx).unwrap().text, "first");

    registry.leave_all("c1").await;

    registry.broadcast(&message("alice", "second", "general", "t2")).await;
    assert!(next_message(&mut rx).is_none());
}

#[tokio::test]
async fn test_sender_also_receives_its_own_message() {
    let registry = RoomRegistry::new();
    let (a, mut a_rx) = test_connection("a");
    let (b, mut b_rx) = test_connection("b");
    registry.register(a).await;
    registry.register(b).await;
    registry.join("a", "general").await;
    registry.join("b", "general").await;

    let sent = registry
        .broadcast(&message("alice", "hi", "general", "t1"))
        .await;
    assert_eq!(sent, 2);

    // No self-exclusion: the sender gets its own message back
    let to_a = next_message(&mut a_rx).unwrap();
    let to_b = next_message(&mut b_rx).unwrap();
    assert_eq!(to_a.text, "hi");
    assert_eq!(to_b.text, "hi");
    assert_eq!(to_a.user, "alice");
    assert_eq!(to_a.time, "t1");

    // B disconnects; only A receives the next message
    registry.leave_all("b").await;
    let sent = registry
        .broadcast(&message("alice", "anyone?", "general", "t2"))
        .await;
    assert_eq!(sent, 1);
    assert_eq!(next_message(&mut a_rx).unwrap().text, "anyone?");
    assert!(next_message(&mut b_rx).is_none());
}

#[tokio::test]
async fn test_join_is_idempotent() {
    let registry = RoomRegistry::new();
    let (conn, mut rx) = test_connection("c1");
    registry.register(conn).await;

    registry.join("c1", "general").await;
    registry.join("c1", "general").await;

    assert_eq!(registry.room_members("general").await.len(), 1);

    // One delivery per broadcast, not two
    let sent = registry
        .broadcast(&message("alice", "hi", "general", "t1"))
        .await;
    assert_eq!(sent, 1);
    assert!(next_message(&mut rx).is_some());
    assert!(next_message(&mut rx).is_none());
}

#[tokio::test]
async fn test_broadcast_to_ghost_room_is_a_silent_noop() {
    let registry = RoomRegistry::new();
    let (conn, mut rx) = test_connection("c1");
    registry.register(conn).await;
    registry.join("c1", "general").await;

    let sent = registry
        .broadcast(&message("carol", "echo?", "ghost", "t1"))
        .await;
    assert_eq!(sent, 0);
    assert!(next_message(&mut rx).is_none());
}

#[tokio::test]
async fn test_per_room_delivery_order_is_preserved() {
    let registry = RoomRegistry::new();
    let (a, mut a_rx) = test_connection("a");
    let (b, mut b_rx) = test_connection("b");
    registry.register(a).await;
    registry.register(b).await;
    registry.join("a", "general").await;
    registry.join("b", "general").await;

    registry.broadcast(&message("alice", "M1", "general", "t1")).await;
    registry.broadcast(&message("alice", "M2", "general", "t2")).await;

    for rx in [&mut a_rx, &mut b_rx] {
        assert_eq!(next_message(rx).unwrap().text, "M1");
        assert_eq!(next_message(rx).unwrap().text, "M2");
    }
}

#[tokio::test]
async fn test_rooms_are_isolated() {
    let registry = RoomRegistry::new();
    let (d, mut d_rx) = test_connection("d");
    let (e, mut e_rx) = test_connection("e");
    registry.register(d).await;
    registry.register(e).await;

    // D is in both rooms, E only in r2
    registry.join("d", "r1").await;
    registry.join("d", "r2").await;
    registry.join("e", "r2").await;

    let sent = registry.broadcast(&message("dave", "to r1", "r1", "t1")).await;
    assert_eq!(sent, 1);
    assert_eq!(next_message(&mut d_rx).unwrap().room, "r1");
    assert!(next_message(&mut d_rx).is_none());
    assert!(next_message(&mut e_rx).is_none());

    let sent = registry.broadcast(&message("dave", "to r2", "r2", "t2")).await;
    assert_eq!(sent, 2);
    assert_eq!(next_message(&mut d_rx).unwrap().room, "r2");
    assert_eq!(next_message(&mut e_rx).unwrap().room, "r2");
}

#[tokio::test]
async fn test_leave_all_covers_every_joined_room() {
    let registry = RoomRegistry::new();
    let (conn, mut rx) = test_connection("c1");
    registry.register(conn).await;

    registry.join("c1", "r1").await;
    registry.join("c1", "r2").await;
    registry.join("c1", "r3").await;
    assert_eq!(registry.client_rooms("c1").await.len(), 3);

    registry.leave_all("c1").await;
    assert!(registry.client_rooms("c1").await.is_empty());
    assert_eq!(registry.room_count().await, 0);

    for room in ["r1", "r2", "r3"] {
        registry.broadcast(&message("x", "gone", room, "t")).await;
    }
    assert!(next_message(&mut rx).is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overlapping_broadcasts_reach_all_members_in_one_order() {
    let registry = std::sync::Arc::new(RoomRegistry::new());
    let (a, mut a_rx) = test_connection("a");
    let (b, mut b_rx) = test_connection("b");
    registry.register(a).await;
    registry.register(b).await;
    registry.join("a", "general").await;
    registry.join("b", "general").await;

    // Fire broadcasts from concurrent tasks; fan-out is serialized, so
    // every member must observe the same sequence
    let mut handles = vec![];
    for i in 0..20 {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move {
            registry
                .broadcast(&message("alice", &format!("m{}", i), "general", "t"))
                .await;
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let mut seen_by_a = Vec::new();
    while let Some(msg) = next_message(&mut a_rx) {
        seen_by_a.push(msg.text);
    }
    let mut seen_by_b = Vec::new();
    while let Some(msg) = next_message(&mut b_rx) {
        seen_by_b.push(msg.text);
    }

    assert_eq!(seen_by_a.len(), 20);
    assert_eq!(seen_by_a, seen_by_b);
}

#[tokio::test]
async fn test_message_fields_pass_through_unvalidated() {
    let registry = RoomRegistry::new();
    let (conn, mut rx) = test_connection("c1");
    registry.register(conn).await;
    registry.join("c1", "general").await;

    // Empty text, missing user, malformed timestamp: all forwarded as-is
    let odd = message("", "", "general", "not-a-timestamp");
    registry.broadcast(&odd).await;

    let received = next_message(&mut rx).unwrap();
    assert_eq!(received, odd);
}
