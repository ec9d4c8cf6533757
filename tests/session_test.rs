use std::sync::Arc;

use tophits::{
    management::{ManualClock, MemorySessionStore, SessionStore},
    types::SessionData,
};

const NOW: f64 = 1_700_000_000.0;

fn pending(state: &str) -> SessionData {
    SessionData {
        token: None,
        oauth_state: Some(state.to_string()),
    }
}

fn store(idle_secs: u64) -> (MemorySessionStore, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(NOW));
    (MemorySessionStore::new(clock.clone(), idle_secs), clock)
}

#[tokio::test]
async fn test_set_get_remove() {
    let (sessions, _clock) = store(60);

    sessions.set("s1", pending("x")).await;
    assert_eq!(sessions.get("s1").await, Some(pending("x")));

    sessions.remove("s1").await;
    assert_eq!(sessions.get("s1").await, None);
    assert!(sessions.is_empty().await);
}

#[tokio::test]
async fn test_idle_session_is_gone() {
    let (sessions, clock) = store(60);
    sessions.set("s1", pending("x")).await;

    clock.advance(60.0);
    assert!(sessions.get("s1").await.is_some());

    clock.advance(61.0);
    assert_eq!(sessions.get("s1").await, None);
    assert!(sessions.is_empty().await);
}

#[tokio::test]
async fn test_get_keeps_session_alive() {
    let (sessions, clock) = store(60);
    sessions.set("s1", pending("x")).await;

    for _ in 0..5 {
        clock.advance(45.0);
        assert!(sessions.get("s1").await.is_some());
    }
}

#[tokio::test]
async fn test_set_prunes_idle_sessions() {
    let (sessions, clock) = store(60);
    for id in ["abandoned-1", "abandoned-2", "abandoned-3"] {
        sessions.set(id, pending(id)).await;
    }
    assert_eq!(sessions.len().await, 3);

    clock.advance(120.0);
    sessions.set("fresh", pending("fresh")).await;

    assert_eq!(sessions.len().await, 1);
    assert!(sessions.get("fresh").await.is_some());
}
