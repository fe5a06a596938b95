use std::time::Duration;

use placement_bot::{
    models::domain::{Answer, Session, SessionState},
    repositories::{InMemorySessionStore, SessionStore},
};

fn populated_session() -> Session {
    let mut session = Session::default();
    session.state = SessionState::Asking;
    session.section_index = 2;
    session.answers.push(Answer {
        question_id: "q1".to_string(),
        section: "Grammar".to_string(),
        selected_index: 1,
        correct_index: 1,
        is_correct: true,
        latency_ms: 850,
    });
    session
}

#[tokio::test]
async fn set_then_get_within_ttl_returns_an_equivalent_session() {
    let store = InMemorySessionStore::new();
    let session = populated_session();

    store
        .set("sender-1", &session, Duration::from_secs(30))
        .await
        .expect("set should work");

    let loaded = store.get("sender-1").await.expect("get should work");
    assert_eq!(loaded, Some(session));
}

#[tokio::test]
async fn get_after_ttl_elapses_returns_absent() {
    let store = InMemorySessionStore::new();

    store
        .set("sender-1", &populated_session(), Duration::from_millis(30))
        .await
        .expect("set should work");

    tokio::time::sleep(Duration::from_millis(60)).await;

    assert!(store.get("sender-1").await.expect("get").is_none());
}

#[tokio::test]
async fn re_setting_a_key_refreshes_both_value_and_ttl() {
    let store = InMemorySessionStore::new();

    store
        .set("sender-1", &populated_session(), Duration::from_millis(30))
        .await
        .expect("set should work");

    // Overwrite with a fresh baseline session and a longer TTL before the
    // first entry expires.
    let baseline = Session::default();
    store
        .set("sender-1", &baseline, Duration::from_secs(30))
        .await
        .expect("set should work");

    tokio::time::sleep(Duration::from_millis(60)).await;

    let loaded = store.get("sender-1").await.expect("get should work");
    assert_eq!(loaded, Some(baseline));
}

#[tokio::test]
async fn keys_are_independent() {
    let store = InMemorySessionStore::new();
    let session = populated_session();

    store
        .set("sender-1", &session, Duration::from_secs(30))
        .await
        .expect("set should work");

    assert!(store.get("sender-2").await.expect("get").is_none());
    assert_eq!(
        store.get("sender-1").await.expect("get"),
        Some(session)
    );
}
