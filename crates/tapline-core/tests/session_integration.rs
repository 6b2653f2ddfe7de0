//! Integration tests for sessions, lookups and the session context.
//!
//! Sessions run over a [`ReplayTransport`] so every wire command can be
//! inspected after the fact.

mod common;

use std::sync::Arc;
use std::thread;

use serde_json::{json, Value};

use common::{last_body, replay_session, SESSION_ID};

use tapline_core::controls::Orientation;
use tapline_core::error::DriverError;
use tapline_core::locator::Locator;
use tapline_core::registry::SessionContext;
use tapline_core::session::Platform;
use tapline_core::wire::{Method, ELEMENT_KEY};

// ---------------------------------------------------------------------------
// Locator dispatch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_each_locator_dispatches_its_own_strategy() {
    let (transport, _, session) = replay_session("Android").await;
    transport.on_element("el");

    let cases = [
        (Locator::xpath("//a"), "xpath"),
        (Locator::css("#a"), "css selector"),
        (Locator::id("a"), "id"),
        (Locator::name("a"), "name"),
        (Locator::accessibility_id("a"), "accessibility id"),
        (Locator::class_name("a"), "class name"),
    ];
    for (locator, using) in &cases {
        let element = session.find_element(locator).await.unwrap();
        assert_eq!(element.id(), "el");
        let body = last_body(&transport, "/element");
        assert_eq!(body["using"], *using, "locator {locator}");
        assert_eq!(body["value"], locator.value());
    }
    assert_eq!(transport.commands_to("/element").len(), cases.len());
}

#[tokio::test]
async fn test_find_element_maps_no_such_element() {
    let (transport, _, session) = replay_session("Android").await;
    transport.on_error(Method::Post, "/element", "no such element", "gone");

    let err = session
        .find_element(&Locator::id("missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, DriverError::NoSuchElement(ref l) if l == "id=missing"));
    assert!(err.is_no_such_element());
}

#[tokio::test]
async fn test_find_elements_reads_every_reference() {
    let (transport, _, session) = replay_session("Android").await;
    transport.on(
        Method::Post,
        "/elements",
        json!([{ ELEMENT_KEY: "a" }, { "ELEMENT": "b" }]),
    );

    let elements = session
        .find_elements(&Locator::class_name("android.widget.TextView"))
        .await
        .unwrap();
    let ids: Vec<&str> = elements.iter().map(|e| e.id()).collect();
    assert_eq!(ids, ["a", "b"]);
}

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_open_resolves_platform_from_reply() {
    let (transport, _, session) = replay_session("iOS").await;
    assert_eq!(session.id(), SESSION_ID);
    assert_eq!(*session.platform(), Platform::Ios);

    let body = last_body(&transport, "/session");
    assert_eq!(body["capabilities"]["alwaysMatch"]["platformName"], "iOS");
    assert_eq!(body["capabilities"]["firstMatch"], json!([{}]));
}

#[tokio::test]
async fn test_quit_deletes_session() {
    let (transport, _, session) = replay_session("Android").await;
    transport.on(Method::Delete, SESSION_ID, Value::Null);

    session.quit().await.unwrap();
    let last = transport.commands().pop().unwrap();
    assert_eq!(last.method, Method::Delete);
    assert_eq!(last.path, format!("/session/{SESSION_ID}"));
}

#[tokio::test]
async fn test_execute_script_wraps_single_argument() {
    let (transport, _, session) = replay_session("Android").await;
    transport.on(Method::Post, "/execute/sync", Value::Null);

    session
        .execute_script("mobile:scroll", json!({"direction": "down"}))
        .await
        .unwrap();
    let body = last_body(&transport, "/execute/sync");
    assert_eq!(body["script"], "mobile:scroll");
    assert_eq!(body["args"], json!([{"direction": "down"}]));

    session
        .execute_script("mobile:acceptAlert", Value::Null)
        .await
        .unwrap();
    assert_eq!(last_body(&transport, "/execute/sync")["args"], json!([]));
}

#[tokio::test]
async fn test_window_size_reads_rect() {
    let (transport, _, session) = replay_session("Android").await;
    transport.on(
        Method::Get,
        "/window/rect",
        json!({"x": 0, "y": 0, "width": 1080.0, "height": 2400.0}),
    );
    assert_eq!(session.window_size().await.unwrap(), (1080, 2400));
}

// ---------------------------------------------------------------------------
// Platform controls
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_android_rotate_posts_orientation() {
    let (transport, _, session) = replay_session("Android").await;
    transport.on(Method::Post, "/orientation", Value::Null);

    session.rotate(Orientation::Landscape).await.unwrap();
    assert_eq!(
        last_body(&transport, "/orientation"),
        json!({"orientation": "LANDSCAPE"})
    );
}

#[tokio::test]
async fn test_unknown_platform_cannot_rotate() {
    let (transport, _, session) = replay_session("Windows").await;
    let before = transport.commands().len();

    let err = session.rotate(Orientation::Portrait).await.unwrap_err();
    assert!(matches!(err, DriverError::Unsupported { operation: "rotate", .. }));
    assert_eq!(transport.commands().len(), before);
}

#[tokio::test]
async fn test_unknown_platform_backgrounds_through_script() {
    let (transport, _, session) = replay_session("Windows").await;
    transport.on(Method::Post, "/execute/sync", Value::Null);

    session
        .background_app(std::time::Duration::from_secs(3))
        .await
        .unwrap();
    let body = last_body(&transport, "/execute/sync");
    assert_eq!(body["script"], "mobile: backgroundApp");
    assert_eq!(body["args"], json!([{"seconds": 3}]));
}

#[tokio::test]
async fn test_android_scroll_click_uses_uiautomator() {
    let (transport, _, session) = replay_session("Android").await;
    transport.on_element("item");
    transport.on(Method::Post, "/element/item/click", Value::Null);

    session
        .scroll_into_view_and_click("com.app:id/list", "Backpack")
        .await
        .unwrap();
    let lookup = last_body(&transport, "/element");
    assert_eq!(lookup["using"], "-android uiautomator");
    assert!(lookup["value"].as_str().unwrap().contains("Backpack"));
    assert_eq!(transport.commands_to("/element/item/click").len(), 1);
}

#[tokio::test]
async fn test_ios_has_no_power_control() {
    let (_, _, session) = replay_session("iOS").await;
    assert!(!session.controls().supports_power_ac());
    let err = session
        .set_power_ac(tapline_core::controls::PowerState::On)
        .await
        .unwrap_err();
    assert!(matches!(err, DriverError::Unsupported { .. }));
}

// ---------------------------------------------------------------------------
// Session context
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_context_bind_release_and_rebind() {
    let (_, _, first) = replay_session("Android").await;
    let (_, _, second) = replay_session("iOS").await;
    let first = Arc::new(first);
    let second = Arc::new(second);

    let mut ctx = SessionContext::new();
    assert!(matches!(ctx.require(), Err(DriverError::NoSession)));

    ctx.bind(Some(first.clone()));
    assert!(Arc::ptr_eq(&ctx.current().unwrap(), &first));

    ctx.bind(None);
    assert!(Arc::ptr_eq(&ctx.current().unwrap(), &first));

    ctx.bind(Some(second.clone()));
    assert!(Arc::ptr_eq(&ctx.require().unwrap(), &second));
    // rebinding does not close the previous session
    assert_eq!(Arc::strong_count(&first), 1);

    let released = ctx.release().unwrap();
    assert!(Arc::ptr_eq(&released, &second));
    assert!(ctx.current().is_none());
    assert!(ctx.release().is_none());
}

#[tokio::test]
async fn test_contexts_on_different_threads_are_isolated() {
    let (_, _, android) = replay_session("Android").await;
    let (_, _, ios) = replay_session("iOS").await;
    let sessions = [Arc::new(android), Arc::new(ios)];

    let handles: Vec<_> = sessions
        .iter()
        .cloned()
        .map(|session| {
            thread::spawn(move || {
                let mut ctx = SessionContext::new();
                assert!(ctx.current().is_none());
                let expected = session.platform().clone();
                ctx.bind(Some(session));
                ctx.require().unwrap().platform().clone() == expected
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
