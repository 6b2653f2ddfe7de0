//! Page object flows over scripted sessions.

use std::sync::Arc;

use serde_json::{json, Value};

use tapline_core::capabilities::{names, Capabilities};
use tapline_core::error::DriverError;
use tapline_core::page::Page;
use tapline_core::replay::ReplayTransport;
use tapline_core::report::{MemoryReporter, ReportLevel};
use tapline_core::session::Session;
use tapline_core::wire::{Method, ELEMENT_KEY};

use tapline_pages::{GoogleSearchPage, LoginPage, ProductPage, SettingsPage};

async fn session_on(platform: &str, transport: &Arc<ReplayTransport>) -> (Arc<MemoryReporter>, Session) {
    transport.on_new_session("pages", platform);
    let reporter = Arc::new(MemoryReporter::new());
    let mut caps = Capabilities::new();
    caps.set(names::PLATFORM_NAME, platform);
    let session = Session::open(transport.clone(), caps, reporter.clone())
        .await
        .unwrap();
    (reporter, session)
}

fn script_interactions(transport: &ReplayTransport) {
    transport
        .on(Method::Get, "/displayed", Value::Bool(true))
        .on(Method::Post, "/click", Value::Null)
        .on(Method::Post, "/clear", Value::Null)
        .on(Method::Post, "/value", Value::Null);
}

fn lookup_values(transport: &ReplayTransport) -> Vec<String> {
    transport
        .commands_to("/element")
        .into_iter()
        .filter_map(|c| c.body)
        .map(|b| b["value"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_login_flow_reaches_product_page() {
    let transport = Arc::new(ReplayTransport::new());
    let (reporter, session) = session_on("Android", &transport).await;
    for id in ["user", "pass", "login", "title"] {
        transport.on_element(id);
    }
    script_interactions(&transport);
    transport.on(Method::Get, "/element/title/text", json!("PRODUCTS"));

    let login = LoginPage::load(&session).await.unwrap();
    let products = login.login("standard_user", "secret_sauce").await.unwrap();
    assert_eq!(products.title().await.unwrap(), "PRODUCTS");

    let lookups = lookup_values(&transport);
    assert_eq!(&lookups[..3], ["test-Username", "test-Password", "test-LOGIN"]);
    assert!(lookups[3].contains("test-Cart drop zone"));

    let user_value = transport.commands_to("/element/user/value");
    assert_eq!(user_value[0].body.as_ref().unwrap()["text"], "standard_user");
    assert_eq!(transport.commands_to("/element/login/click").len(), 1);
    assert!(reporter.entries_at(ReportLevel::Fail).is_empty());
}

#[tokio::test]
async fn test_page_load_fails_when_element_is_missing() {
    let transport = Arc::new(ReplayTransport::new());
    let (_, session) = session_on("Android", &transport).await;
    transport.on_error(Method::Post, "/element", "no such element", "not found");

    let err = ProductPage::load(&session).await.err().unwrap();
    assert!(matches!(err, DriverError::NoSuchElement(_)));
}

#[tokio::test]
async fn test_login_page_load_stops_at_first_missing_field() {
    let transport = Arc::new(ReplayTransport::new());
    let (_, session) = session_on("Android", &transport).await;
    transport.on_element("user");
    transport.on_error(Method::Post, "/element", "no such element", "no password field");

    let result = LoginPage::load(&session).await;
    assert!(result.is_err());
    assert_eq!(transport.commands_to("/element").len(), 2);
}

#[tokio::test]
async fn test_log_out_returns_login_page() {
    let transport = Arc::new(ReplayTransport::new());
    let (reporter, session) = session_on("Android", &transport).await;
    for id in ["logout", "user", "pass", "login"] {
        transport.on_element(id);
    }
    script_interactions(&transport);

    let settings = SettingsPage::load(&session).await.unwrap();
    let _login: LoginPage<'_> = settings.press_log_out_button().await.unwrap();

    assert_eq!(transport.commands_to("/element/logout/click").len(), 1);
    assert_eq!(lookup_values(&transport)[0], "test-LOGOUT");
    let infos = reporter.entries_at(ReportLevel::Info);
    assert_eq!(infos[0].message, "Clicked on Logout");
}

#[tokio::test]
async fn test_log_out_failure_keeps_error() {
    let transport = Arc::new(ReplayTransport::new());
    let (reporter, session) = session_on("Android", &transport).await;
    transport.on_element("logout");
    transport.on_error(Method::Post, "/click", "element not interactable", "covered");

    let settings = SettingsPage::load(&session).await.unwrap();
    assert!(settings.press_log_out_button().await.is_err());
    assert_eq!(reporter.entries_at(ReportLevel::Fail).len(), 1);
}

#[tokio::test]
async fn test_google_search_returns_result_page() {
    let transport = Arc::new(ReplayTransport::new());
    let (_, session) = session_on("Android", &transport).await;
    transport.on_element("box");
    transport.on_element("results");
    script_interactions(&transport);
    transport
        .on(
            Method::Post,
            "/elements",
            json!([{ ELEMENT_KEY: "h1" }, { ELEMENT_KEY: "h2" }]),
        )
        .on(Method::Get, "/element/h1/text", json!("Rust Programming Language"))
        .on(Method::Get, "/element/h2/text", json!("Rust (video game)"));

    let search = GoogleSearchPage::load(&session).await.unwrap();
    let results = search.perform_search("rust").await.unwrap();
    assert!(results.is_displayed().await.unwrap());
    assert_eq!(
        results.result_titles().await.unwrap(),
        ["Rust Programming Language", "Rust (video game)"]
    );

    let typed = transport.commands_to("/element/box/value");
    assert_eq!(typed[0].body.as_ref().unwrap()["text"], "rust\u{E007}");
    let lookups = lookup_values(&transport);
    assert_eq!(lookups[0], "//input[@aria-label='Search']");
    assert_eq!(lookups[1], "#search");
}

#[test]
fn test_page_names() {
    assert_eq!(<LoginPage<'_> as Page<'_>>::NAME, "Login");
    assert_eq!(<ProductPage<'_> as Page<'_>>::NAME, "Products");
    assert_eq!(<SettingsPage<'_> as Page<'_>>::NAME, "Settings");
}
