//! Needs a local Chrome. Run with `cargo test --features headless -- --ignored`.
#![cfg(feature = "headless")]

use std::time::Duration;

use booklog_page::scraper::Selector;
use booklog_page::{AcquireOptions, Error, PageClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

async fn product_server() -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dp/B08ABC1234"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(load_fixture("product.html")),
        )
        .mount(&mock_server)
        .await;
    mock_server
}

fn title_of(doc: &booklog_page::Document) -> Option<String> {
    let sel = Selector::parse("#productTitle").unwrap();
    doc.select(&sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}

#[tokio::test]
#[ignore]
async fn headless_acquire_renders_page() {
    let mock_server = product_server().await;
    let url = format!("{}/dp/B08ABC1234", mock_server.uri());

    let opts = AcquireOptions::default()
        .with_wait_for("#productTitle")
        .with_timeout(Duration::from_secs(15));
    let doc = PageClient::headless().acquire(&url, &opts).await.unwrap();

    assert_eq!(doc.url(), url);
    assert_eq!(title_of(&doc).as_deref(), Some("Example Book"));
}

#[tokio::test]
#[ignore]
async fn headless_missing_ready_marker_still_returns_page() {
    let mock_server = product_server().await;
    let url = format!("{}/dp/B08ABC1234", mock_server.uri());

    let opts = AcquireOptions::default()
        .with_wait_for("#no-such-marker")
        .with_timeout(Duration::from_secs(3));
    let doc = PageClient::headless().acquire(&url, &opts).await.unwrap();

    assert_eq!(title_of(&doc).as_deref(), Some("Example Book"));
}

#[tokio::test]
#[ignore]
async fn headless_unreachable_host_is_an_error() {
    let opts = AcquireOptions::default().with_timeout(Duration::from_secs(5));
    let err = PageClient::headless()
        .acquire("http://127.0.0.1:9/dp/B08ABC1234", &opts)
        .await
        .unwrap_err();

    assert!(
        matches!(err, Error::Browser(_) | Error::Timeout(_)),
        "unexpected error: {:?}",
        err
    );
}

#[tokio::test]
#[ignore]
async fn headless_sessions_do_not_leak_between_calls() {
    let mock_server = product_server().await;
    let url = format!("{}/dp/B08ABC1234", mock_server.uri());
    let client = PageClient::headless();
    let opts = AcquireOptions::default().with_timeout(Duration::from_secs(15));

    for _ in 0..3 {
        let doc = client.acquire(&url, &opts).await.unwrap();
        assert_eq!(title_of(&doc).as_deref(), Some("Example Book"));
    }
}
