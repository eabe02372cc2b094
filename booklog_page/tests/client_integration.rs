use std::time::Duration;

use booklog_page::scraper::Selector;
use booklog_page::{AcquireOptions, Error, PageClient};
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[tokio::test]
async fn acquire_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("product.html");

    Mock::given(method("GET"))
        .and(path("/dp/B08ABC1234"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let url = format!("{}/dp/B08ABC1234", mock_server.uri());
    let client = PageClient::new();
    let doc = client
        .acquire(&url, &AcquireOptions::default())
        .await
        .unwrap();

    assert_eq!(doc.url(), url);
    let sel = Selector::parse("#productTitle").unwrap();
    let title: String = doc.select(&sel).next().unwrap().text().collect();
    assert_eq!(title.trim(), "Example Book");
}

#[tokio::test]
async fn acquire_sends_pinned_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/book"))
        .and(wiremock::matchers::header("user-agent", "booklog-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = PageClient::new().with_user_agent("booklog-test/1.0");
    let result = client
        .fetch_html(
            &format!("{}/book", mock_server.uri()),
            &AcquireOptions::default(),
        )
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn acquire_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/book"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = PageClient::new();
    let result = client
        .fetch_html(
            &format!("{}/book", mock_server.uri()),
            &AcquireOptions::default(),
        )
        .await;

    match result {
        Err(Error::HttpStatus { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "Internal Server Error");
        }
        other => panic!("expected HttpStatus, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn acquire_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client = PageClient::new();
    let opts = AcquireOptions::default().with_timeout(Duration::from_millis(200));
    let result = client
        .fetch_html(&format!("{}/slow", mock_server.uri()), &opts)
        .await;

    assert!(matches!(result, Err(Error::Timeout(d)) if d == Duration::from_millis(200)));
}

#[tokio::test]
async fn acquire_rejects_invalid_url() {
    let client = PageClient::new();
    let result = client
        .fetch_html("not a url", &AcquireOptions::default())
        .await;
    assert!(matches!(result, Err(Error::InvalidUrl(_))));
}
