//! Integration tests for the fetch client
//!
//! These tests use wiremock to stand in for origin servers and upstream
//! proxies and exercise full request/response cycles.

use std::fs;
use std::sync::Arc;
use sumi_fetch::{
    Cookie, CookieStore, FetchClient, FetchError, Options, ProxyError, ProxyRotator,
};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Base URL addressing the mock server as `localhost`, so cookies land under a
/// readable domain key rather than the tail of an IP address
fn localhost_url(server: &MockServer) -> String {
    format!("http://localhost:{}", server.address().port())
}

fn options_with_user_agent(user_agent: &str) -> Options {
    Options {
        user_agent: Some(user_agent.to_string()),
        ..Options::default()
    }
}

#[tokio::test]
async fn test_sends_user_agent_and_referer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .and(header("user-agent", "TestBot/1.0"))
        .and(header("referer", "https://example.com/start"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = FetchClient::standalone(options_with_user_agent("TestBot/1.0"))
        .expect("Failed to build client");
    let response = client
        .get(
            &format!("{}/page", mock_server.uri()),
            Some("https://example.com/start"),
        )
        .await
        .expect("Request failed");

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_default_user_agent_and_no_referer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "fetch"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = FetchClient::standalone(Options::default()).expect("Failed to build client");
    let response = client
        .get(&format!("{}/", mock_server.uri()), Some(""))
        .await
        .expect("Request failed");
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn test_error_status_is_not_an_error() {
    let mock_server = MockServer::start().await;

    let client = FetchClient::standalone(Options::default()).expect("Failed to build client");
    let response = client
        .get(&format!("{}/missing", mock_server.uri()), None)
        .await
        .expect("Request failed");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn test_response_cookies_sent_on_next_request() {
    let mock_server = MockServer::start().await;
    let base_url = localhost_url(&mock_server);

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "sid=abc123; Path=/; HttpOnly"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/profile"))
        .and(header("cookie", "sid=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("welcome"))
        .mount(&mock_server)
        .await;

    let client = FetchClient::standalone(Options::default()).expect("Failed to build client");

    client
        .get(&format!("{}/login", base_url), None)
        .await
        .expect("Login failed");
    let profile = client
        .get(&format!("{}/profile", base_url), None)
        .await
        .expect("Profile request failed");

    assert_eq!(profile.status().as_u16(), 200);
    assert_eq!(
        client
            .cookies()
            .cookies_for(&Url::parse(&base_url).unwrap()),
        vec![Cookie::new("sid", "abc123")]
    );
}

#[tokio::test]
async fn test_later_response_cookies_replace_earlier_ones() {
    let mock_server = MockServer::start().await;
    let base_url = localhost_url(&mock_server);

    Mock::given(method("GET"))
        .and(path("/first"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "a=1"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/second"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "b=2"))
        .mount(&mock_server)
        .await;

    let client = FetchClient::standalone(Options::default()).expect("Failed to build client");
    client.get(&format!("{}/first", base_url), None).await.unwrap();
    client.get(&format!("{}/second", base_url), None).await.unwrap();

    let stored = client.cookies().cookies_for(&Url::parse(&base_url).unwrap());
    assert_eq!(stored, vec![Cookie::new("b", "2")]);
}

#[tokio::test]
async fn test_cookies_loaded_from_directory_are_sent() {
    let mock_server = MockServer::start().await;
    let base_url = localhost_url(&mock_server);

    let cookie_dir = TempDir::new().unwrap();
    fs::create_dir(cookie_dir.path().join("localhost")).unwrap();
    fs::write(
        cookie_dir.path().join("localhost/session"),
        "sid = fromdisk\nlang = en\n",
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("cookie", "sid=fromdisk; lang=en"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let options = Options {
        cookie_dir: Some(cookie_dir.path().to_path_buf()),
        ..Options::default()
    };
    let client = FetchClient::standalone(options).expect("Failed to build client");
    let response = client
        .get(&format!("{}/me", base_url), None)
        .await
        .expect("Request failed");

    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn test_malformed_cookie_dir_aborts_construction() {
    let cookie_dir = TempDir::new().unwrap();
    fs::create_dir(cookie_dir.path().join("example.com")).unwrap();
    fs::write(cookie_dir.path().join("example.com/broken"), "novalue\n").unwrap();

    let cookies = Arc::new(CookieStore::new());
    let options = Options {
        cookie_dir: Some(cookie_dir.path().to_path_buf()),
        ..Options::default()
    };
    let result = FetchClient::new(options, Arc::new(ProxyRotator::new()), cookies.clone());

    match result {
        Err(FetchError::Cookie(e)) => assert!(e.to_string().contains("broken")),
        other => panic!("expected cookie error, got {:?}", other.map(|_| ())),
    }
    assert!(cookies.is_empty());
}

#[tokio::test]
async fn test_clients_share_cookie_store() {
    let mock_server = MockServer::start().await;
    let base_url = localhost_url(&mock_server);

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "token=shared"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .and(header("user-agent", "SecondBot"))
        .and(header("cookie", "token=shared"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let proxies = Arc::new(ProxyRotator::new());
    let cookies = Arc::new(CookieStore::new());
    let first = FetchClient::new(
        options_with_user_agent("FirstBot"),
        proxies.clone(),
        cookies.clone(),
    )
    .unwrap();
    let second = FetchClient::new(options_with_user_agent("SecondBot"), proxies, cookies).unwrap();

    first.get(&format!("{}/login", base_url), None).await.unwrap();
    let response = second.get(&format!("{}/data", base_url), None).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn test_follows_redirects() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/new"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("moved here"))
        .mount(&mock_server)
        .await;

    let client = FetchClient::standalone(Options::default()).expect("Failed to build client");
    let response = client
        .get(&format!("{}/old", mock_server.uri()), None)
        .await
        .expect("Request failed");

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.url().path(), "/new");
    assert_eq!(response.text().await.unwrap(), "moved here");
}

#[tokio::test]
async fn test_requests_go_through_proxy_from_file() {
    let proxy_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/via-proxy"))
        .respond_with(ResponseTemplate::new(200).set_body_string("proxied"))
        .expect(1)
        .mount(&proxy_server)
        .await;

    let proxy_dir = TempDir::new().unwrap();
    let proxy_file = proxy_dir.path().join("proxies.txt");
    fs::write(&proxy_file, format!("{}\n", proxy_server.uri())).unwrap();

    let options = Options {
        proxy_file: Some(proxy_file),
        ..Options::default()
    };
    let client = FetchClient::standalone(options).expect("Failed to build client");
    assert_eq!(client.proxies().len(), 1);

    // The origin host never resolves; only the proxy can answer
    let response = client
        .get("http://origin.invalid/via-proxy", None)
        .await
        .expect("Request failed");

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "proxied");
}

#[tokio::test]
async fn test_proxies_rotate_between_requests() {
    let first_proxy = MockServer::start().await;
    let second_proxy = MockServer::start().await;

    for server in [&first_proxy, &second_proxy] {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(server)
            .await;
    }

    let proxies = Arc::new(ProxyRotator::from_entries([
        first_proxy.uri(),
        second_proxy.uri(),
    ]));
    let client = FetchClient::new(Options::default(), proxies, Arc::new(CookieStore::new()))
        .expect("Failed to build client");

    for i in 0..4 {
        let response = client
            .get(&format!("http://origin.invalid/{}", i), None)
            .await
            .expect("Request failed");
        assert_eq!(response.status().as_u16(), 200);
    }
}

#[tokio::test]
async fn test_invalid_proxy_entry_surfaces_from_get() {
    let proxies = Arc::new(ProxyRotator::from_entries(["not a proxy url"]));
    let client = FetchClient::new(Options::default(), proxies, Arc::new(CookieStore::new()))
        .expect("Failed to build client");

    let result = client.get("http://example.com/", None).await;
    assert!(matches!(result, Err(FetchError::Proxy(_))));
}

#[tokio::test]
async fn test_unsupported_proxy_scheme_surfaces_from_get() {
    let proxies = Arc::new(ProxyRotator::from_entries(["ftp://proxy.example:21"]));
    let client = FetchClient::new(Options::default(), proxies, Arc::new(CookieStore::new()))
        .expect("Failed to build client");

    let result = client.get("http://example.com/", None).await;
    assert!(matches!(
        result,
        Err(FetchError::Proxy(ProxyError::Unsupported { .. }))
    ));
}

#[tokio::test]
async fn test_connection_failure_is_passed_through() {
    // Bind and drop a listener to get a port nobody listens on
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let url = format!("http://127.0.0.1:{}/", port);

    let client = FetchClient::standalone(Options::default()).expect("Failed to build client");
    match client.get(&url, None).await {
        Err(FetchError::Http { url: failed, source }) => {
            assert_eq!(failed, url);
            assert!(source.is_connect());
        }
        other => panic!("expected transport error, got {:?}", other.map(|r| r.status())),
    }
}
