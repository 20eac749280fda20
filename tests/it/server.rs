use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::{Value, json};
use simple_test_case::test_case;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::oneshot,
};
use tower::ServiceExt;

use purl_resolver::{
    config::ServerConfig,
    server::{Server, create_router},
};

/// Issue a GET against the router, returning the status, content type, and body.
async fn get(uri: &str) -> (StatusCode, Option<String>, String) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = create_router().oneshot(request).await.unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

async fn get_json(uri: &str) -> (StatusCode, Value) {
    let (status, content_type, body) = get(uri).await;
    pretty_assertions::assert_eq!(content_type.as_deref(), Some("application/json"));
    (status, serde_json::from_str(&body).unwrap())
}

fn resolve_uri(purl: &str) -> String {
    format!("/resolve?purl={}", utf8_percent_encode(purl, NON_ALPHANUMERIC))
}

#[tokio::test]
async fn healthz() {
    let (status, _, body) = get("/healthz").await;
    pretty_assertions::assert_eq!(status, StatusCode::OK);
    pretty_assertions::assert_eq!(body, "OK");
}

#[test_case("pkg:oci/nginx", "docker.io/nginx:latest"; "name_only")]
#[test_case("pkg:oci/nginx?tag=alpine", "docker.io/nginx:alpine"; "tag")]
#[test_case("pkg:oci/app?repository_url=ghcr.io/myorg/app", "ghcr.io/myorg/app:latest"; "custom_registry")]
#[test_case("pkg:oci/app?repository_url=https://ghcr.io/myorg/app&tag=v1", "ghcr.io/myorg/app:v1"; "https_registry_with_tag")]
#[test_case("pkg:oci/debian@sha256:244fd47?repository_url=docker.io/library/debian", "docker.io/library/debian@sha256:244fd47"; "digest")]
#[tokio::test]
async fn resolves(purl: &str, expected: &str) {
    let (status, body) = get_json(&resolve_uri(purl)).await;
    pretty_assertions::assert_eq!(status, StatusCode::OK);
    pretty_assertions::assert_eq!(body, json!({ "purl": purl, "oci_reference": expected }));
}

#[tokio::test]
async fn unencoded_parameter() {
    let (status, body) = get_json("/resolve?purl=pkg:oci/nginx").await;
    pretty_assertions::assert_eq!(status, StatusCode::OK);
    pretty_assertions::assert_eq!(body["oci_reference"], "docker.io/nginx:latest");
}

#[test_case("/resolve"; "no_query")]
#[test_case("/resolve?other=pkg%3Aoci%2Fnginx"; "other_parameter")]
#[test_case("/resolve?purl="; "empty_parameter")]
#[tokio::test]
async fn missing_parameter(uri: &str) {
    let (status, body) = get_json(uri).await;
    pretty_assertions::assert_eq!(status, StatusCode::BAD_REQUEST);
    pretty_assertions::assert_eq!(body, json!({ "error": "missing required parameter: purl" }));
}

#[tokio::test]
async fn first_parameter_wins() {
    let uri = format!(
        "{}&purl={}",
        resolve_uri("pkg:oci/nginx"),
        utf8_percent_encode("pkg:npm/express", NON_ALPHANUMERIC)
    );
    let (status, body) = get_json(&uri).await;
    pretty_assertions::assert_eq!(status, StatusCode::OK);
    pretty_assertions::assert_eq!(body["oci_reference"], "docker.io/nginx:latest");
}

#[tokio::test]
async fn decode_error() {
    // `%25zz` arrives at the handler as `%zz`, which is not a valid escape.
    let (status, body) = get_json("/resolve?purl=pkg%3Aoci%2Fnginx%25zz").await;
    pretty_assertions::assert_eq!(status, StatusCode::BAD_REQUEST);
    pretty_assertions::assert_eq!(
        body,
        json!({
            "error": "failed to decode purl parameter: invalid URL escape \"%zz\"",
            "purl": "pkg:oci/nginx%zz",
        })
    );
}

#[tokio::test]
async fn invalid_format() {
    let (status, body) = get_json(&resolve_uri("not-a-valid-purl")).await;
    pretty_assertions::assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("invalid purl format: "),
        "body: {body}"
    );
    pretty_assertions::assert_eq!(body["purl"], "not-a-valid-purl");
}

#[tokio::test]
async fn unsupported_type() {
    let (status, body) = get_json(&resolve_uri("pkg:npm/express@4.0.0")).await;
    pretty_assertions::assert_eq!(status, StatusCode::BAD_REQUEST);
    pretty_assertions::assert_eq!(
        body,
        json!({
            "error": "unsupported purl type 'npm', only 'oci' is supported",
            "purl": "pkg:npm/express@4.0.0",
        })
    );
}

#[tokio::test]
async fn resolve_rejects_other_methods() {
    let request = Request::builder()
        .method("POST")
        .uri(resolve_uri("pkg:oci/nginx"))
        .body(Body::empty())
        .unwrap();
    let response = create_router().oneshot(request).await.unwrap();
    pretty_assertions::assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[test]
fn server_port() {
    let server = Server::new(ServerConfig {
        port: 9090,
        ..Default::default()
    });
    pretty_assertions::assert_eq!(server.port(), 9090);
}

#[tokio::test]
async fn serves_until_shutdown() {
    let server = Server::new(ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        shutdown_timeout_secs: 5,
    });
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        server
            .serve(listener, async move {
                let _ = shutdown_rx.await;
            })
            .await
    });

    let mut stream = TcpStream::connect(address).await.unwrap();
    stream
        .write_all(b"GET /healthz HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    assert!(response.starts_with("HTTP/1.1 200 OK"), "response: {response}");
    assert!(response.ends_with("OK"), "response: {response}");

    shutdown_tx.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(10), handle)
        .await
        .expect("server stops after shutdown")
        .unwrap()
        .expect("server exits cleanly");
}
