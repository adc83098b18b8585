//! Forwarding behaviour against a stub origin.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use http_worker::admission::{self, Unlimited};
use http_worker::{ForwardError, ForwardRequest};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

fn get(url: String) -> ForwardRequest {
    ForwardRequest {
        method: "GET".into(),
        url,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_get_ok() {
    let origin = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .expect(1)
        .mount(&origin)
        .await;

    let response = common::forwarder()
        .forward(get(format!("{}/ok", origin.uri())))
        .await
        .unwrap();

    assert!(response.ok);
    assert_eq!(response.status, 200);
    assert_eq!(response.status_text, "200 OK");
    assert_eq!(response.body, "hello");
    assert_eq!(response.url, format!("{}/ok", origin.uri()));
}

#[tokio::test]
async fn test_unsupported_method_makes_no_call() {
    let origin = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&origin)
        .await;

    let admission = Arc::new(common::CountingAdmission::default());
    let forwarder = common::forwarder_with(admission.clone());

    for verb in ["PATCH", "HEAD", "OPTIONS", "get"] {
        let err = forwarder
            .forward(ForwardRequest {
                method: verb.into(),
                url: format!("{}/ok", origin.uri()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ForwardError::UnsupportedMethod(ref m) if m == verb));
    }

    assert_eq!(admission.count(), 0, "rejected calls must not take admission");
    assert!(origin.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_url_is_rejected_before_admission() {
    let admission = Arc::new(common::CountingAdmission::default());
    let forwarder = common::forwarder_with(admission.clone());

    let err = forwarder.forward(get("not a url".into())).await.unwrap_err();
    assert!(matches!(err, ForwardError::InvalidUrl { .. }));
    assert_eq!(admission.count(), 0);
}

#[tokio::test]
async fn test_each_call_takes_one_admission() {
    let origin = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&origin)
        .await;

    let admission = Arc::new(common::CountingAdmission::default());
    let forwarder = common::forwarder_with(admission.clone());
    for _ in 0..3 {
        forwarder.forward(get(origin.uri())).await.unwrap();
    }
    assert_eq!(admission.count(), 3);
}

#[tokio::test]
async fn test_ok_follows_status() {
    let origin = MockServer::start().await;
    for (route, status) in [("/created", 201), ("/missing", 404), ("/broken", 500)] {
        Mock::given(path(route))
            .respond_with(ResponseTemplate::new(status))
            .mount(&origin)
            .await;
    }

    let forwarder = common::forwarder();
    let cases = [
        ("/created", 201, true, "201 Created"),
        ("/missing", 404, false, "404 Not Found"),
        ("/broken", 500, false, "500 Internal Server Error"),
    ];
    for (route, status, ok, text) in cases {
        let response = forwarder
            .forward(get(format!("{}{}", origin.uri(), route)))
            .await
            .unwrap();
        assert_eq!(response.status, status);
        assert_eq!(response.ok, ok);
        assert_eq!(response.status_text, text);
    }
}

#[tokio::test]
async fn test_response_headers_lower_cased() {
    let origin = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Custom-Header", "one")
                .append_header("Set-Cookie", "a=1")
                .append_header("Set-Cookie", "b=2"),
        )
        .mount(&origin)
        .await;

    let response = common::forwarder().forward(get(origin.uri())).await.unwrap();

    assert!(response.headers.keys().all(|k| *k == k.to_ascii_lowercase()));
    assert_eq!(response.headers["x-custom-header"], vec!["one"]);
    assert_eq!(response.headers["set-cookie"], vec!["a=1", "b=2"]);
}

#[tokio::test]
async fn test_default_user_agent_injected() {
    let origin = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", common::DEFAULT_AGENT))
        .and(header("via", http_worker::http::client::VIA_VALUE))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&origin)
        .await;

    let response = common::forwarder().forward(get(origin.uri())).await.unwrap();
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_caller_user_agent_preserved() {
    let origin = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", "caller-agent/9"))
        .and(header("x-request-source", "tests"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&origin)
        .await;

    let request = ForwardRequest {
        method: "GET".into(),
        url: origin.uri(),
        headers: HashMap::from([
            ("User-Agent".to_string(), "caller-agent/9".to_string()),
            ("X-Request-Source".to_string(), "tests".to_string()),
        ]),
        body: String::new(),
    };
    let response = common::forwarder().forward(request).await.unwrap();
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_body_forwarded() {
    let origin = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/submit"))
        .and(body_string("payload"))
        .respond_with(ResponseTemplate::new(201).set_body_string("stored"))
        .expect(1)
        .mount(&origin)
        .await;

    let request = ForwardRequest {
        method: "POST".into(),
        url: format!("{}/submit", origin.uri()),
        headers: HashMap::new(),
        body: "payload".into(),
    };
    let response = common::forwarder().forward(request).await.unwrap();
    assert_eq!(response.status, 201);
    assert_eq!(response.body, "stored");
}

#[tokio::test]
async fn test_put_and_delete_forwarded() {
    let origin = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&origin)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&origin)
        .await;

    let forwarder = common::forwarder();
    for (verb, status) in [("PUT", 200), ("DELETE", 202)] {
        let response = forwarder
            .forward(ForwardRequest {
                method: verb.into(),
                url: origin.uri(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(response.status, status);
    }
}

#[tokio::test]
async fn test_origin_unreachable() {
    // Grab a free port, then close it so nothing is listening.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let err = common::forwarder()
        .forward(get(format!("http://{addr}/")))
        .await
        .unwrap_err();
    assert!(matches!(err, ForwardError::OriginUnreachable(_)));
    assert!(err.to_string().starts_with("origin unreachable"));
}

#[tokio::test]
async fn test_rate_limit_paces_calls() {
    let origin = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&origin)
        .await;

    // 20/s with no burst: 11 calls need at least 10 intervals of 50ms.
    let forwarder = Arc::new(common::forwarder_with(admission::from_rate(20, 0)));
    let start = Instant::now();
    let mut handles = Vec::new();
    for _ in 0..11 {
        let forwarder = forwarder.clone();
        let url = origin.uri();
        handles.push(tokio::spawn(async move { forwarder.forward(get(url)).await }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert!(start.elapsed() >= Duration::from_millis(500));
}

#[tokio::test]
async fn test_unlimited_adds_no_delay() {
    let origin = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&origin)
        .await;

    let forwarder = common::forwarder_with(Arc::new(Unlimited));
    let start = Instant::now();
    for _ in 0..20 {
        forwarder.forward(get(origin.uri())).await.unwrap();
    }
    // A 1/s limiter would need at least 19s for the same calls.
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_reply_url_is_the_requested_url() {
    let origin = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/b"))
        .expect(1)
        .mount(&origin)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
        .expect(1)
        .mount(&origin)
        .await;

    let requested = format!("{}/a", origin.uri());
    let response = common::forwarder().forward(get(requested.clone())).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body, "moved");
    assert_eq!(response.url, requested);
}
