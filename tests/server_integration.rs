//! End-to-end tests over a real socket.

use axum::http::StatusCode;
use serde_json::Value;
use storefront_server::db::{ConnectionState, MongoConnector};
use storefront_server::http::GREETING;
use storefront_server::net::ListenerState;

mod common;

use common::{client, start_server, test_config, url, RefusingConnector, StalledConnector};

#[tokio::test]
async fn test_greeting_with_unusable_database_url() {
    let (server, shutdown) = start_server(test_config(), MongoConnector).await;

    let state = server.database().wait_settled().await;
    assert!(matches!(state, ConnectionState::Failed { .. }));

    let res = client().get(url(&server, "/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), GREETING);

    shutdown.trigger();
    server.wait().await.unwrap();
}

#[tokio::test]
async fn test_serves_before_database_settles() {
    let (server, shutdown) = start_server(test_config(), StalledConnector).await;

    assert_eq!(server.listener_state(), ListenerState::Bound(server.local_addr()));
    assert_eq!(server.database().state(), ConnectionState::Connecting);

    let res = client().get(url(&server, "/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    shutdown.trigger();
    server.wait().await.unwrap();
}

#[tokio::test]
async fn test_group_route_without_database() {
    let (server, shutdown) = start_server(test_config(), RefusingConnector).await;
    server.database().wait_settled().await;

    let res = client()
        .post(url(&server, "/api/signin"))
        .json(&serde_json::json!({ "email": "a@b.c", "password": "secret" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "database_unavailable");

    // Literal path segments ignore ASCII case.
    let res = client()
        .post(url(&server, "/API/SIGNIN"))
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    shutdown.trigger();
    server.wait().await.unwrap();
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (server, shutdown) = start_server(test_config(), StalledConnector).await;

    let res = client().get(url(&server, "/no/such/route")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Cannot GET /no/such/route");

    shutdown.trigger();
    server.wait().await.unwrap();
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let (server, shutdown) = start_server(test_config(), StalledConnector).await;

    let res = client()
        .post(url(&server, "/api/signup"))
        .header("content-type", "application/json")
        .body("{\"name\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "bad_request");

    shutdown.trigger();
    server.wait().await.unwrap();
}

#[tokio::test]
async fn test_every_group_is_mounted_in_order() {
    let (server, shutdown) = start_server(test_config(), StalledConnector).await;

    assert_eq!(
        server.dispatcher().group_names(),
        vec!["auth", "admin", "product", "user", "seller"]
    );

    let client = client();
    for path in ["/admin/get-orders", "/api/products", "/api/orders/me", "/seller/orders"] {
        let res = client.get(url(&server, path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE, "{path}");
    }

    shutdown.trigger();
    server.wait().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_greetings() {
    let (server, shutdown) = start_server(test_config(), StalledConnector).await;
    let client = client();
    let root = url(&server, "/");

    let tasks: Vec<_> = (0..20)
        .map(|_| {
            let client = client.clone();
            let root = root.clone();
            tokio::spawn(async move {
                let mut ok = 0;
                for _ in 0..10 {
                    if let Ok(res) = client.get(&root).send().await {
                        if res.status().is_success() {
                            ok += 1;
                        }
                    }
                }
                ok
            })
        })
        .collect();

    let mut total = 0;
    for task in tasks {
        total += task.await.unwrap();
    }
    assert_eq!(total, 200);

    shutdown.trigger();
    server.wait().await.unwrap();
}
