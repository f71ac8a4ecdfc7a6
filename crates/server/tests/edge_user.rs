use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use rpc::contracts::user::{UserServiceClient, USER_DOMAIN};
use rpc::{HttpTransport, LocalTransport, MethodDescriptor, RpcClient, RpcError, RpcReply, RpcTransport};
use serde_json::{json, Value};
use server::routes;
use service::test_support::user_service;
use service::user::domain::CreateUserInput;
use service::user::UserService;
use tower::ServiceExt;

/// Delegates to the in-process registry and counts every call.
struct CountingTransport {
    inner: LocalTransport,
    calls: AtomicUsize,
}

#[async_trait]
impl RpcTransport for CountingTransport {
    async fn invoke(&self, method: MethodDescriptor, payload: Value) -> Result<RpcReply, RpcError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.invoke(method, payload).await
    }
}

struct Edge {
    app: Router,
    users: Arc<UserService>,
    transport: Arc<CountingTransport>,
}

impl Edge {
    fn calls(&self) -> usize {
        self.transport.calls.load(Ordering::SeqCst)
    }
}

fn edge() -> anyhow::Result<Edge> {
    let users = user_service();
    let registry = Arc::new(service::user::handlers::registry(users.clone())?);
    let transport = Arc::new(CountingTransport { inner: LocalTransport::new(registry), calls: AtomicUsize::new(0) });
    let client = UserServiceClient::new(RpcClient::new(USER_DOMAIN, transport.clone()));
    let app = routes::public_router(routes::api_user::router(client));
    Ok(Edge { app, users, transport })
}

async fn send(app: &Router, req: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    Ok((status, body))
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn fixed_400() -> Value {
    json!({"status": 400, "message": "invalid request", "error": "invalid parameter"})
}

#[tokio::test]
async fn malformed_input_is_rejected_without_forwarding() -> anyhow::Result<()> {
    let e = edge()?;
    let bad = vec![
        post_json("/users/find-by-email", r#"{"mail":"a@x.com"}"#),
        post_json("/users/find-by-email", r#"{"email":"not-an-email"}"#),
        post_json("/users/find-by-email", r#"{"email":"a@x.com""#),
        post_json("/users/find-by-credentials", r#"{"email":"a@x.com"}"#),
        post_json("/users/find-by-credentials", r#"{"email":"a@x.com","password":""}"#),
        post_json("/users/find-active", r#"{"email":42}"#),
        Request::builder()
            .method("POST")
            .uri("/users/find-active")
            .body(Body::from(r#"{"email":"a@x.com"}"#))
            .unwrap(),
        get("/users/abc"),
        get("/users/0"),
    ];
    for req in bad {
        let uri = req.uri().to_string();
        let (status, body) = send(&e.app, req).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body, fixed_400(), "{uri}");
    }
    assert_eq!(e.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn lookups_are_forwarded_and_misses_are_404() -> anyhow::Result<()> {
    let e = edge()?;
    let created = e
        .users
        .create_user(CreateUserInput { email: "a@x.com".into(), plaintext_password: "p1".into() })
        .await?;

    let (status, body) = send(&e.app, get(&format!("/users/{}", created.id))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["status"], "ACTIVE");
    assert!(body.get("password").is_none());

    let (status, _) = send(&e.app, post_json("/users/find-by-credentials", r#"{"email":"a@x.com","password":"p1"}"#)).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) =
        send(&e.app, post_json("/users/find-by-credentials", r#"{"email":"a@x.com","password":"wrong"}"#)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);

    let (status, _) = send(&e.app, get("/users/999")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(e.calls(), 4);
    Ok(())
}

#[tokio::test]
async fn active_lookup_hides_suspended_users() -> anyhow::Result<()> {
    let e = edge()?;
    let created = e
        .users
        .create_user(CreateUserInput { email: "a@x.com".into(), plaintext_password: "p1".into() })
        .await?;

    let (status, _) = send(&e.app, post_json("/users/find-active", r#"{"email":"a@x.com"}"#)).await?;
    assert_eq!(status, StatusCode::OK);

    e.users.suspend_user_by_id(created.id).await?;
    let (status, _) = send(&e.app, post_json("/users/find-active", r#"{"email":"a@x.com"}"#)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = send(&e.app, post_json("/users/find-by-email", r#"{"email":"a@x.com"}"#)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "SUSPENDED");
    Ok(())
}

#[tokio::test]
async fn ping_does_not_need_a_backend() -> anyhow::Result<()> {
    let e = edge()?;
    let resp = e.app.clone().oneshot(get("/ping")).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    assert_eq!(&bytes[..], b"ok");
    assert_eq!(e.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn unreachable_backend_is_a_generic_502() -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let transport = HttpTransport::with_base_url(format!("http://{addr}"), Duration::from_millis(500))?;
    let client = UserServiceClient::new(RpcClient::new(USER_DOMAIN, Arc::new(transport)));
    let app = routes::public_router(routes::api_user::router(client));

    let (status, body) = send(&app, get("/users/1")).await?;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["status"], 502);
    assert!(!body.to_string().contains(&addr.to_string()));
    Ok(())
}
