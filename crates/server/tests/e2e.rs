//! Whole processes over real sockets: app_user and app_product backends,
//! fronted by their api edges, all on ephemeral ports.

use std::net::SocketAddr;
use std::path::Path;

use configs::DeploymentProfile;
use serde_json::{json, Value};
use server::compose::{self, rpc_endpoint_name};
use server::{Bootstrap, Phase, ServiceKind};

fn test_profile() -> anyhow::Result<DeploymentProfile> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../env");
    let mut deployment = DeploymentProfile::load_from(Some("test"), &dir)?;
    for listener in deployment.config.listeners.values_mut() {
        listener.host = "127.0.0.1".into();
        listener.port = 0;
    }
    for target in deployment.config.services.values_mut() {
        target.bind_host = Some("127.0.0.1".into());
        target.port = 0;
    }
    Ok(deployment)
}

fn point_at(deployment: &mut DeploymentProfile, domain: &str, addr: SocketAddr) -> anyhow::Result<()> {
    let target = deployment
        .config
        .services
        .get_mut(domain)
        .ok_or_else(|| anyhow::anyhow!("no target for {domain}"))?;
    target.host = addr.ip().to_string();
    target.port = addr.port();
    Ok(())
}

async fn start(kind: ServiceKind, deployment: &DeploymentProfile) -> anyhow::Result<Bootstrap<server::startup::Serving>> {
    let configured = Bootstrap::new().with_profile(deployment.clone());
    let endpoints = compose::endpoints(kind, configured.config()).await?;
    let serving = configured.serve(endpoints).await?;
    assert_eq!(serving.phase(), Phase::Serving);
    Ok(serving)
}

fn addr_of(serving: &Bootstrap<server::startup::Serving>, name: &str) -> anyhow::Result<SocketAddr> {
    serving.local_addr(name).ok_or_else(|| anyhow::anyhow!("listener {name} not bound"))
}

#[tokio::test]
async fn users_and_products_flow_through_every_process() -> anyhow::Result<()> {
    let mut deployment = test_profile()?;
    let http = reqwest::Client::new();

    let app_user = start(ServiceKind::AppUser, &deployment).await?;
    point_at(&mut deployment, "user", addr_of(&app_user, &rpc_endpoint_name("user"))?)?;
    let api_user = start(ServiceKind::ApiUser, &deployment).await?;

    let app_product = start(ServiceKind::AppProduct, &deployment).await?;
    point_at(&mut deployment, "product", addr_of(&app_product, &rpc_endpoint_name("product"))?)?;
    let api_product = start(ServiceKind::ApiProduct, &deployment).await?;

    let app_user_url = format!("http://{}", addr_of(&app_user, "app_user")?);
    let api_user_url = format!("http://{}", addr_of(&api_user, "api_user")?);
    let app_product_url = format!("http://{}", addr_of(&app_product, "app_product")?);
    let api_product_url = format!("http://{}", addr_of(&api_product, "api_product")?);

    let ping = http.get(format!("{api_user_url}/ping")).send().await?;
    assert_eq!(ping.status(), 200);
    assert_eq!(ping.text().await?, "ok");

    let created = http
        .post(format!("{app_user_url}/users"))
        .json(&json!({"email": "alice@example.com", "password": "p1"}))
        .send()
        .await?;
    assert_eq!(created.status(), 201);
    let created: Value = created.json().await?;
    let owner_id = created["id"].as_i64().unwrap_or_default();

    let found = http
        .post(format!("{api_user_url}/users/find-by-credentials"))
        .json(&json!({"email": "alice@example.com", "password": "p1"}))
        .send()
        .await?;
    assert_eq!(found.status(), 200);
    let found: Value = found.json().await?;
    assert_eq!(found["id"], owner_id);

    let wrong = http
        .post(format!("{api_user_url}/users/find-by-credentials"))
        .json(&json!({"email": "alice@example.com", "password": "nope"}))
        .send()
        .await?;
    assert_eq!(wrong.status(), 404);

    let product = http
        .post(format!("{app_product_url}/products"))
        .json(&json!({"ownerEmail": "alice@example.com", "name": "lamp", "price": 1200}))
        .send()
        .await?;
    assert_eq!(product.status(), 201);

    let listed: Value = http
        .get(format!("{api_product_url}/products/by-owner/{owner_id}"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(listed[0]["name"], "lamp");
    Ok(())
}

#[tokio::test]
async fn rpc_listener_does_not_serve_public_routes() -> anyhow::Result<()> {
    let deployment = test_profile()?;
    let app_user = start(ServiceKind::AppUser, &deployment).await?;
    let rpc_url = format!("http://{}", addr_of(&app_user, &rpc_endpoint_name("user"))?);
    let http = reqwest::Client::new();

    let public = http
        .post(format!("{rpc_url}/users"))
        .json(&json!({"email": "alice@example.com", "password": "p1"}))
        .send()
        .await?;
    assert_eq!(public.status(), 404);

    let unknown = http.post(format!("{rpc_url}/rpc/UserService/DeleteUser")).json(&json!({"id": 1})).send().await?;
    assert_eq!(unknown.status(), 404);
    let body: Value = unknown.json().await?;
    assert_eq!(body["status"], "fault");
    assert_eq!(body["fault"]["code"], "METHOD_NOT_FOUND");
    Ok(())
}
