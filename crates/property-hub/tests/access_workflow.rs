use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use property_hub::access::IdentityProvider;
use property_hub::config::ListingsConfig;
use property_hub::memory::MemoryIdentityProvider;
use property_hub::{api_router, Backend, PropertyHub};

fn hub_with_identities(identities: Arc<MemoryIdentityProvider>) -> PropertyHub {
    let backend = Backend {
        identities,
        ..Backend::in_memory(Vec::new())
    };
    PropertyHub::new(backend, &ListingsConfig::default())
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request builds")
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn navigation_reports_guard_decision_per_page() {
    let identities = Arc::new(MemoryIdentityProvider::default());
    let hub = hub_with_identities(identities);
    hub.accounts
        .bootstrap_admin("admin@example.com", "admin-pass", "Site Admin")
        .expect("admin bootstrapped");
    let app = api_router(hub.clone());

    let public = app
        .clone()
        .oneshot(get("/api/v1/navigation?path=/property/42", None))
        .await
        .expect("router responds");
    assert_eq!(public.status(), StatusCode::OK);
    let body = json_body(public).await;
    assert_eq!(body["route"], "property_detail");
    assert_eq!(body["decision"], "render_children");

    let protected = app
        .clone()
        .oneshot(get("/api/v1/navigation?path=/post-property", None))
        .await
        .expect("router responds");
    let body = json_body(protected).await;
    assert_eq!(body["decision"], "redirect_to_login");
    assert_eq!(body["login_path"], "/auth");
    assert_eq!(body["from"], "/post-property");

    let grant = hub
        .accounts
        .sign_in(property_hub::accounts::SignInRequest {
            email: "admin@example.com".to_string(),
            password: "admin-pass".to_string(),
        })
        .expect("admin signs in");
    let admin = app
        .clone()
        .oneshot(get("/api/v1/navigation?path=/admin", Some(&grant.token.0)))
        .await
        .expect("router responds");
    assert_eq!(json_body(admin).await["decision"], "render_children");

    let missing = app
        .oneshot(get("/api/v1/navigation?path=/nowhere", None))
        .await
        .expect("router responds");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn identity_without_profile_is_held_at_profile_pending() {
    let identities = Arc::new(MemoryIdentityProvider::default());
    let session = identities
        .sign_up("halfway@example.com", "s3cret-pass")
        .expect("identity created");
    let hub = hub_with_identities(identities);
    let app = api_router(hub);

    let response = app
        .oneshot(get("/api/v1/messages", Some(&session.token.0)))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(response).await["decision"], "show_profile_pending");
}

#[tokio::test]
async fn unknown_token_is_treated_as_anonymous() {
    let hub = hub_with_identities(Arc::new(MemoryIdentityProvider::default()));
    let app = api_router(hub);

    let browse = app
        .clone()
        .oneshot(get("/api/v1/properties", Some("not-a-session")))
        .await
        .expect("router responds");
    assert_eq!(browse.status(), StatusCode::OK);

    let inbox = app
        .oneshot(get("/api/v1/messages", Some("not-a-session")))
        .await
        .expect("router responds");
    assert_eq!(inbox.status(), StatusCode::UNAUTHORIZED);
}
