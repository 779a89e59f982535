use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::Service;
use uuid::Uuid;

use server::routes::{self, AppState};
use server::startup::build_state;
use service::session::SessionRegistry;
use service::store::{AlertStore, UserStore};

fn cors() -> tower_http::cors::CorsLayer {
    tower_http::cors::CorsLayer::very_permissive()
}

fn test_config() -> configs::AppConfig {
    let mut cfg = configs::AppConfig::default();
    cfg.storage.data_dir = format!("target/test-data/{}", Uuid::new_v4());
    cfg
}

async fn build_app() -> anyhow::Result<Router> {
    let state = build_state(&test_config()).await?;
    Ok(routes::build_router(state, cors()))
}

fn post_json(uri: &str, body: &Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(t) = token {
        builder = builder.header("authorization", format!("Bearer {}", t));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("build request")
}

fn get_verify(token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri("/auth/verify");
    if let Some(t) = token {
        builder = builder.header("authorization", format!("Bearer {}", t));
    }
    builder.body(Body::empty()).expect("build request")
}

async fn call(app: &Router, req: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let resp = app.clone().call(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, body))
}

async fn register(app: &Router, email: &str) -> anyhow::Result<(String, String)> {
    let (status, body) = call(
        app,
        post_json(
            "/auth/register",
            &json!({"email": email, "name": "Tester", "password": "p1"}),
            None,
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().expect("token").to_string();
    let user_id = body["user"]["id"].as_str().expect("user id").to_string();
    Ok((token, user_id))
}

#[tokio::test]
async fn register_creates_user_and_session() -> anyhow::Result<()> {
    let app = build_app().await?;

    let (status, body) = call(
        &app,
        post_json(
            "/auth/register",
            &json!({"email": "a@x.com", "name": "A", "password": "p1"}),
            None,
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["token"].as_str().unwrap().starts_with("token_"));
    assert_eq!(body["user"]["email"], "a@x.com");
    assert!(body["user"].get("password").is_none(), "password must not leak");
    assert_eq!(body["user"]["emergencyContacts"], json!([]));

    let token = body["token"].as_str().unwrap();
    let (status, body) = call(&app, get_verify(Some(token))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "a@x.com");
    Ok(())
}

#[tokio::test]
async fn register_missing_fields_rejected() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (status, body) =
        call(&app, post_json("/auth/register", &json!({"email": "a@x.com"}), None)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Missing required fields");
    Ok(())
}

#[tokio::test]
async fn duplicate_email_rejected() -> anyhow::Result<()> {
    let app = build_app().await?;
    register(&app, "a@x.com").await?;

    let (status, body) = call(
        &app,
        post_json(
            "/auth/register",
            &json!({"email": "a@x.com", "name": "B", "password": "p2"}),
            None,
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already registered");
    Ok(())
}

#[tokio::test]
async fn login_checks_credentials() -> anyhow::Result<()> {
    let app = build_app().await?;
    register(&app, "a@x.com").await?;

    let (status, body) = call(
        &app,
        post_json("/auth/login", &json!({"email": "a@x.com", "password": "p1"}), None),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().unwrap().starts_with("token_"));

    let (status, body) = call(
        &app,
        post_json("/auth/login", &json!({"email": "a@x.com", "password": "wrong"}), None),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");

    let (status, _) = call(
        &app,
        post_json("/auth/login", &json!({"email": "nobody@x.com", "password": "p1"}), None),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn verify_requires_valid_token() -> anyhow::Result<()> {
    let app = build_app().await?;

    let (status, body) = call(&app, get_verify(None)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let (status, body) = call(&app, get_verify(Some("token_u_0_bogus"))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token");
    Ok(())
}

#[tokio::test]
async fn expired_session_is_rejected() -> anyhow::Result<()> {
    let cfg = test_config();
    let state = AppState {
        users: UserStore::open(cfg.users_path()).await?,
        alerts: AlertStore::new(),
        // zero ttl: every session is already expired at validation time
        sessions: SessionRegistry::with_ttl_hours(0),
    };
    let app = routes::build_router(state, cors());

    let (token, _) = register(&app, "a@x.com").await?;
    let (status, body) = call(&app, get_verify(Some(&token))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token");
    Ok(())
}

#[tokio::test]
async fn logout_invalidates_session() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (token, _) = register(&app, "a@x.com").await?;

    let (status, body) =
        call(&app, post_json("/auth/logout", &json!({}), Some(&token))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = call(&app, get_verify(Some(&token))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // logging out again is a no-op, not an error
    let (status, _) = call(&app, post_json("/auth/logout", &json!({}), Some(&token))).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn contact_limit_enforced_over_http() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (token, _) = register(&app, "a@x.com").await?;

    let mut last_contact_id = String::new();
    for i in 0..5 {
        let (status, body) = call(
            &app,
            post_json(
                "/contacts/add",
                &json!({"name": format!("C{i}"), "phone": "123"}),
                Some(&token),
            ),
        )
        .await?;
        assert_eq!(status, StatusCode::OK, "contact {i} should fit");
        last_contact_id = body["contact"]["id"].as_str().unwrap().to_string();
    }

    let (status, body) = call(
        &app,
        post_json("/contacts/add", &json!({"name": "C5", "phone": "123"}), Some(&token)),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("max 5"));

    // removing one frees a slot
    let (status, _) = call(
        &app,
        post_json("/contacts/remove", &json!({"contactId": last_contact_id}), Some(&token)),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(
        &app,
        post_json("/contacts/add", &json!({"name": "C5", "phone": "123"}), Some(&token)),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn remove_unknown_contact_not_found() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (token, _) = register(&app, "a@x.com").await?;

    let (status, body) = call(
        &app,
        post_json("/contacts/remove", &json!({"contactId": "no-such-id"}), Some(&token)),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Contact not found");

    let (status, _) =
        call(&app, post_json("/contacts/remove", &json!({}), Some(&token))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn contacts_require_session() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (status, _) = call(
        &app,
        post_json("/contacts/add", &json!({"name": "Mom", "phone": "123"}), None),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn alert_requires_header_but_not_a_live_session() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (_, user_id) = register(&app, "a@x.com").await?;

    // no bearer header at all -> 401
    let (status, _) = call(
        &app,
        post_json(
            "/emergency/alert",
            &json!({"userId": user_id, "type": "fire", "latitude": 1.0, "longitude": 2.0}),
            None,
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // any bearer value passes; the token is not checked against the registry
    let (status, body) = call(
        &app,
        post_json(
            "/emergency/alert",
            &json!({
                "userId": user_id,
                "type": "fire",
                "latitude": 1.0,
                "longitude": 2.0,
                "mapsLink": "https://maps.example/x",
                "contactIds": ["c1", "c2"]
            }),
            Some("definitely-not-issued"),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["alert"]["type"], "fire");
    assert_eq!(body["alert"]["contactsAlerted"], 2);
    assert_eq!(body["alert"]["location"]["lat"], 1.0);
    Ok(())
}

#[tokio::test]
async fn alert_validates_fields() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (token, user_id) = register(&app, "a@x.com").await?;

    let (status, body) = call(
        &app,
        post_json(
            "/emergency/alert",
            &json!({"userId": user_id, "type": "flood", "latitude": 1.0, "longitude": 2.0}),
            Some(&token),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("unknown alert type"));

    let (status, _) = call(
        &app,
        post_json(
            "/emergency/alert",
            &json!({"userId": user_id, "type": "fire", "latitude": 1.0}),
            Some(&token),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}
