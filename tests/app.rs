use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{
        Request, StatusCode,
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
    },
    response::Response,
};
use backend::{
    AppState,
    cache::CachedSession,
    config::Config,
    database::{MemoryItemStore, MemoryUserStore},
    error::StoreError,
    session::{MemorySessionStore, SessionStore},
    utils::generate_session_token,
};
use chrono::Utc;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

struct TestApp {
    router: Router,
    users: Arc<MemoryUserStore>,
}

/// Session store whose backend is unreachable.
struct UnreachableSessionStore;

#[async_trait]
impl SessionStore for UnreachableSessionStore {
    async fn save(&self, _session: &CachedSession, _ttl_secs: u64) -> Result<(), StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn load(&self, _session_id: &str) -> Result<Option<CachedSession>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn remove(&self, _session_id: &str) -> Result<(), StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }
}

impl TestApp {
    fn new() -> Self {
        Self::with_session_store(Arc::new(MemorySessionStore::new()))
    }

    fn with_session_store(sessions: Arc<dyn SessionStore>) -> Self {
        let config = Config {
            bcrypt_cost: 4,
            session_secret: "test-secret".into(),
            ..Config::default()
        };
        let users = Arc::new(MemoryUserStore::new());
        let state = AppState::new(
            config,
            users.clone(),
            Arc::new(MemoryItemStore::new()),
            sessions,
        );
        Self {
            router: backend::app(state),
            users,
        }
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        self.send(request("GET", uri, cookie, None, Body::empty()))
            .await
    }

    async fn post_form(&self, uri: &str, cookie: Option<&str>, body: &str) -> Response {
        self.send(request(
            "POST",
            uri,
            cookie,
            Some("application/x-www-form-urlencoded"),
            Body::from(body.to_string()),
        ))
        .await
    }

    async fn send_json(&self, method: &str, uri: &str, cookie: Option<&str>, body: Value) -> Response {
        self.send(request(
            method,
            uri,
            cookie,
            Some("application/json"),
            Body::from(body.to_string()),
        ))
        .await
    }

    async fn register(&self, username: &str, password: &str, confirm: &str) -> Response {
        self.post_form(
            "/register",
            None,
            &format!("username={username}&password={password}&confirmPassword={confirm}"),
        )
        .await
    }

    /// Registers and logs in, returning the `sid=...` cookie pair.
    async fn login_as(&self, username: &str, password: &str) -> String {
        let response = self.register(username, password, password).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let response = self
            .post_form(
                "/login",
                None,
                &format!("username={username}&password={password}"),
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/crud");
        session_cookie(&response)
    }
}

fn request(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    content_type: Option<&str>,
    body: Body,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    if let Some(content_type) = content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    builder.body(body).unwrap()
}

fn location(response: &Response) -> &str {
    response.headers().get(LOCATION).unwrap().to_str().unwrap()
}

fn set_cookie_header(response: &Response) -> &str {
    response.headers().get(SET_COOKIE).unwrap().to_str().unwrap()
}

fn session_cookie(response: &Response) -> String {
    let header = set_cookie_header(response);
    header.split(';').next().unwrap().to_string()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn register_login_create_list_delete() {
    let app = TestApp::new();

    let response = app.register("alice", "pw1", "pw1").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let response = app
        .post_form("/login", None, "username=alice&password=pw1")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let issued = set_cookie_header(&response);
    assert!(issued.contains("HttpOnly"));
    assert!(issued.contains("SameSite=Lax"));
    assert!(issued.contains("Max-Age=86400"));
    let cookie = session_cookie(&response);
    assert!(cookie.starts_with("sid="));

    let response = app
        .send_json("POST", "/api/items", Some(&cookie), json!({ "title": "Milk" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert_eq!(created["message"], "Item created");
    assert_eq!(created["item"]["title"], "Milk");
    assert_eq!(created["item"]["item_type"], "todo");
    assert_eq!(created["item"]["completed"], false);
    let id = created["item"]["id"].as_str().unwrap().to_string();

    let listed = body_json(app.get("/api/items", Some(&cookie)).await).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["title"], "Milk");

    let response = app
        .send_json("DELETE", &format!("/api/items/{id}"), Some(&cookie), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "message": "Item deleted" }));

    let listed = body_json(app.get("/api/items", Some(&cookie)).await).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn protected_pages_redirect_to_login_without_a_session() {
    let app = TestApp::new();

    for uri in ["/", "/crud", "/create", "/logout"] {
        let response = app.get(uri, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), "/login", "{uri}");
    }

    let response = app.post_form("/create", None, "title=Milk").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn api_rejects_every_unauthenticated_call() {
    let app = TestApp::new();
    let id = Uuid::new_v4();

    let calls = [
        ("GET", "/api/items".to_string()),
        ("POST", "/api/items".to_string()),
        ("GET", format!("/api/items/{id}")),
        ("PUT", format!("/api/items/{id}")),
        ("DELETE", format!("/api/items/{id}")),
    ];
    for (method, uri) in calls {
        let response = app
            .send_json(method, &uri, None, json!({ "title": "x" }))
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        let body = body_json(response).await;
        assert_eq!(body["code"], 1002);
    }
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let app = TestApp::new();
    let cookie = app.login_as("alice", "pw1").await;

    let response = app.get("/crud", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Signed in as alice"));

    let response = app.get("/logout", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    let removal = set_cookie_header(&response);
    assert!(removal.starts_with("sid="));
    assert!(removal.contains("Max-Age=0"));
    assert!(removal.contains("Path=/"));

    let response = app.get("/crud", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let response = app.get("/api/items", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn tampered_cookie_is_treated_as_logged_out() {
    let app = TestApp::new();
    let cookie = app.login_as("alice", "pw1").await;

    let response = app.get("/crud", Some(&format!("{cookie}tampered"))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() {
    let app = TestApp::new();
    app.register("alice", "pw1", "pw1").await;

    let response = app.register("alice", "pw2", "pw2").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(body_text(response).await.contains("Username already exists"));
    assert_eq!(app.users.len(), 1);
}

#[tokio::test]
async fn mismatched_passwords_rerender_the_form() {
    let app = TestApp::new();

    let response = app.register("bob", "pw1", "pw2").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let page = body_text(response).await;
    assert!(page.contains("Passwords do not match"));
    assert!(page.contains(r#"value="bob""#));
    assert!(app.users.is_empty());
}

#[tokio::test]
async fn wrong_password_does_not_reveal_which_field_failed() {
    let app = TestApp::new();
    app.register("alice", "pw1", "pw1").await;

    let wrong_password = app
        .post_form("/login", None, "username=alice&password=nope")
        .await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert!(wrong_password.headers().get(SET_COOKIE).is_none());

    let unknown_user = app
        .post_form("/login", None, "username=nobody&password=pw1")
        .await;
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

    assert!(body_text(wrong_password).await.contains("Invalid credentials"));
    assert!(body_text(unknown_user).await.contains("Invalid credentials"));
}

#[tokio::test]
async fn page_flow_creates_updates_and_deletes() {
    let app = TestApp::new();
    let cookie = app.login_as("alice", "pw1").await;

    let response = app
        .post_form("/create", Some(&cookie), "title=A&description=B&item_type=daily")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/crud");

    let listed = body_json(app.get("/api/items", Some(&cookie)).await).await;
    let created = listed[0].clone();
    assert_eq!(created["title"], "A");
    assert_eq!(created["description"], "B");
    assert_eq!(created["item_type"], "daily");
    assert!(created["created_at"].is_string());
    let id = created["id"].as_str().unwrap().to_string();

    let response = app.get(&format!("/update/{id}"), Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(r#"value="A""#));

    let response = app
        .post_form(
            &format!("/update/{id}"),
            Some(&cookie),
            "title=A2&description=B2&item_type=daily&completed=on",
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let updated = body_json(app.get(&format!("/api/items/{id}"), Some(&cookie)).await).await;
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["created_at"], created["created_at"]);
    assert_eq!(updated["title"], "A2");
    assert_eq!(updated["description"], "B2");
    assert_eq!(updated["completed"], true);

    for _ in 0..2 {
        let response = app
            .post_form(&format!("/delete/{id}"), Some(&cookie), "")
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/crud");
    }

    let response = app.get(&format!("/api/items/{id}"), Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_title_is_rejected_on_both_surfaces() {
    let app = TestApp::new();
    let cookie = app.login_as("alice", "pw1").await;

    let response = app
        .send_json("POST", "/api/items", Some(&cookie), json!({ "title": "  " }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error_message"], "Title is required");

    let response = app
        .post_form("/create", Some(&cookie), "title=&description=B")
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("Title is required"));

    let listed = body_json(app.get("/api/items", Some(&cookie)).await).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn unknown_items_are_not_found() {
    let app = TestApp::new();
    let cookie = app.login_as("alice", "pw1").await;
    let missing = Uuid::new_v4();

    let response = app
        .send_json(
            "PUT",
            &format!("/api/items/{missing}"),
            Some(&cookie),
            json!({ "title": "A2", "description": "B2" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], 1004);

    let response = app.get(&format!("/update/{missing}"), Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .send_json("DELETE", &format!("/api/items/{missing}"), Some(&cookie), json!({}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn api_update_returns_the_new_record() {
    let app = TestApp::new();
    let cookie = app.login_as("alice", "pw1").await;

    let created = body_json(
        app.send_json(
            "POST",
            "/api/items",
            Some(&cookie),
            json!({ "title": "A", "description": "B", "item_type": "habit" }),
        )
        .await,
    )
    .await;
    let id = created["item"]["id"].as_str().unwrap();

    let response = app
        .send_json(
            "PUT",
            &format!("/api/items/{id}"),
            Some(&cookie),
            json!({ "title": "A2", "description": "B2" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["message"], "Item updated");
    assert_eq!(updated["item"]["title"], "A2");
    assert_eq!(updated["item"]["description"], "B2");
    assert_eq!(updated["item"]["item_type"], "habit");
    assert_eq!(updated["item"]["created_at"], created["item"]["created_at"]);
}

#[tokio::test]
async fn session_store_outage_is_a_service_failure() {
    let app = TestApp::with_session_store(Arc::new(UnreachableSessionStore));
    let token = generate_session_token(
        &Uuid::new_v4().to_string(),
        Utc::now().timestamp() + 3600,
        "test-secret",
    )
    .unwrap();
    let cookie = format!("sid={token}");

    let response = app.get("/crud", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(response.headers().get(LOCATION).is_none());
    assert!(
        body_text(response)
            .await
            .contains("Service temporarily unavailable")
    );

    let response = app.get("/api/items", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], 5000);
}

#[tokio::test]
async fn undecodable_api_bodies_use_the_error_contract() {
    let app = TestApp::new();
    let cookie = app.login_as("alice", "pw1").await;

    let response = app
        .send_json(
            "POST",
            "/api/items",
            Some(&cookie),
            json!({ "title": "A", "item_type": "weekly" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], 1000);

    let response = app
        .send(request(
            "POST",
            "/api/items",
            Some(&cookie),
            Some("application/json"),
            Body::from("{not json"),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], 1000);
    assert!(body["error_message"].is_string());

    let response = app
        .send(request(
            "PUT",
            &format!("/api/items/{}", Uuid::new_v4()),
            Some(&cookie),
            None,
            Body::from(r#"{"title":"A"}"#),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], 1000);

    let listed = body_json(app.get("/api/items", Some(&cookie)).await).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn unknown_item_type_rerenders_the_page_form() {
    let app = TestApp::new();
    let cookie = app.login_as("alice", "pw1").await;

    let response = app
        .post_form("/create", Some(&cookie), "title=Keep&description=B&item_type=weekly")
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_text(response).await;
    assert!(body.contains("Unknown item type: weekly"));
    assert!(body.contains("Keep"));

    let response = app
        .send(request(
            "POST",
            "/create",
            Some(&cookie),
            Some("application/json"),
            Body::from(r#"{"title":"A"}"#),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("New item"));

    let listed = body_json(app.get("/api/items", Some(&cookie)).await).await;
    assert_eq!(listed, json!([]));
}
