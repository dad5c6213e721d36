use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use btech_buddy::db::db::Db;
use btech_buddy::libs::config::Config;
use btech_buddy::libs::secret::SessionKey;
use btech_buddy::web::router;
use btech_buddy::web::state::AppState;
use tempfile::TempDir;
use tower::ServiceExt;

fn app() -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("buddy.db");
    Db::open(&path).unwrap();
    let state = AppState::new(path, SessionKey::from_secret("test"), &Config::default());
    (router(state), dir)
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut request = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    request.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    request.body(Body::from(body.to_string())).unwrap()
}

fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn register(app: &Router, name: &str, email: &str) {
    let body = format!(
        "name={}&email={}&password=secret123",
        urlencoding::encode(name),
        urlencoding::encode(email)
    );
    let registered = app.clone().oneshot(post_form("/register", &body, None)).await.unwrap();
    assert_eq!(registered.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&registered), "/login");
}

/// Logs in, optionally presenting an existing cookie, and returns the new
/// `Cookie` header value.
async fn sign_in(app: &Router, email: &str, cookie: Option<&str>) -> String {
    let body = format!("email={}&password=secret123", urlencoding::encode(email));
    let logged_in = app.clone().oneshot(post_form("/login", &body, cookie)).await.unwrap();
    assert_eq!(logged_in.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&logged_in), "/dashboard");

    let set_cookie = logged_in.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    set_cookie.split(';').next().unwrap().to_string()
}

/// Registers Asha and logs in, returning the `Cookie` header value.
async fn login(app: &Router) -> String {
    register(app, "Asha", "asha@example.com").await;
    sign_in(app, "asha@example.com", None).await
}

async fn me(app: &Router, cookie: &str) -> Response {
    app.clone().oneshot(get("/api/me", Some(cookie))).await.unwrap()
}

#[tokio::test]
async fn test_healthz() {
    let (app, _dir) = app();
    let response = app.oneshot(get("/healthz", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_anonymous_pages_redirect_to_login() {
    let (app, _dir) = app();

    let home = app.clone().oneshot(get("/", None)).await.unwrap();
    assert_eq!(home.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&home), "/login");

    let dashboard = app.clone().oneshot(get("/dashboard", None)).await.unwrap();
    assert_eq!(dashboard.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&dashboard), "/login");

    let forged = app
        .oneshot(get("/tasks", Some("buddy_session=forged.value")))
        .await
        .unwrap();
    assert_eq!(location(&forged), "/login");
}

#[tokio::test]
async fn test_anonymous_api_gets_401_json() {
    let (app, _dir) = app();
    let response = app.oneshot(get("/api/me", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_login_flow() {
    let (app, _dir) = app();
    let cookie = login(&app).await;

    let me = app.clone().oneshot(get("/api/me", Some(&cookie))).await.unwrap();
    assert_eq!(me.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(me).await).unwrap();
    assert_eq!(json["email"], "asha@example.com");
    assert!(json.get("password_hash").is_none());

    let dashboard = app.clone().oneshot(get("/dashboard", Some(&cookie))).await.unwrap();
    assert_eq!(dashboard.status(), StatusCode::OK);

    let logout = app.clone().oneshot(post_form("/logout", "", Some(&cookie))).await.unwrap();
    assert_eq!(logout.status(), StatusCode::SEE_OTHER);
    let after = app.oneshot(get("/api/me", Some(&cookie))).await.unwrap();
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bad_login_rerenders_with_400() {
    let (app, _dir) = app();
    login(&app).await;

    let response = app
        .oneshot(post_form("/login", "email=asha%40example.com&password=wrong-one", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert!(body_text(response).await.contains("Invalid email or password."));
}

#[tokio::test]
async fn test_duplicate_registration_is_400() {
    let (app, _dir) = app();
    login(&app).await;

    let response = app
        .oneshot(post_form(
            "/register",
            "name=Other&email=ASHA%40example.com&password=secret123",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_subject_form_round_trip() {
    let (app, _dir) = app();
    let cookie = login(&app).await;

    let invalid = app
        .clone()
        .oneshot(post_form("/subjects/add", "name=&target_attendance=80", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

    let added = app
        .clone()
        .oneshot(post_form(
            "/subjects/add",
            "name=Physics&code=PH101&credits=3&target_attendance=80",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(added.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&added), "/subjects");

    let listed = app.oneshot(get("/api/subjects", Some(&cookie))).await.unwrap();
    let json: serde_json::Value = serde_json::from_str(&body_text(listed).await).unwrap();
    assert_eq!(json[0]["name"], "Physics");
    assert_eq!(json[0]["target_attendance"], 80.0);
}

#[tokio::test]
async fn test_task_toggle() {
    let (app, _dir) = app();
    let cookie = login(&app).await;

    let added = app
        .clone()
        .oneshot(post_form("/tasks/add", "title=Lab+report&priority=high", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(added.status(), StatusCode::SEE_OTHER);

    let open = app.clone().oneshot(get("/api/tasks", Some(&cookie))).await.unwrap();
    let json: serde_json::Value = serde_json::from_str(&body_text(open).await).unwrap();
    let id = json[0]["id"].as_i64().unwrap();

    for _ in 0..2 {
        let done = app
            .clone()
            .oneshot(post_form(
                "/tasks/toggle",
                &format!("task_id={id}&next_status=done"),
                Some(&cookie),
            ))
            .await
            .unwrap();
        assert_eq!(done.status(), StatusCode::SEE_OTHER);
    }

    let finished = app.oneshot(get("/api/tasks?status=done", Some(&cookie))).await.unwrap();
    let json: serde_json::Value = serde_json::from_str(&body_text(finished).await).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["status"], "done");
}

#[tokio::test]
async fn test_login_replaces_the_presented_session() {
    let (app, _dir) = app();
    register(&app, "Asha", "asha@example.com").await;
    register(&app, "Ravi", "ravi@example.com").await;

    let asha = sign_in(&app, "asha@example.com", None).await;
    let ravi = sign_in(&app, "ravi@example.com", Some(&asha)).await;
    assert_ne!(asha, ravi);

    assert_eq!(me(&app, &asha).await.status(), StatusCode::UNAUTHORIZED);

    let response = me(&app, &ravi).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["email"], "ravi@example.com");
}

#[tokio::test]
async fn test_tag_links_survive_special_characters() {
    let (app, _dir) = app();
    let cookie = login(&app).await;

    for body in [
        "title=Cpp+reference&url=https%3A%2F%2Fen.cppreference.com&tags=c%2B%2B",
        "title=K%26R+notes&url=https%3A%2F%2Fexample.com%2Fkr&tags=c",
    ] {
        let added = app
            .clone()
            .oneshot(post_form("/resources/add", body, Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(added.status(), StatusCode::SEE_OTHER);
    }

    let page = app.clone().oneshot(get("/resources", Some(&cookie))).await.unwrap();
    let html = body_text(page).await;
    let marker = "href='/resources?tag=c%2B%2B'";
    assert!(html.contains(marker));

    let filtered = app
        .oneshot(get("/resources?tag=c%2B%2B", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(filtered.status(), StatusCode::OK);
    let html = body_text(filtered).await;
    assert!(html.contains("Cpp reference"));
    assert!(!html.contains("K&amp;R notes"));
}

#[tokio::test]
async fn test_practice_link_must_be_http() {
    let (app, _dir) = app();
    let cookie = login(&app).await;

    let rejected = app
        .clone()
        .oneshot(post_form(
            "/coding/add",
            "platform=LeetCode&problem=Two+Sum&link=javascript%3Aalert(document.cookie)",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);

    let accepted = app
        .clone()
        .oneshot(post_form(
            "/coding/add",
            "platform=LeetCode&problem=Two+Sum&link=https%3A%2F%2Fleetcode.com%2Fproblems%2Ftwo-sum",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(accepted.status(), StatusCode::SEE_OTHER);

    let log = app.oneshot(get("/api/practice", Some(&cookie))).await.unwrap();
    let json: serde_json::Value = serde_json::from_str(&body_text(log).await).unwrap();
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["link"], "https://leetcode.com/problems/two-sum");
}
