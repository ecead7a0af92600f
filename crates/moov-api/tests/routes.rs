use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use moov_api::catalog::VenueCatalog;
use moov_api::session::{Identity, SessionKeys};
use moov_api::{AppState, AppStateInner, router};
use moov_db::Database;
use moov_db::models::{NewEvent, VenueRow};
use moov_types::Price;

struct TestApp {
    _dir: tempfile::TempDir,
    state: AppState,
    router: Router,
}

fn app_with_venues(venues: Vec<VenueRow>) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(&dir.path().join("routes.db")).unwrap();
    db.replace_venues(&venues).unwrap();

    let state: AppState = Arc::new(AppStateInner {
        db,
        venues: VenueCatalog::new(venues),
        session: SessionKeys::new(b"route-test-secret", chrono::Duration::hours(1)),
    });
    TestApp {
        _dir: dir,
        router: router(state.clone()),
        state,
    }
}

fn app() -> TestApp {
    app_with_venues(vec![])
}

struct Reply {
    status: StatusCode,
    location: Option<String>,
    cookie: Option<String>,
    body: String,
}

async fn send(app: &TestApp, req: Request<Body>) -> Reply {
    let res = app.router.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let location = res
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let cookie = res.headers().get(header::SET_COOKIE).map(|v| {
        let raw = v.to_str().unwrap();
        raw.split(';').next().unwrap().to_string()
    });
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    Reply {
        status,
        location,
        cookie,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post(uri: &str, form: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

async fn signup(app: &TestApp, name: &str, password: &str) {
    let form = format!("username={name}&email={name}%40example.com&password={password}");
    let reply = send(app, post("/signup", &form, None)).await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/login?notice=signed_up"));
}

async fn login(app: &TestApp, name: &str, password: &str) -> String {
    let form = format!("username={name}&password={password}");
    let reply = send(app, post("/login", &form, None)).await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/?notice=logged_in"));
    reply.cookie.expect("login sets the session cookie")
}

fn host_event(app: &TestApp, name: &str, cents: i64) {
    app.state
        .db
        .create_event(&NewEvent {
            name,
            venue: "Fox Theatre",
            date_time: "Friday 8pm",
            ticket_price: Price::from_cents(cents),
        })
        .unwrap();
}

#[tokio::test]
async fn signup_login_and_message_round_trip() {
    let app = app();
    signup(&app, "angel", "12345678").await;
    signup(&app, "sarah", "loser").await;
    let sarah_id = app.state.db.get_user_by_name("sarah").unwrap().unwrap().id;

    let angel = login(&app, "angel", "12345678").await;
    let form = format!("receiver_id={sarah_id}&content=see+you+at+the+show");
    let sent = send(&app, post("/messages", &form, Some(&angel))).await;
    assert_eq!(sent.status, StatusCode::SEE_OTHER);
    assert_eq!(sent.location.as_deref(), Some("/messages"));

    let listing = send(&app, get("/messages", Some(&angel))).await;
    assert_eq!(listing.status, StatusCode::OK);
    assert_eq!(listing.body.matches("see you at the show").count(), 1);
    assert!(listing.body.contains("angel &rarr; sarah"));

    let sarah = login(&app, "sarah", "loser").await;
    let home = send(&app, get("/", Some(&sarah))).await;
    assert!(home.body.contains("Welcome, sarah!"));
    assert!(home.body.contains("From angel:"));
    assert!(home.body.contains("see you at the show"));
}

#[tokio::test]
async fn redirect_targets_show_their_notices() {
    let app = app();
    let signed_up = send(&app, get("/login?notice=signed_up", None)).await;
    assert!(signed_up.body.contains("Signup successful! Please login."));

    let required = send(&app, get("/login?notice=login_required", None)).await;
    assert!(required.body.contains("Please login to continue."));

    let logged_out = send(&app, get("/?notice=logged_out", None)).await;
    assert!(logged_out.body.contains("You have been logged out."));

    let unknown = send(&app, get("/?notice=bogus", None)).await;
    assert_eq!(unknown.status, StatusCode::OK);
    assert!(!unknown.body.contains("class=\"notice\""));
}

#[tokio::test]
async fn login_lands_on_home_with_a_greeting() {
    let app = app();
    signup(&app, "angel", "12345678").await;
    let cookie = login(&app, "angel", "12345678").await;

    let home = send(&app, get("/?notice=logged_in", Some(&cookie))).await;
    assert!(home.body.contains("Login successful!"));
    assert!(home.body.contains("Welcome, angel!"));
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let app = app();
    signup(&app, "angel", "12345678").await;

    let reply = send(&app, post("/login", "username=angel&password=nope", None)).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert!(reply.cookie.is_none());
    assert!(reply.body.contains("Invalid credentials. Please try again."));
    assert!(reply.body.contains("action=\"/login\""));

    let unknown = send(&app, post("/login", "username=nobody&password=nope", None)).await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_email_signup_conflicts() {
    let app = app();
    signup(&app, "angel", "12345678").await;

    let form = "username=angela&email=angel%40example.com&password=x";
    let reply = send(&app, post("/signup", form, None)).await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert!(reply.body.contains("Email already exists"));
    assert!(app.state.db.get_user_by_name("angela").unwrap().is_none());
}

#[tokio::test]
async fn purchase_respects_inventory() {
    let app = app();
    host_event(&app, "Jazz Night", 1250);

    let ok = send(&app, post("/purchase", "event_name=Jazz+Night&ticket_quantity=3", None)).await;
    assert_eq!(ok.status, StatusCode::OK);
    assert!(ok.body.contains("Purchase Successful"));
    assert!(ok.body.contains("Total: $37.50"));

    let too_many =
        send(&app, post("/purchase", "event_name=Jazz+Night&ticket_quantity=98", None)).await;
    assert_eq!(too_many.status, StatusCode::CONFLICT);
    assert!(too_many.body.contains("Only 97 tickets are available for 'Jazz Night'."));

    let event = app.state.db.get_event_by_name("Jazz Night").unwrap().unwrap();
    assert_eq!(event.available_tickets, 97);
}

#[tokio::test]
async fn purchase_rejects_unknown_events_and_bad_quantities() {
    let app = app();
    host_event(&app, "Jazz Night", 1250);

    let missing = send(&app, post("/purchase", "event_name=Blues&ticket_quantity=1", None)).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let word = send(&app, post("/purchase", "event_name=Jazz+Night&ticket_quantity=two", None)).await;
    assert_eq!(word.status, StatusCode::BAD_REQUEST);

    let zero = send(&app, post("/purchase", "event_name=Jazz+Night&ticket_quantity=0", None)).await;
    assert_eq!(zero.status, StatusCode::BAD_REQUEST);

    let event = app.state.db.get_event_by_name("Jazz Night").unwrap().unwrap();
    assert_eq!(event.available_tickets, 100);
}

#[tokio::test]
async fn hosting_requires_login() {
    let app = app();

    let anonymous = send(&app, get("/host", None)).await;
    assert_eq!(anonymous.status, StatusCode::SEE_OTHER);
    assert_eq!(
        anonymous.location.as_deref(),
        Some("/login?notice=login_required")
    );

    let form = "event_name=Gala&venue=Fox+Theatre&date_time=Sat&ticket_price=40";
    let rejected = send(&app, post("/host", form, None)).await;
    assert_eq!(rejected.status, StatusCode::SEE_OTHER);
    assert!(app.state.db.get_event_by_name("Gala").unwrap().is_none());

    signup(&app, "angel", "12345678").await;
    let cookie = login(&app, "angel", "12345678").await;
    let hosted = send(&app, post("/host", form, Some(&cookie))).await;
    assert_eq!(hosted.status, StatusCode::OK);
    assert!(hosted.body.contains("successfully hosted"));

    let event = app.state.db.get_event_by_name("Gala").unwrap().unwrap();
    assert_eq!(event.available_tickets, 100);
    assert_eq!(event.ticket_price, Price::from_cents(4000));
}

#[tokio::test]
async fn search_distinguishes_no_data_from_no_match() {
    let empty = app();
    let reply = send(&empty, post("/search", "query=fox", None)).await;
    assert!(reply.body.contains("No venue data available"));

    let loaded = app_with_venues(vec![VenueRow {
        name: "Fox Theatre".into(),
        kind: "Theater".into(),
        details: vec![],
    }]);
    let miss = send(&loaded, post("/search", "query=stadium", None)).await;
    assert!(miss.body.contains("No results found"));

    let hit = send(&loaded, post("/search", "query=FOX", None)).await;
    assert!(hit.body.contains("<td>Fox Theatre</td>"));

    let listing = send(&loaded, get("/venues", None)).await;
    assert!(listing.body.contains("<li>Fox Theatre</li>"));
}

#[tokio::test]
async fn forged_session_is_treated_as_anonymous() {
    let app = app();
    let reply = send(&app, get("/profile", Some("moov_session=not-a-token"))).await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(
        reply.location.as_deref(),
        Some("/login?notice=login_required")
    );
}

#[tokio::test]
async fn logout_clears_the_cookie() {
    let app = app();
    signup(&app, "angel", "12345678").await;
    let cookie = login(&app, "angel", "12345678").await;

    let reply = send(&app, get("/logout", Some(&cookie))).await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/?notice=logged_out"));
    assert_eq!(reply.cookie.as_deref(), Some("moov_session="));
}

#[tokio::test]
async fn error_pages_keep_the_signed_in_nav() {
    let app = app();
    host_event(&app, "Jazz Night", 1250);
    signup(&app, "angel", "12345678").await;
    let cookie = login(&app, "angel", "12345678").await;

    let form = "event_name=Jazz+Night&ticket_quantity=101";
    let reply = send(&app, post("/purchase", form, Some(&cookie))).await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert!(reply.body.contains("Only 100 tickets are available"));
    assert!(reply.body.contains("Signed in as angel"));
    assert!(!reply.body.contains("href=\"/login\""));

    let anonymous = send(&app, post("/purchase", form, None)).await;
    assert!(anonymous.body.contains("href=\"/login\""));
}

#[tokio::test]
async fn session_for_a_deleted_user_is_sent_to_login() {
    let app = app();
    let ghost = app
        .state
        .session
        .issue(&Identity {
            id: 999,
            name: "ghost".into(),
            email: "ghost@example.com".into(),
        })
        .unwrap();
    let cookie = format!("{}={}", ghost.name(), ghost.value());

    for uri in ["/", "/messages", "/profile"] {
        let reply = send(&app, get(uri, Some(&cookie))).await;
        assert_eq!(reply.status, StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(
            reply.location.as_deref(),
            Some("/login?notice=user_not_found"),
            "{uri}"
        );
    }

    let sent = send(&app, post("/messages", "receiver_id=1&content=hi", Some(&cookie))).await;
    assert_eq!(sent.location.as_deref(), Some("/login?notice=user_not_found"));
    assert!(app.state.db.messages_for_user(999).unwrap().is_empty());

    let page = send(&app, get("/login?notice=user_not_found", None)).await;
    assert!(page.body.contains("User not found."));
}

#[tokio::test]
async fn message_dump_route_does_not_exist() {
    let app = app();
    let reply = send(&app, get("/debug_messages", None)).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app();
    let reply = send(&app, get("/health", None)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, "ok");
}
