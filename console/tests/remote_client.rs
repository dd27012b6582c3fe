//! End-to-end coverage of the remote client against a canned HTTP server.

mod support;

use std::sync::Arc;
use std::time::Duration;

use article_console::domain::ports::{InMemorySessionStorage, PersistedSession, SessionStorage};
use article_console::domain::{
    Credential, ErrorCode, FetchOutcome, Profile, Query, Resource, Role, Route,
};
use article_console::test_support::fixtures::article;
use article_console::test_support::navigation::RecordingNavigator;
use futures_util::future::join;
use rstest::rstest;
use serde_json::{Value, json};

use support::canned_http::{CannedResponse, CannedServer, RecordedRequest};
use support::console_for;

const ADMIN_TOKEN: &str = "tok-admin";

fn login_ok() -> CannedResponse {
    CannedResponse::json(200, &json!({ "token": ADMIN_TOKEN, "role": "Admin" }))
}

fn profile_ok() -> CannedResponse {
    CannedResponse::json(
        200,
        &json!({ "id": "u-1", "username": "admin", "role": "Admin" }),
    )
}

fn article_page(ids: &[&str], total: u64, page: u32) -> Value {
    let data: Vec<Value> = ids
        .iter()
        .map(|id| serde_json::to_value(article(id, "Title")).expect("article encodes"))
        .collect();
    json!({ "data": data, "total": total, "page": page, "limit": 2 })
}

fn page_number(request: &RecordedRequest) -> Option<u32> {
    request
        .target
        .split_once('?')?
        .1
        .split('&')
        .find_map(|pair| pair.strip_prefix("page="))?
        .parse()
        .ok()
}

/// Handler for the auth endpoints; everything else goes to `rest`.
fn with_auth(
    rest: impl Fn(&RecordedRequest) -> CannedResponse + Send + Sync + 'static,
) -> impl Fn(&RecordedRequest) -> CannedResponse + Send + Sync + 'static {
    move |request| match (request.method.as_str(), request.path()) {
        ("POST", "/api/auth/login") => login_ok(),
        ("GET", "/api/auth/profile") => profile_ok(),
        _ => rest(request),
    }
}

struct Setup {
    server: CannedServer,
    storage: Arc<InMemorySessionStorage>,
    navigator: Arc<RecordingNavigator>,
    console: article_console::Console,
}

async fn signed_in_console(
    rest: impl Fn(&RecordedRequest) -> CannedResponse + Send + Sync + 'static,
) -> Setup {
    let server = CannedServer::start(with_auth(rest)).await;
    let storage = Arc::new(InMemorySessionStorage::default());
    let navigator = Arc::new(RecordingNavigator::default());
    let console = console_for(&server.base_url(), storage.clone(), navigator.clone());
    console
        .login("admin", "password")
        .await
        .expect("login succeeds");
    Setup {
        server,
        storage,
        navigator,
        console,
    }
}

#[rstest]
#[tokio::test]
async fn login_sends_credentials_and_fetches_the_profile() {
    let setup = signed_in_console(|_| CannedResponse::empty(404)).await;

    let login = setup.server.requests_to("POST", "/api/auth/login");
    assert_eq!(
        login.first().map(RecordedRequest::json),
        Some(json!({ "username": "admin", "password": "password" }))
    );
    assert_eq!(login.first().and_then(|r| r.header("authorization")), None);

    let profile = setup.server.requests_to("GET", "/api/auth/profile");
    let bearer = format!("Bearer {ADMIN_TOKEN}");
    assert_eq!(
        profile.first().and_then(|r| r.header("authorization")),
        Some(bearer.as_str())
    );

    let session = setup.console.session().expect("session active");
    assert_eq!(session.user_id().map(AsRef::as_ref), Some("u-1"));
    assert_eq!(setup.navigator.routes(), [Route::ArticlesAdmin]);
    assert!(!setup.storage.is_empty());
}

#[rstest]
#[tokio::test]
async fn a_profile_rejection_after_login_keeps_the_console_logged_out() {
    let server = CannedServer::start(|request| match request.path() {
        "/api/auth/login" => {
            CannedResponse::json(200, &json!({ "token": "revoked", "role": "Admin" }))
        }
        _ => CannedResponse::json(401, &json!({ "message": "Unauthorized" })),
    })
    .await;
    let storage = Arc::new(InMemorySessionStorage::default());
    let navigator = Arc::new(RecordingNavigator::default());
    let console = console_for(&server.base_url(), storage.clone(), navigator.clone());

    let err = console
        .login("admin", "password")
        .await
        .expect_err("credential rejected");

    assert!(matches!(
        err,
        article_console::domain::AuthError::Rejected(ref inner)
            if inner.code() == ErrorCode::Unauthorized
    ));
    assert_eq!(console.session(), None);
    assert!(storage.is_empty());
    assert!(navigator.routes().is_empty());
}

#[rstest]
#[tokio::test]
async fn session_requests_carry_the_bearer_and_a_request_id() {
    let setup = signed_in_console(|request| match request.path() {
        "/api/articles" => CannedResponse::json(200, &article_page(&["a-1", "a-2"], 5, 1)),
        _ => CannedResponse::empty(404),
    })
    .await;

    let view = setup.console.article_list().expect("admin may list");
    view.mount().await.expect("list succeeds");

    let listed = setup.server.requests_to("GET", "/api/articles");
    let request = listed.first().expect("list request sent");
    assert_eq!(request.target, "/api/articles?page=1&limit=2");
    let bearer = format!("Bearer {ADMIN_TOKEN}");
    assert_eq!(request.header("authorization"), Some(bearer.as_str()));
    assert!(request.header("x-request-id").is_some());
    assert_eq!(view.page_count(), 3);
    assert_eq!(view.visible_items().len(), 2);
}

#[rstest]
#[tokio::test]
async fn unauthorized_answers_end_the_session() {
    let setup = signed_in_console(|request| match request.path() {
        "/api/articles" => CannedResponse::json(401, &json!({ "message": "Unauthorized" })),
        _ => CannedResponse::empty(404),
    })
    .await;
    let view = setup.console.article_list().expect("admin may list");

    let err = view.mount().await.expect_err("credential rejected");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(setup.console.session(), None);
    assert!(setup.storage.is_empty());
    assert_eq!(
        setup.navigator.routes(),
        [Route::ArticlesAdmin, Route::Login]
    );

    // A second rejection while logged out does not navigate again.
    let again = setup
        .console
        .articles()
        .fetch(&Query::first(2).expect("valid query"))
        .await
        .expect_err("still rejected");
    assert_eq!(again.code(), ErrorCode::Unauthorized);
    assert_eq!(setup.navigator.routes().len(), 2);
}

#[rstest]
#[tokio::test]
async fn rejected_restore_clears_storage_without_navigating() {
    let server = CannedServer::start(|_| {
        CannedResponse::json(401, &json!({ "message": "Unauthorized" }))
    })
    .await;
    let storage = Arc::new(InMemorySessionStorage::with_session(PersistedSession {
        credential: Credential::new("expired").expect("valid token"),
        profile: Profile::minimal("ana", Role::User),
    }));
    let navigator = Arc::new(RecordingNavigator::default());
    let console = console_for(&server.base_url(), storage.clone(), navigator.clone());

    assert_eq!(console.restore().await, None);

    assert!(storage.is_empty());
    assert!(navigator.routes().is_empty());
    let bearer = server
        .requests_to("GET", "/api/auth/profile")
        .first()
        .and_then(|r| r.header("authorization").map(str::to_owned));
    assert_eq!(bearer.as_deref(), Some("Bearer expired"));
}

#[rstest]
#[tokio::test]
async fn validation_failures_surface_the_server_messages() {
    let setup = signed_in_console(|request| match request.path() {
        "/api/articles" => CannedResponse::json(
            400,
            &json!({ "message": ["categoryId must be a UUID"], "error": "Bad Request" }),
        ),
        _ => CannedResponse::empty(404),
    })
    .await;

    let err = setup
        .console
        .create_article("Title", "<p>body</p>", "c-1")
        .await
        .expect_err("server rejects the draft");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "categoryId must be a UUID");
    assert_eq!(err.status(), Some(400));
    let sent = setup.server.requests_to("POST", "/api/articles");
    assert_eq!(
        sent.first().map(RecordedRequest::json),
        Some(json!({ "title": "Title", "content": "<p>body</p>", "categoryId": "c-1" }))
    );
    assert!(setup.console.articles().items().is_empty());
}

#[rstest]
#[tokio::test]
async fn deletes_hit_the_entity_path() {
    let setup = signed_in_console(|request| match (request.method.as_str(), request.path()) {
        ("DELETE", "/api/categories/c-9") => CannedResponse::empty(204),
        _ => CannedResponse::empty(404),
    })
    .await;

    setup
        .console
        .delete_category("c-9")
        .await
        .expect("delete succeeds");

    assert_eq!(setup.server.requests_to("DELETE", "/api/categories/c-9").len(), 1);
}

#[rstest]
#[tokio::test]
async fn a_slow_older_page_never_overwrites_a_newer_one() {
    let setup = signed_in_console(|request| match (request.path(), page_number(request)) {
        ("/api/articles", Some(2)) => {
            CannedResponse::json(200, &article_page(&["a-3", "a-4"], 4, 2))
                .delayed(Duration::from_millis(300))
        }
        ("/api/articles", Some(1)) => {
            CannedResponse::json(200, &article_page(&["a-1", "a-2"], 4, 1))
        }
        _ => CannedResponse::empty(404),
    })
    .await;
    let store = setup.console.articles();
    let second = Query::first(2)
        .and_then(|query| query.with_page(2))
        .expect("valid query");
    let first = Query::first(2).expect("valid query");

    let (older, newer) = join(store.fetch(&second), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.fetch(&first).await
    })
    .await;

    assert_eq!(older.expect("older fetch"), FetchOutcome::Superseded);
    assert_eq!(newer.expect("newer fetch"), FetchOutcome::Applied);
    let ids: Vec<String> = store
        .items()
        .iter()
        .map(|item| item.id().to_string())
        .collect();
    assert_eq!(ids, ["a-1", "a-2"]);
    assert!(!store.is_loading());
    assert_eq!(setup.server.requests().len(), 4);
}

#[rstest]
#[tokio::test]
async fn unreachable_servers_are_network_errors() {
    let storage: Arc<dyn SessionStorage> = Arc::new(InMemorySessionStorage::default());
    let console = console_for(
        "http://127.0.0.1:9/api",
        storage,
        Arc::new(RecordingNavigator::default()),
    );

    let err = console
        .login("admin", "password")
        .await
        .expect_err("nothing listens on the discard port");

    assert!(matches!(
        err,
        article_console::domain::AuthError::Unavailable(ref inner)
            if inner.code() == ErrorCode::Network
    ));
}
