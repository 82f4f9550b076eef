//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use mockable::DefaultClock;
use serde_json::{Value, json};

use crate::domain::{AccountService, Repositories, User, UserRole};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{api_routes, validation};
use crate::outbound::memory::MemoryStore;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// In-memory store plus the repositories and HTTP state built over it.
pub struct TestHub {
    pub repos: Repositories,
    pub state: HttpState,
}

impl TestHub {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let repos = store.repositories(Arc::new(DefaultClock));
        let state = HttpState::from_repositories(&repos);
        Self { repos, state }
    }

    /// Create an account directly, bypassing the self-registration rules.
    pub async fn provision(&self, username: &str, role: UserRole) -> User {
        AccountService::new(&self.repos)
            .provision(username, &format!("{username}@komodo.test"), PASSWORD, role)
            .await
            .expect("provision account")
    }

    /// Full API under `/api/v1` with test sessions.
    pub fn app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .app_data(validation::json_config())
            .app_data(validation::path_config())
            .app_data(validation::query_config())
            .wrap(test_session_middleware())
            .service(web::scope("/api/v1").configure(api_routes))
    }
}

/// Password used for every test account.
pub const PASSWORD: &str = "correct-horse";

/// Log in through the API and return the session cookie.
pub async fn login<S>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "username": username, "password": PASSWORD }))
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::OK, "login as {username}");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}

/// Send a request and decode the JSON body, if any.
pub async fn send<S>(app: &S, req: test::TestRequest) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(app, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

/// Numeric `id` field of a JSON entity.
pub fn id_of(value: &Value) -> i64 {
    value
        .get("id")
        .and_then(Value::as_i64)
        .expect("entity id")
}
