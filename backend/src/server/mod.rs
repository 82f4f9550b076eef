//! Server construction and middleware wiring.

mod config;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::AppSettings;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

use komodo_hub::Trace;
#[cfg(debug_assertions)]
use komodo_hub::doc::ApiDoc;
use komodo_hub::inbound::http::api_routes;
use komodo_hub::inbound::http::health::{HealthState, live, ready};
use komodo_hub::inbound::http::session_config::fingerprint::key_fingerprint;
use komodo_hub::inbound::http::session_config::{BuildMode, SessionOptions, session_settings};
use komodo_hub::inbound::http::state::HttpState;
use komodo_hub::inbound::http::validation::{json_config, path_config, query_config};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use state_builders::{bootstrap_admin, build_http_state, build_repositories, ensure_upload_dir};

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1").wrap(session).configure(api_routes);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .app_data(path_config())
        .app_data(query_config())
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Resolve settings into a [`ServerConfig`]: session key and cookie policy,
/// listen address, repositories and the optional bootstrap admin.
///
/// # Errors
///
/// Fails on invalid session settings, a malformed bind address, an
/// unreachable database or a failed admin bootstrap.
pub async fn prepare(settings: &AppSettings) -> Result<ServerConfig> {
    let key_file = settings.session_key_file();
    let session = session_settings(
        &SessionOptions {
            key_file: &key_file,
            allow_ephemeral: settings.session_allow_ephemeral,
            cookie_secure: settings.cookie_secure(),
            same_site: settings.same_site(),
        },
        BuildMode::from_debug_assertions(),
    )
    .wrap_err("invalid session configuration")?;
    info!(fingerprint = %key_fingerprint(&session.key), "session key loaded");

    let bind_addr = settings.bind_addr().wrap_err("invalid bind address")?;
    ensure_upload_dir(&settings.upload_dir())?;
    let repositories = build_repositories(settings).await?;
    if let Some(admin) = settings.admin_bootstrap() {
        bootstrap_admin(&repositories, &admin).await?;
    }
    Ok(ServerConfig::new(session, bind_addr, repositories))
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config.repositories);
    let ServerConfig { session, bind_addr, .. } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: session.key.clone(),
            cookie_secure: session.cookie_secure,
            same_site: session.same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "listening");
    health_state.mark_ready();
    Ok(server)
}
