//! HTTP server configuration object.

use std::net::SocketAddr;

use komodo_hub::domain::Repositories;
use komodo_hub::inbound::http::session_config::SessionSettings;

/// Everything [`super::create_server`] needs once settings are resolved.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) repositories: Repositories,
}

impl ServerConfig {
    /// Bundle resolved session settings, listen address and repositories.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, repositories: Repositories) -> Self {
        Self {
            session,
            bind_addr,
            repositories,
        }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
