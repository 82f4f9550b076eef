//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix cookie session so handlers only deal with the logged-in
//! user id and the explicit [`Actor`] passed to the domain services.

use std::net::IpAddr;

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Actor, Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Session handle plus the caller's network origin.
#[derive(Clone)]
pub struct SessionContext {
    session: Session,
    origin: Option<IpAddr>,
}

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session, origin: Option<IpAddr>) -> Self {
        Self { session, origin }
    }

    /// Peer address of the connection, when known.
    pub fn origin(&self) -> Option<IpAddr> {
        self.origin
    }

    /// Persist the authenticated user's id in the session cookie.
    ///
    /// The session is renewed first so a pre-login cookie cannot be reused.
    pub fn persist_user(&self, user_id: UserId) -> Result<(), Error> {
        self.session.renew();
        self.session
            .insert(USER_ID_KEY, user_id.get())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current user id from the session, if present.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        match self.session.get::<i64>(USER_ID_KEY) {
            Ok(id) => Ok(id.map(UserId::new)),
            Err(error) => {
                tracing::warn!("invalid user id in session cookie: {error}");
                Ok(None)
            }
        }
    }

    /// Require an authenticated user id or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Acting identity for a request that requires login.
    pub fn require_actor(&self) -> Result<Actor, Error> {
        Ok(Actor::new(self.require_user_id()?, self.origin))
    }

    /// Acting identity when logged in, `None` for anonymous callers.
    pub fn actor(&self) -> Result<Option<Actor>, Error> {
        Ok(self.user_id()?.map(|id| Actor::new(id, self.origin)))
    }

    /// Drop every session entry and expire the cookie.
    pub fn logout(&self) {
        self.session.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let origin = req.peer_addr().map(|addr| addr.ip());
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(|session| SessionContext::new(session, origin)) })
    }
}
