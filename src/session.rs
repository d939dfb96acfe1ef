//! Explicit per-browser session state: the login context and the state of
//! each listing view, both kept in the signed cookie session.

use std::future::{Ready, ready};

use actix_session::{Session, SessionExt, SessionInsertError};
use actix_web::{FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized};
use serde::{Deserialize, Serialize};

use crate::view::ViewState;

const CONTEXT_KEY: &str = "context";

/// Session key of the posts listing state.
pub const POSTS_VIEW_KEY: &str = "posts_view";
/// Session key of the members listing state.
pub const MEMBERS_VIEW_KEY: &str = "members_view";

/// Who is logged in and the bearer token issued to them.
///
/// Created on login, removed on logout, and handed explicitly to anything that
/// needs to act on the user's behalf.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionContext {
    pub token: String,
    pub email: String,
}

impl SessionContext {
    pub fn new(token: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            email: email.into(),
        }
    }

    pub fn load(session: &Session) -> Option<Self> {
        match session.get::<Self>(CONTEXT_KEY) {
            Ok(context) => context,
            Err(err) => {
                log::error!("Failed to read session context: {err}");
                None
            }
        }
    }

    /// Starts a fresh session holding this context.
    pub fn init(&self, session: &Session) -> Result<(), SessionInsertError> {
        session.renew();
        session.insert(CONTEXT_KEY, self)
    }

    /// Drops the context together with every view state.
    pub fn clear(session: &Session) {
        session.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let session = req.get_session();
        ready(Self::load(&session).ok_or_else(|| ErrorUnauthorized("login required")))
    }
}

/// Reads the stored state of a listing view, falling back to page one with
/// an empty query.
pub fn load_view_state(session: &Session, key: &str) -> ViewState {
    session
        .get::<ViewState>(key)
        .unwrap_or_else(|err| {
            log::error!("Failed to read view state {key}: {err}");
            None
        })
        .unwrap_or_default()
}

pub fn store_view_state(session: &Session, key: &str, state: &ViewState) {
    if let Err(err) = session.insert(key, state) {
        log::error!("Failed to store view state {key}: {err}");
    }
}
