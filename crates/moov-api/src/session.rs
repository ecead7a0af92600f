//! Cookie-backed identity.
//!
//! The session cookie holds a signed JWT. [`load_session`] decodes it once per
//! request and stores the result as a [`RequestContext`], which handlers
//! extract explicitly instead of reading ambient session state.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use moov_types::Claims;
use tracing::debug;

use crate::error::ErrorPage;
use crate::notice::Notice;
use crate::state::blocking;
use crate::views::ErrorView;
use crate::{AppError, AppState, page};

pub const SESSION_COOKIE: &str = "moov_session";

/// The logged-in user a request acts for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub identity: Option<Identity>,
}

impl RequestContext {
    pub fn require_identity(&self) -> Result<&Identity, AppError> {
        self.identity
            .as_ref()
            .ok_or(AppError::Unauthenticated(Notice::LoginRequired))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_default())
    }
}

pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: chrono::Duration,
}

impl SessionKeys {
    pub fn new(secret: &[u8], ttl: chrono::Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Builds the cookie that logs `identity` in.
    pub fn issue(&self, identity: &Identity) -> Result<Cookie<'static>, AppError> {
        let claims = Claims {
            sub: identity.id,
            name: identity.name.clone(),
            email: identity.email.clone(),
            exp: (chrono::Utc::now() + self.ttl).timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;

        Ok(Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build())
    }

    /// Returns the identity in a token, or `None` if it is forged or expired.
    pub fn verify(&self, token: &str) -> Option<Identity> {
        match decode::<Claims>(token, &self.decoding, &Validation::default()) {
            Ok(data) => Some(Identity {
                id: data.claims.sub,
                name: data.claims.name,
                email: data.claims.email,
            }),
            Err(e) => {
                debug!("Ignoring session cookie: {}", e);
                None
            }
        }
    }
}

/// Cookie that clears the session on the client.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

/// Re-reads the session's user from the database. A token can outlive its
/// account, so handlers that act on the user's own data go through this.
pub async fn current_user(state: &AppState, ctx: &RequestContext) -> Result<Identity, AppError> {
    let user_id = ctx.require_identity()?.id;
    let user = blocking(state, move |db| Ok(db.get_user_by_id(user_id)?)).await?;

    match user {
        Some(user) => Ok(Identity {
            id: user.id,
            name: user.name,
            email: user.email,
        }),
        None => {
            debug!(user_id, "Session refers to a missing user");
            Err(AppError::Unauthenticated(Notice::UserNotFound))
        }
    }
}

/// Decodes the session cookie into a [`RequestContext`] for the handlers.
/// Error pages coming back are re-rendered with the signed-in nav.
pub async fn load_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let identity = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| state.session.verify(cookie.value()));

    req.extensions_mut().insert(RequestContext {
        identity: identity.clone(),
    });
    let mut res = next.run(req).await;

    let Some(identity) = identity else {
        return res;
    };
    match res.extensions_mut().remove::<ErrorPage>() {
        Some(ErrorPage(message)) => {
            let view = ErrorView { message };
            (res.status(), page::render(Some(&identity), &view)).into_response()
        }
        None => res,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity {
            id: 7,
            name: "angel".into(),
            email: "angel@gmail.com".into(),
        }
    }

    #[test]
    fn issued_cookie_verifies_back_to_identity() {
        let keys = SessionKeys::new(b"test-secret", chrono::Duration::hours(1));
        let cookie = keys.issue(&identity()).unwrap();

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(keys.verify(cookie.value()), Some(identity()));
    }

    #[test]
    fn token_from_other_secret_is_ignored() {
        let keys = SessionKeys::new(b"test-secret", chrono::Duration::hours(1));
        let other = SessionKeys::new(b"other-secret", chrono::Duration::hours(1));
        let cookie = other.issue(&identity()).unwrap();

        assert_eq!(keys.verify(cookie.value()), None);
    }

    #[test]
    fn expired_token_is_ignored() {
        let keys = SessionKeys::new(b"test-secret", chrono::Duration::hours(-2));
        let cookie = keys.issue(&identity()).unwrap();

        assert_eq!(keys.verify(cookie.value()), None);
    }

    #[test]
    fn anonymous_context_requires_login() {
        let ctx = RequestContext::default();
        assert!(matches!(
            ctx.require_identity(),
            Err(AppError::Unauthenticated(Notice::LoginRequired))
        ));
    }
}
