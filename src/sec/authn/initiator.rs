use std::future::Future;
use std::pin::Pin;

use axum::http::header::{HeaderMap, HeaderValue, GetAll};
use axum::http::request::Parts;
use axum::extract::FromRequestParts;
use deadpool_postgres::GenericClient;

use crate::net::error::{self, ApiErrorKind, AuthKind};
use crate::sec::state;
use crate::state::ArcShared;
use crate::user;

use super::session;

#[derive(Debug)]
pub enum Mechanism {
    Session(session::Session),
}

pub struct Initiator {
    pub user: user::User,
    pub mechanism: Mechanism
}

impl Initiator {
    pub fn user(&self) -> &user::User {
        &self.user
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("session was not found")]
    SessionNotFound,

    #[error("session has expired")]
    SessionExpired(session::Session),

    #[error("user was not found")]
    UserNotFound(Mechanism),

    #[error("no authentication mechanism was found")]
    MechanismNotFound,

    #[error("session id failed decoding")]
    SessionDecode(session::DecodeError),

    #[error(transparent)]
    Database(#[from] tokio_postgres::Error),

    #[error(transparent)]
    HeaderToStr(#[from] axum::http::header::ToStrError),
}

impl From<session::DecodeError> for LookupError {
    fn from(err: session::DecodeError) -> Self {
        LookupError::SessionDecode(err)
    }
}

impl From<LookupError> for error::Error {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::SessionNotFound => error::Error::api(ApiErrorKind::Auth(AuthKind::SessionNotFound)),
            LookupError::SessionExpired(_session) => error::Error::api(ApiErrorKind::Auth(AuthKind::SessionExpired)),

            // a stale session pointing at a removed or soft deleted user
            // reads as not authenticated, not as a 404
            LookupError::UserNotFound(_mechanism) => error::Error::api(ApiErrorKind::Auth(AuthKind::Unauthenticated)),

            LookupError::MechanismNotFound => error::Error::api(ApiErrorKind::Auth(AuthKind::MechanismNotFound)),

            LookupError::Database(e) => e.into(),
            LookupError::HeaderToStr(e) => e.into(),

            LookupError::SessionDecode(_err) => error::Error::api(ApiErrorKind::Auth(AuthKind::InvalidSession)),
        }
    }
}

pub async fn lookup_session_id<S>(
    auth: &state::Sec,
    conn: &impl GenericClient,
    session_id: S
) -> Result<Initiator, LookupError>
where
    S: AsRef<[u8]>
{
    let (token, _hash) = session::decode_base64(auth, session_id)?;

    let session = if let Some(cached) = auth.session_info().cache().get(&token) {
        cached
    } else if let Some(found) = session::Session::retrieve_token(conn, &token).await? {
        found
    } else {
        return Err(LookupError::SessionNotFound);
    };

    let now = chrono::Utc::now();

    if session.expired(&now) {
        auth.session_info().cache().invalidate(&token);

        return Err(LookupError::SessionExpired(session));
    }

    match user::User::retrieve(conn, &session.user_id).await? {
        Some(user) if !user.deleted => Ok(Initiator {
            user,
            mechanism: Mechanism::Session(session),
        }),
        _ => Err(LookupError::UserNotFound(Mechanism::Session(session)))
    }
}

fn find_session_id<'a>(cookies: GetAll<'a, HeaderValue>) -> Result<Option<&'a str>, LookupError> {
    for value in cookies {
        let value_str = value.to_str()?;

        for pair in value_str.split("; ") {
            if let Some((name, value)) = pair.split_once('=') {
                if name == "session_id" {
                    return Ok(Some(value));
                }
            }
        }
    }

    Ok(None)
}

pub async fn lookup_header_map(
    auth: &state::Sec,
    conn: &impl GenericClient,
    headers: &HeaderMap
) -> Result<Initiator, LookupError> {
    let cookies = headers.get_all("cookie");

    if let Some(found) = find_session_id(cookies)? {
        return lookup_session_id(auth, conn, found.as_bytes()).await;
    }

    Err(LookupError::MechanismNotFound)
}

impl FromRequestParts<ArcShared> for Initiator {
    type Rejection = error::Error;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 ArcShared,
    ) -> Pin<Box<dyn Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>>
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait
    {
        Box::pin(async move {
            let conn = state.pool().get().await?;

            Ok(lookup_header_map(state.auth(), &conn, &parts.headers).await?)
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use axum::http::header::HeaderMap;

    #[test]
    fn finds_session_cookie() {
        let mut headers = HeaderMap::new();
        headers.append("cookie", HeaderValue::from_static("theme=dark; session_id=abc123"));

        let found = find_session_id(headers.get_all("cookie"))
            .expect("cookie header failed to parse");

        assert_eq!(found, Some("abc123"));
    }

    #[test]
    fn missing_session_cookie() {
        let mut headers = HeaderMap::new();
        headers.append("cookie", HeaderValue::from_static("theme=dark"));

        let found = find_session_id(headers.get_all("cookie"))
            .expect("cookie header failed to parse");

        assert_eq!(found, None);
    }
}
