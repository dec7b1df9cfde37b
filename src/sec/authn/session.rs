use facegate_lib::ids;
use chrono::{DateTime, Utc};
use base64::{Engine, engine::general_purpose::URL_SAFE};
use moka::sync::Cache;
use tokio_postgres::{Error as PgError};
use deadpool_postgres::GenericClient;

use crate::sec::state;
use crate::net::error::Error as NetError;
use crate::net::cookie::{SameSite, SetCookie};

pub mod token;

pub const SESSION_TTL_DAYS: i64 = 7;

/// live sessions allowed per user. the next login past this evicts the
/// single oldest session
pub const MAX_SESSIONS_PER_USER: usize = 3;

pub type SessionCache = Cache<token::SessionToken, Session>;

pub enum BuilderError {
    TokenAttempts,
    UtcOverflow,

    Pg(PgError),
    Rand(rand::Error),
}

impl From<PgError> for BuilderError {
    fn from(err: PgError) -> Self {
        BuilderError::Pg(err)
    }
}

impl From<rand::Error> for BuilderError {
    fn from(err: rand::Error) -> Self {
        BuilderError::Rand(err)
    }
}

impl From<token::UniqueError> for BuilderError {
    fn from(err: token::UniqueError) -> Self {
        match err {
            token::UniqueError::Rand(err) => BuilderError::Rand(err),
            token::UniqueError::Pg(err) => BuilderError::Pg(err)
        }
    }
}

impl From<BuilderError> for NetError {
    fn from(err: BuilderError) -> NetError {
        match err {
            BuilderError::TokenAttempts => NetError::new()
                .source("ran out of token attempts"),
            BuilderError::UtcOverflow => NetError::new()
                .source("date time value overflowed"),
            BuilderError::Pg(err) => err.into(),
            BuilderError::Rand(err) => err.into(),
        }
    }
}

pub struct SessionBuilder {
    user_id: ids::UserId,
}

impl SessionBuilder {
    pub async fn build(self, conn: &impl GenericClient) -> Result<Session, BuilderError> {
        let user_id = self.user_id;
        let issued_on = Utc::now();
        let duration = chrono::Duration::days(SESSION_TTL_DAYS);

        let Some(token) = token::SessionToken::unique(conn, 10).await? else {
            return Err(BuilderError::TokenAttempts);
        };

        let Some(expires) = issued_on.clone().checked_add_signed(duration) else {
            return Err(BuilderError::UtcOverflow);
        };

        let _ = conn.execute(
            "\
            insert into auth_session (token, user_id, issued_on, expires) values \
            ($1, $2, $3, $4)",
            &[
                &token.as_slice(),
                &user_id,
                &issued_on,
                &expires,
            ]
        ).await?;

        Ok(Session {
            token,
            user_id,
            issued_on,
            expires,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub token: token::SessionToken,
    pub user_id: ids::UserId,
    pub issued_on: DateTime<Utc>,
    pub expires: DateTime<Utc>,
}

impl Session {
    pub fn builder(user_id: ids::UserId) -> SessionBuilder {
        SessionBuilder { user_id }
    }

    pub async fn retrieve_token(
        conn: &impl GenericClient,
        token: &token::SessionToken
    ) -> Result<Option<Session>, PgError> {
        if let Some(row) = conn.query_opt(
            "\
            select auth_session.token, \
                   auth_session.user_id, \
                   auth_session.issued_on, \
                   auth_session.expires \
            from auth_session \
            where auth_session.token = $1",
            &[&token.as_slice()]
        ).await? {
            Ok(Some(Session {
                token: token::SessionToken::from_vec(row.get(0)),
                user_id: row.get(1),
                issued_on: row.get(2),
                expires: row.get(3),
            }))
        } else {
            Ok(None)
        }
    }

    /// age based check kept separate from store cleanup. an expired row that
    /// has not been swept yet must still fail validation
    pub fn expired(&self, now: &DateTime<Utc>) -> bool {
        self.expires < *now
    }

    pub async fn delete(&self, conn: &impl GenericClient) -> Result<(), PgError> {
        let _ = conn.execute(
            "delete from auth_session where token = $1",
            &[&self.token.as_slice()]
        ).await?;

        Ok(())
    }
}

/// the single converging call for every authentication flow. inserts the
/// session, trims the user to the cap, caches it, and produces the client
/// cookie.
///
/// the load-then-evict pair is not atomic against a second concurrent login
/// for the same user. the cap is a soft limit under concurrency
pub async fn create_session(
    auth: &state::Sec,
    conn: &impl GenericClient,
    user_id: ids::UserId,
) -> Result<(Session, SetCookie), BuilderError> {
    let session = Session::builder(user_id).build(conn).await?;

    let rows = conn.query(
        "\
        select auth_session.token \
        from auth_session \
        where auth_session.user_id = $1 \
        order by auth_session.issued_on asc",
        &[&user_id]
    ).await?;

    if rows.len() > MAX_SESSIONS_PER_USER {
        let oldest = token::SessionToken::from_vec(rows[0].get(0));

        let _ = conn.execute(
            "delete from auth_session where token = $1",
            &[&oldest.as_slice()]
        ).await?;

        auth.session_info().cache().invalidate(&oldest);
    }

    auth.session_info().cache().insert(session.token.clone(), session.clone());

    let cookie = create_session_cookie(auth, &session);

    Ok((session, cookie))
}

pub async fn drop_session(
    auth: &state::Sec,
    conn: &impl GenericClient,
    session: &Session,
) -> Result<(), PgError> {
    session.delete(conn).await?;

    auth.session_info().cache().invalidate(&session.token);

    Ok(())
}

pub type Hash = blake3::Hash;

pub fn create_hash<T>(auth: &state::Sec, token: T) -> Hash
where
    T: AsRef<[u8]>
{
    if let Some(latest) = auth.session_info().keys().first() {
        blake3::keyed_hash(latest, token.as_ref())
    } else {
        blake3::hash(token.as_ref())
    }
}

pub fn encode_base64<T>(token: T, hash: Hash) -> String
where
    T: AsRef<[u8]>
{
    let token_ref = token.as_ref();

    let slice = hash.as_bytes();

    let mut joined = Vec::with_capacity(token_ref.len() + slice.len());
    joined.extend_from_slice(token_ref);
    joined.extend_from_slice(slice);

    URL_SAFE.encode(joined)
}

#[derive(Debug)]
pub enum DecodeError {
    InvalidString,
    InvalidLength,
    InvalidHash,
}

pub fn decode_base64<S>(
    auth: &state::Sec,
    session_id: S
) -> Result<(token::SessionToken, Hash), DecodeError>
where
    S: AsRef<[u8]>
{
    let Ok(mut bytes) = URL_SAFE.decode(session_id) else {
        return Err(DecodeError::InvalidString);
    };

    if bytes.len() != token::SESSION_ID_BYTES + blake3::OUT_LEN {
        return Err(DecodeError::InvalidLength);
    };

    let token = token::SessionToken::drain_vec(&mut bytes);
    let hash: [u8; blake3::OUT_LEN] = bytes.try_into()
        .expect("remaining bytes does not match expected length");
    let given = blake3::Hash::from(hash);

    let keys = auth.session_info().keys();

    if keys.is_empty() {
        let expected = blake3::hash(token.as_slice());

        if given == expected {
            return Ok((token, given));
        }

        return Err(DecodeError::InvalidHash);
    }

    for key in keys {
        let expected = blake3::keyed_hash(key, token.as_slice());

        if given == expected {
            return Ok((token, given));
        }
    }

    Err(DecodeError::InvalidHash)
}

pub fn create_session_cookie(auth: &state::Sec, session: &Session) -> SetCookie {
    let hash = create_hash(auth, &session.token);
    let encoded_token = encode_base64(&session.token, hash);

    let mut cookie = SetCookie::new("session_id", encoded_token)
        .with_expires(session.expires.clone())
        .with_path("/")
        .with_http_only(true)
        .with_secure(*auth.session_info().secure())
        .with_same_site(SameSite::Strict);

    if let Some(domain) = auth.session_info().domain() {
        cookie.set_domain(domain);
    }

    cookie
}

pub fn expire_session_cookie(auth: &state::Sec) -> SetCookie {
    let mut cookie = SetCookie::new("session_id", "")
        .with_max_age(std::time::Duration::new(0, 0))
        .with_path("/")
        .with_http_only(true)
        .with_secure(*auth.session_info().secure())
        .with_same_site(SameSite::Strict);

    if let Some(domain) = auth.session_info().domain() {
        cookie.set_domain(domain);
    }

    cookie
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sec::state;

    fn test_token() -> token::SessionToken {
        let mut bytes = [0u8; token::SESSION_ID_BYTES];

        for (index, value) in bytes.iter_mut().enumerate() {
            *value = index as u8;
        }

        token::SessionToken::from(bytes)
    }

    #[test]
    fn encode_decode_keyed() {
        let auth = state::Sec::with_keys(vec![[7u8; blake3::KEY_LEN]]);
        let token = test_token();

        let hash = create_hash(&auth, &token);
        let encoded = encode_base64(&token, hash);

        let (decoded, decoded_hash) = decode_base64(&auth, &encoded)
            .expect("failed to decode session id");

        assert_eq!(token, decoded, "tokens do not match");
        assert_eq!(hash, decoded_hash, "hashes do not match");
    }

    #[test]
    fn encode_decode_unkeyed() {
        let auth = state::Sec::with_keys(Vec::new());
        let token = test_token();

        let hash = create_hash(&auth, &token);
        let encoded = encode_base64(&token, hash);

        let (decoded, _) = decode_base64(&auth, &encoded)
            .expect("failed to decode session id");

        assert_eq!(token, decoded, "tokens do not match");
    }

    #[test]
    fn decode_rejects_wrong_key() {
        let signer = state::Sec::with_keys(vec![[1u8; blake3::KEY_LEN]]);
        let verifier = state::Sec::with_keys(vec![[2u8; blake3::KEY_LEN]]);
        let token = test_token();

        let encoded = encode_base64(&token, create_hash(&signer, &token));

        assert!(matches!(
            decode_base64(&verifier, &encoded),
            Err(DecodeError::InvalidHash)
        ));
    }

    #[test]
    fn decode_accepts_older_key() {
        let old = state::Sec::with_keys(vec![[1u8; blake3::KEY_LEN]]);
        let rotated = state::Sec::with_keys(vec![
            [2u8; blake3::KEY_LEN],
            [1u8; blake3::KEY_LEN],
        ]);
        let token = test_token();

        let encoded = encode_base64(&token, create_hash(&old, &token));

        assert!(decode_base64(&rotated, &encoded).is_ok());
    }

    #[test]
    fn decode_rejects_truncated() {
        let auth = state::Sec::with_keys(vec![[7u8; blake3::KEY_LEN]]);

        assert!(matches!(
            decode_base64(&auth, "AAAA"),
            Err(DecodeError::InvalidLength)
        ));

        assert!(matches!(
            decode_base64(&auth, "not base64 at all!"),
            Err(DecodeError::InvalidString)
        ));
    }

    #[test]
    fn expiry_predicate() {
        let now = Utc::now();

        let live = Session {
            token: test_token(),
            user_id: 1,
            issued_on: now,
            expires: now + chrono::Duration::days(SESSION_TTL_DAYS),
        };

        assert!(!live.expired(&now));

        let stale = Session {
            token: test_token(),
            user_id: 1,
            issued_on: now - chrono::Duration::days(SESSION_TTL_DAYS + 1),
            expires: now - chrono::Duration::seconds(1),
        };

        assert!(stale.expired(&now));
    }
}
