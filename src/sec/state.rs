use hkdf::Hkdf;
use sha3::Sha3_512;

use crate::config;
use crate::error;

use super::authn::session::SessionCache;

pub type Kdf = Hkdf<Sha3_512>;

pub type SessionKey = [u8; blake3::KEY_LEN];

#[derive(Debug)]
pub struct SessionInfo {
    keys: Vec<SessionKey>,
    cache: SessionCache,
    domain: Option<String>,
    secure: bool,
}

impl SessionInfo {
    fn new(keys: Vec<SessionKey>, domain: Option<String>, secure: bool) -> Self {
        let cache = SessionCache::builder()
            .name("session_cache")
            .max_capacity(1_000)
            .build();

        SessionInfo {
            keys,
            cache,
            domain,
            secure,
        }
    }

    pub fn from_config(config: &config::Config) -> error::Result<Self> {
        tracing::debug!("creating SessionInfo state");

        let session = &config.settings.sec.session;
        let mut keys = Vec::with_capacity(session.secrets.len());

        for secret in &session.secrets {
            let kdf = Kdf::new(None, secret.as_bytes());
            let mut key = [0u8; blake3::KEY_LEN];

            kdf.expand(facegate_lib::sec::SESSION_KEY_INFO, &mut key)?;

            keys.push(key);
        }

        Ok(SessionInfo::new(
            keys,
            session.domain.clone(),
            session.secure,
        ))
    }

    /// newest first. older keys only verify, never sign
    pub fn keys(&self) -> &[SessionKey] {
        &self.keys
    }

    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    pub fn domain(&self) -> Option<&String> {
        self.domain.as_ref()
    }

    pub fn secure(&self) -> &bool {
        &self.secure
    }
}

#[derive(Debug)]
pub struct Sec {
    session_info: SessionInfo,
}

impl Sec {
    pub fn from_config(config: &config::Config) -> error::Result<Sec> {
        tracing::debug!("creating Sec state");

        Ok(Sec {
            session_info: SessionInfo::from_config(config)?,
        })
    }

    #[cfg(test)]
    pub fn with_keys(keys: Vec<SessionKey>) -> Sec {
        Sec {
            session_info: SessionInfo::new(keys, None, false),
        }
    }

    pub fn session_info(&self) -> &SessionInfo {
        &self.session_info
    }
}
