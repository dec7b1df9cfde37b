use async_trait::async_trait;
use serde::Deserialize;

use crate::config;

use super::{ExternalError, IdentityVerifier, VerifiedIdentity};

/// claims subset returned by the provider's tokeninfo endpoint
#[derive(Debug, Deserialize)]
struct TokenClaims {
    aud: String,
    name: Option<String>,
    email: Option<String>,
    picture: Option<String>,
}

pub struct TokenInfo {
    http: reqwest::Client,
    endpoint: String,
    audience: Option<String>,
}

impl TokenInfo {
    pub fn from_config(config: &config::Config, http: reqwest::Client) -> Self {
        let identity = &config.settings.external.identity;

        TokenInfo {
            http,
            endpoint: identity.endpoint.clone(),
            audience: identity.audience.clone(),
        }
    }
}

#[async_trait]
impl IdentityVerifier for TokenInfo {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, ExternalError> {
        let response = self.http.get(&self.endpoint)
            .query(&[("id_token", token)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExternalError::Rejected);
        }

        let claims: TokenClaims = response.json().await?;

        if let Some(audience) = &self.audience {
            if claims.aud != *audience {
                tracing::warn!("identity token issued for a different audience");

                return Err(ExternalError::Rejected);
            }
        }

        let (Some(name), Some(email)) = (claims.name, claims.email) else {
            return Err(ExternalError::Rejected);
        };

        Ok(VerifiedIdentity {
            name,
            email,
            picture: claims.picture,
        })
    }
}
