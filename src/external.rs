use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::config;
use crate::error;
use crate::net::error::Error as NetError;

mod google;
mod mailer;
mod sms;
mod blobs;

#[derive(Debug, thiserror::Error)]
pub enum ExternalError {
    /// the service understood the request and said no. the credential or
    /// code the caller gave is not acceptable
    #[error("external service rejected the given credential")]
    Rejected,

    #[error("external service request failed")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<ExternalError> for NetError {
    fn from(err: ExternalError) -> Self {
        match err {
            ExternalError::Rejected => NetError::new()
                .context("external service rejected the request"),
            ExternalError::Http(err) => NetError::new().source(err),
            ExternalError::Io(err) => NetError::new().source(err),
        }
    }
}

/// profile claims handed back by the identity provider for a valid token
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub name: String,
    pub email: String,
    pub picture: Option<String>,
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, ExternalError>;
}

#[async_trait]
pub trait CodeSender: Send + Sync {
    async fn send(&self, phone: &str) -> Result<(), ExternalError>;

    async fn check(&self, phone: &str, code: &str) -> Result<bool, ExternalError>;
}

#[async_trait]
pub trait OtpMailer: Send + Sync {
    async fn deliver(&self, email: &str, code: &str) -> Result<(), ExternalError>;
}

#[async_trait]
pub trait BlobUploader: Send + Sync {
    /// stores the given bytes and returns an opaque reference usable as an
    /// image_ref on face records
    async fn store(&self, basename: &str, bytes: Bytes) -> Result<String, ExternalError>;
}

pub struct Clients {
    identity: Arc<dyn IdentityVerifier>,
    sms: Arc<dyn CodeSender>,
    mail: Arc<dyn OtpMailer>,
    blobs: Arc<dyn BlobUploader>,
}

impl Clients {
    pub fn from_config(config: &config::Config, http: reqwest::Client) -> error::Result<Clients> {
        tracing::debug!("creating external service clients");

        Ok(Clients {
            identity: Arc::new(google::TokenInfo::from_config(config, http.clone())),
            sms: Arc::new(sms::VerifyService::from_config(config, http.clone())),
            mail: Arc::new(mailer::HttpMailer::from_config(config, http)),
            blobs: Arc::new(blobs::LocalBlobs::from_config(config)?),
        })
    }

    pub fn identity(&self) -> &dyn IdentityVerifier {
        self.identity.as_ref()
    }

    pub fn sms(&self) -> &dyn CodeSender {
        self.sms.as_ref()
    }

    pub fn mail(&self) -> &dyn OtpMailer {
        self.mail.as_ref()
    }

    pub fn blobs(&self) -> &dyn BlobUploader {
        self.blobs.as_ref()
    }
}

impl std::fmt::Debug for Clients {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clients").finish_non_exhaustive()
    }
}
