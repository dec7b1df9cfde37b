use async_trait::async_trait;
use serde::Deserialize;

use crate::config;

use super::{CodeSender, ExternalError};

/// phone verification service in the shape of twilio verify. the service
/// keeps the code state, we only start verifications and check codes
pub struct VerifyService {
    http: reqwest::Client,
    endpoint: String,
    account: String,
    secret: String,
}

#[derive(Debug, Deserialize)]
struct VerificationStatus {
    status: String,
}

impl VerifyService {
    pub fn from_config(config: &config::Config, http: reqwest::Client) -> Self {
        let sms = &config.settings.external.sms;

        VerifyService {
            http,
            endpoint: sms.endpoint.clone(),
            account: sms.account.clone(),
            secret: sms.secret.clone(),
        }
    }
}

#[async_trait]
impl CodeSender for VerifyService {
    async fn send(&self, phone: &str) -> Result<(), ExternalError> {
        let url = format!("{}/Verifications", self.endpoint);

        let response = self.http.post(url)
            .basic_auth(&self.account, Some(&self.secret))
            .form(&[("To", phone), ("Channel", "sms")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExternalError::Rejected);
        }

        Ok(())
    }

    async fn check(&self, phone: &str, code: &str) -> Result<bool, ExternalError> {
        let url = format!("{}/VerificationCheck", self.endpoint);

        let response = self.http.post(url)
            .basic_auth(&self.account, Some(&self.secret))
            .form(&[("To", phone), ("Code", code)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(false);
        }

        let check: VerificationStatus = response.json().await?;

        Ok(check.status == "approved")
    }
}
