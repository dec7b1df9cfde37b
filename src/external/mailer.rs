use async_trait::async_trait;
use serde::Serialize;

use crate::config;

use super::{ExternalError, OtpMailer};

pub struct HttpMailer {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    sender: String,
}

#[derive(Debug, Serialize)]
struct Delivery<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: String,
}

impl HttpMailer {
    pub fn from_config(config: &config::Config, http: reqwest::Client) -> Self {
        let mail = &config.settings.external.mail;

        HttpMailer {
            http,
            endpoint: mail.endpoint.clone(),
            api_key: mail.api_key.clone(),
            sender: mail.sender.clone(),
        }
    }
}

#[async_trait]
impl OtpMailer for HttpMailer {
    async fn deliver(&self, email: &str, code: &str) -> Result<(), ExternalError> {
        let delivery = Delivery {
            from: self.sender.as_str(),
            to: email,
            subject: "Your verification code",
            text: format!("Your verification code is {code}. It is valid for 10 minutes."),
        };

        let response = self.http.post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&delivery)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExternalError::Rejected);
        }

        Ok(())
    }
}
