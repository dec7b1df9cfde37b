use facegate_lib::sec::authn::OTP_TTL_SECS;

use chrono::{DateTime, Utc};
use rand::Rng;
use tokio_postgres::{Error as PgError};
use deadpool_postgres::GenericClient;

pub fn generate_code() -> String {
    let code: u32 = rand::thread_rng().gen_range(1_000..10_000);

    code.to_string()
}

/// email one time code record. state transitions replace the row wholesale,
/// there is no partial update path
#[derive(Debug, Clone)]
pub struct EmailOtp {
    pub email: String,
    pub code: String,
    pub verified: bool,
    pub expires: DateTime<Utc>,
}

impl EmailOtp {
    /// creates a fresh unverified record for the email, replacing whatever
    /// record was there before
    pub async fn upsert(
        conn: &impl GenericClient,
        email: &str,
    ) -> Result<EmailOtp, PgError> {
        let code = generate_code();
        let verified = false;
        let expires = Utc::now() + chrono::Duration::seconds(OTP_TTL_SECS);

        let _ = conn.execute(
            "\
            insert into auth_otp (email, code, verified, expires) values \
            ($1, $2, $3, $4) \
            on conflict (email) do update \
            set code = excluded.code, \
                verified = excluded.verified, \
                expires = excluded.expires",
            &[&email, &code, &verified, &expires]
        ).await?;

        Ok(EmailOtp {
            email: email.to_owned(),
            code,
            verified,
            expires,
        })
    }

    pub async fn retrieve(
        conn: &impl GenericClient,
        email: &str,
    ) -> Result<Option<EmailOtp>, PgError> {
        if let Some(row) = conn.query_opt(
            "\
            select auth_otp.email, \
                   auth_otp.code, \
                   auth_otp.verified, \
                   auth_otp.expires \
            from auth_otp \
            where auth_otp.email = $1",
            &[&email]
        ).await? {
            Ok(Some(EmailOtp {
                email: row.get(0),
                code: row.get(1),
                verified: row.get(2),
                expires: row.get(3),
            }))
        } else {
            Ok(None)
        }
    }

    pub fn expired(&self, now: &DateTime<Utc>) -> bool {
        self.expires < *now
    }

    pub async fn mark_verified(mut self, conn: &impl GenericClient) -> Result<EmailOtp, PgError> {
        self.verified = true;

        let _ = conn.execute(
            "\
            update auth_otp \
            set code = $2, \
                verified = $3, \
                expires = $4 \
            where email = $1",
            &[&self.email, &self.code, &self.verified, &self.expires]
        ).await?;

        Ok(self)
    }

    pub async fn delete(&self, conn: &impl GenericClient) -> Result<(), PgError> {
        let _ = conn.execute(
            "delete from auth_otp where email = $1",
            &[&self.email]
        ).await?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use facegate_lib::sec::authn::OTP_DIGITS;

    #[test]
    fn code_shape() {
        for _ in 0..100 {
            let code = generate_code();

            assert_eq!(code.len(), OTP_DIGITS, "unexpected code {code}");
            assert!(code.chars().all(|ch| ch.is_ascii_digit()), "unexpected code {code}");
            assert!(facegate_lib::sec::authn::otp_valid(&code));
        }
    }

    #[test]
    fn expiry_predicate() {
        let now = Utc::now();

        let live = EmailOtp {
            email: String::from("person@example.com"),
            code: generate_code(),
            verified: false,
            expires: now + chrono::Duration::seconds(OTP_TTL_SECS),
        };

        assert!(!live.expired(&now));

        let stale = EmailOtp {
            expires: now - chrono::Duration::seconds(1),
            ..live
        };

        assert!(stale.expired(&now));
    }
}
