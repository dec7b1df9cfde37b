use std::fmt::Write;
use std::time::Duration;

use axum::http::StatusCode;
use axum::http::header::{HeaderValue, SET_COOKIE};
use axum::response::{IntoResponse, IntoResponseParts, Response, ResponseParts};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SetCookie {
    name: String,
    value: String,
    expires: Option<DateTime<Utc>>,
    max_age: Option<Duration>,
    domain: Option<String>,
    path: Option<String>,
    secure: bool,
    http_only: bool,
    same_site: Option<SameSite>,
}

impl SetCookie {
    pub fn new<N, V>(name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        SetCookie {
            name: name.into(),
            value: value.into(),
            expires: None,
            max_age: None,
            domain: None,
            path: None,
            secure: false,
            http_only: false,
            same_site: None,
        }
    }

    pub fn with_expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn with_path<P>(mut self, path: P) -> Self
    where
        P: Into<String>
    {
        self.path = Some(path.into());
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    pub fn set_domain<D>(&mut self, domain: D)
    where
        D: Into<String>
    {
        self.domain = Some(domain.into());
    }
}

impl std::fmt::Display for SetCookie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;

        if let Some(expires) = &self.expires {
            write!(f, "; Expires={}", expires.format("%a, %d %b %Y %H:%M:%S GMT"))?;
        }

        if let Some(max_age) = &self.max_age {
            write!(f, "; Max-Age={}", max_age.as_secs())?;
        }

        if let Some(domain) = &self.domain {
            write!(f, "; Domain={domain}")?;
        }

        if let Some(path) = &self.path {
            write!(f, "; Path={path}")?;
        }

        if self.secure {
            f.write_str("; Secure")?;
        }

        if self.http_only {
            f.write_str("; HttpOnly")?;
        }

        if let Some(same_site) = &self.same_site {
            write!(f, "; SameSite={}", same_site.as_str())?;
        }

        Ok(())
    }
}

impl IntoResponse for SetCookie {
    fn into_response(self) -> Response {
        (self, ()).into_response()
    }
}

impl IntoResponseParts for SetCookie {
    type Error = (StatusCode, &'static str);

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        let mut rendered = String::new();

        write!(&mut rendered, "{self}")
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "failed rendering set-cookie header"))?;

        let value = HeaderValue::from_str(&rendered)
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "invalid set-cookie header value"))?;

        res.headers_mut().append(SET_COOKIE, value);

        Ok(res)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn renders_attributes() {
        let mut cookie = SetCookie::new("session_id", "abc123")
            .with_path("/")
            .with_http_only(true)
            .with_secure(true)
            .with_same_site(SameSite::Strict);
        cookie.set_domain("example.com");

        let rendered = cookie.to_string();

        assert!(rendered.starts_with("session_id=abc123"));
        assert!(rendered.contains("; Domain=example.com"));
        assert!(rendered.contains("; Path=/"));
        assert!(rendered.contains("; Secure"));
        assert!(rendered.contains("; HttpOnly"));
        assert!(rendered.contains("; SameSite=Strict"));
    }

    #[test]
    fn renders_expiry() {
        use chrono::TimeZone;

        let expires = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let cookie = SetCookie::new("session_id", "").with_expires(expires);

        assert!(cookie.to_string().contains("Expires=Thu, 02 Jan 2025 03:04:05 GMT"));

        let dropped = SetCookie::new("session_id", "")
            .with_max_age(Duration::new(0, 0));

        assert!(dropped.to_string().contains("Max-Age=0"));
    }
}
