use http::StatusCode;
use axum_core::response::{Response, IntoResponse};
use serde::{Serialize, Deserialize};
use strum::{AsRefStr as StrumAsRefStr};

use crate::response::{serialize_json, error_json};

#[derive(
    Debug, Clone, PartialEq, Eq,
    StrumAsRefStr,
    Serialize, Deserialize
)]
pub enum AuthKind {
    PermissionDenied,
    Unauthenticated,
    AlreadyAuthenticated,

    InvalidCredentials,
    InvalidOtp,
    OtpUnverified,

    InvalidSession,
    SessionExpired,
    SessionNotFound,

    MechanismNotFound
}

impl std::fmt::Display for AuthKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self.as_ref(), f)
    }
}

impl From<&AuthKind> for StatusCode {
    fn from(kind: &AuthKind) -> Self {
        match kind {
            AuthKind::PermissionDenied => StatusCode::FORBIDDEN,
            AuthKind::Unauthenticated |
            AuthKind::InvalidSession |
            AuthKind::SessionExpired |
            AuthKind::SessionNotFound |
            AuthKind::MechanismNotFound => StatusCode::UNAUTHORIZED,
            AuthKind::AlreadyAuthenticated |
            AuthKind::InvalidCredentials |
            AuthKind::InvalidOtp |
            AuthKind::OtpUnverified => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq,
    StrumAsRefStr,
    Serialize, Deserialize
)]
pub enum UserKind {
    NotFound,
    EmailInUse,
    PhoneInUse,
}

impl std::fmt::Display for UserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self.as_ref(), f)
    }
}

impl From<&UserKind> for StatusCode {
    fn from(kind: &UserKind) -> Self {
        match kind {
            UserKind::NotFound => StatusCode::NOT_FOUND,
            UserKind::EmailInUse |
            UserKind::PhoneInUse => StatusCode::CONFLICT,
        }
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq,
    StrumAsRefStr,
    Serialize, Deserialize
)]
pub enum FaceKind {
    InvalidDescriptor,
    NotFound,
}

impl std::fmt::Display for FaceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self.as_ref(), f)
    }
}

impl From<&FaceKind> for StatusCode {
    fn from(kind: &FaceKind) -> Self {
        match kind {
            FaceKind::InvalidDescriptor => StatusCode::BAD_REQUEST,
            FaceKind::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq,
    StrumAsRefStr,
    Serialize, Deserialize
)]
pub enum GeneralKind {
    InternalFailure,
    Timeout,

    AlreadyExists,
    NotFound,

    ValidationFailed,
    InvalidData,
    MissingData,

    InvalidHeaderValue,
    InvalidMethod,
    InvalidRequest,
}

impl std::fmt::Display for GeneralKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self.as_ref(), f)
    }
}

impl From<&GeneralKind> for StatusCode {
    fn from(kind: &GeneralKind) -> StatusCode {
        match kind {
            GeneralKind::InternalFailure => StatusCode::INTERNAL_SERVER_ERROR,
            GeneralKind::Timeout => StatusCode::REQUEST_TIMEOUT,
            GeneralKind::AlreadyExists => StatusCode::CONFLICT,
            GeneralKind::NotFound => StatusCode::NOT_FOUND,
            GeneralKind::ValidationFailed |
            GeneralKind::InvalidData |
            GeneralKind::MissingData |
            GeneralKind::InvalidHeaderValue |
            GeneralKind::InvalidRequest => StatusCode::BAD_REQUEST,
            GeneralKind::InvalidMethod => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq,
    Serialize, Deserialize
)]
pub enum ApiErrorKind {
    General(GeneralKind),
    Auth(AuthKind),
    User(UserKind),
    Face(FaceKind),
}

impl std::fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiErrorKind::General(v) => std::fmt::Display::fmt(v, f),
            ApiErrorKind::Auth(v) => std::fmt::Display::fmt(v, f),
            ApiErrorKind::User(v) => std::fmt::Display::fmt(v, f),
            ApiErrorKind::Face(v) => std::fmt::Display::fmt(v, f),
        }
    }
}

impl From<GeneralKind> for ApiErrorKind {
    fn from(v: GeneralKind) -> Self {
        ApiErrorKind::General(v)
    }
}

impl From<AuthKind> for ApiErrorKind {
    fn from(v: AuthKind) -> Self {
        ApiErrorKind::Auth(v)
    }
}

impl From<UserKind> for ApiErrorKind {
    fn from(v: UserKind) -> Self {
        ApiErrorKind::User(v)
    }
}

impl From<FaceKind> for ApiErrorKind {
    fn from(v: FaceKind) -> Self {
        ApiErrorKind::Face(v)
    }
}

impl From<&ApiErrorKind> for StatusCode {
    fn from(kind: &ApiErrorKind) -> Self {
        match kind {
            ApiErrorKind::General(v) => v.into(),
            ApiErrorKind::Auth(v) => v.into(),
            ApiErrorKind::User(v) => v.into(),
            ApiErrorKind::Face(v) => v.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Detail {
    Keys(Vec<String>),
}

impl Detail {
    pub fn with_key(key: impl Into<String>) -> Self {
        Detail::Keys(vec![key.into()])
    }

    pub fn mult_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>
    {
        Detail::Keys(keys.into_iter().map(Into::into).collect())
    }
}

impl std::fmt::Display for Detail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Detail::Keys(list) => {
                let mut iter = list.iter();

                if let Some(first) = iter.next() {
                    write!(f, "{}", first)?;

                    while let Some(key) = iter.next() {
                        write!(f, ",{}", key)?;
                    }
                }
            },
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    kind: ApiErrorKind,
    detail: Option<Detail>,
    msg: Option<String>,
}

impl ApiError {
    pub fn new() -> Self {
        ApiError {
            kind: ApiErrorKind::General(GeneralKind::InternalFailure),
            detail: None,
            msg: None
        }
    }

    pub fn with_kind<K>(mut self, kind: K) -> Self
    where
        K: Into<ApiErrorKind>
    {
        self.kind = kind.into();
        self
    }

    pub fn with_detail(mut self, detail: Detail) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn with_message<M>(mut self, msg: M) -> Self
    where
        M: Into<String>
    {
        self.msg = Some(msg.into());
        self
    }

    pub fn kind(&self) -> &ApiErrorKind {
        &self.kind
    }

    pub fn detail(&self) -> Option<&Detail> {
        self.detail.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.msg.as_ref().map(|v| v.as_str())
    }
}

impl std::default::Default for ApiError {
    fn default() -> Self {
        ApiError::new()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(detail) = &self.detail {
            write!(f, ": {}", detail)?;
        }

        if let Some(msg) = &self.msg {
            write!(f, ": {}", msg)?;
        }

        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl<K> From<K> for ApiError
where
    K: Into<ApiErrorKind>
{
    fn from(kind: K) -> Self {
        ApiError {
            kind: kind.into(),
            detail: None,
            msg: None
        }
    }
}

impl<K,M> From<(K, M)> for ApiError
where
    K: Into<ApiErrorKind>,
    M: Into<String>,
{
    fn from((kind, msg): (K, M)) -> Self {
        ApiError {
            kind: kind.into(),
            detail: None,
            msg: Some(msg.into())
        }
    }
}

impl<K> From<(K, Detail)> for ApiError
where
    K: Into<ApiErrorKind>
{
    fn from((kind, detail): (K, Detail)) -> Self {
        ApiError {
            kind: kind.into(),
            detail: Some(detail),
            msg: None
        }
    }
}

impl<K,M> From<(K, Detail, M)> for ApiError
where
    K: Into<ApiErrorKind>,
    M: Into<String>
{
    fn from((kind, detail, msg): (K, Detail, M)) -> Self {
        ApiError {
            kind: kind.into(),
            detail: Some(detail),
            msg: Some(msg.into())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from(&self.kind);

        match serialize_json(status, &self) {
            Ok(res) => res,
            Err(err) => {
                tracing::error!("ApiError serialization error {:?}", err);
                error_json()
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn kind_status_mapping() {
        let checks = vec![
            (ApiErrorKind::from(AuthKind::Unauthenticated), StatusCode::UNAUTHORIZED),
            (ApiErrorKind::from(AuthKind::SessionExpired), StatusCode::UNAUTHORIZED),
            (ApiErrorKind::from(AuthKind::PermissionDenied), StatusCode::FORBIDDEN),
            (ApiErrorKind::from(AuthKind::InvalidCredentials), StatusCode::BAD_REQUEST),
            (ApiErrorKind::from(UserKind::EmailInUse), StatusCode::CONFLICT),
            (ApiErrorKind::from(UserKind::PhoneInUse), StatusCode::CONFLICT),
            (ApiErrorKind::from(FaceKind::InvalidDescriptor), StatusCode::BAD_REQUEST),
            (ApiErrorKind::from(GeneralKind::InternalFailure), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (kind, expected) in checks {
            assert_eq!(StatusCode::from(&kind), expected, "wrong status for {kind}");
        }
    }
}
