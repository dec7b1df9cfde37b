use facegate_lib::users::normalize_phone;
use facegate_api::Validator;
use facegate_api::auth::{PhoneOtpRequest, PhoneOtpVerify, PhoneRegister, PhoneLogin};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::db;
use crate::net::error::{self, Error, ApiErrorKind, AuthKind, UserKind};
use crate::sec::authn::session;
use crate::state::ArcShared;
use crate::user;

fn conflict_error(existing: &user::User, phone: &str) -> Error {
    if existing.phone.as_deref() == Some(phone) {
        Error::api(ApiErrorKind::User(UserKind::PhoneInUse))
    } else {
        Error::api(ApiErrorKind::User(UserKind::EmailInUse))
    }
}

pub async fn send_otp(
    State(state): State<ArcShared>,
    db::Conn(conn): db::Conn,
    axum::Json(json): axum::Json<PhoneOtpRequest>,
) -> error::Result<impl IntoResponse> {
    json.validate()?;

    let phone = normalize_phone(&json.phone);

    if let Some(existing) = user::User::retrieve_phone_or_email(&conn, &phone, &json.email).await? {
        return Err(conflict_error(&existing, &phone));
    }

    state.external().sms().send(&phone).await?;

    Ok(StatusCode::ACCEPTED)
}

pub async fn verify_otp(
    State(state): State<ArcShared>,
    axum::Json(json): axum::Json<PhoneOtpVerify>,
) -> error::Result<impl IntoResponse> {
    json.validate()?;

    let phone = normalize_phone(&json.phone);

    if !state.external().sms().check(&phone, &json.code).await? {
        return Err(Error::api(ApiErrorKind::Auth(AuthKind::InvalidOtp)));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn register(
    State(state): State<ArcShared>,
    db::Conn(mut conn): db::Conn,
    axum::Json(json): axum::Json<PhoneRegister>,
) -> error::Result<impl IntoResponse> {
    json.validate()?;

    let phone = normalize_phone(&json.phone);

    if let Some(existing) = user::User::retrieve_phone_or_email(&conn, &phone, &json.email).await? {
        return Err(conflict_error(&existing, &phone));
    }

    if !state.external().sms().check(&phone, &json.code).await? {
        return Err(Error::api(ApiErrorKind::Auth(AuthKind::InvalidOtp)));
    }

    let transaction = conn.transaction().await?;

    let created = user::User::builder(json.name)
        .email(json.email)
        .phone(phone)
        .build(&transaction)
        .await?;

    let (_session, cookie) = session::create_session(state.auth(), &transaction, created.id).await?;

    transaction.commit().await?;

    Ok((
        StatusCode::CREATED,
        cookie,
        facegate_api::Payload::new(facegate_api::users::User::from(&created))
    ))
}

pub async fn login(
    State(state): State<ArcShared>,
    db::Conn(mut conn): db::Conn,
    axum::Json(json): axum::Json<PhoneLogin>,
) -> error::Result<impl IntoResponse> {
    json.validate()?;

    let phone = normalize_phone(&json.phone);

    let Some(found) = user::User::retrieve_phone_or_email(&conn, &phone, &json.email).await? else {
        return Err(Error::api((
            ApiErrorKind::User(UserKind::NotFound),
            "no account for this phone or email"
        )));
    };

    let transaction = conn.transaction().await?;

    let (_session, cookie) = session::create_session(state.auth(), &transaction, found.id).await?;

    transaction.commit().await?;

    Ok((
        StatusCode::OK,
        cookie,
        facegate_api::Payload::new(facegate_api::users::User::from(&found))
    ))
}
