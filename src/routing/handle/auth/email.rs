use facegate_api::Validator;
use facegate_api::auth::{EmailRegister, EmailOtpVerify, EmailLogin};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::db;
use crate::net::error::{self, ApiErrorKind, AuthKind, UserKind};
use crate::sec::authn::{otp, password, session};
use crate::state::ArcShared;
use crate::user;

/// called twice. without a verified code record this sends a fresh code,
/// with one it completes the registration and consumes the record
pub async fn register(
    State(state): State<ArcShared>,
    db::Conn(mut conn): db::Conn,
    axum::Json(json): axum::Json<EmailRegister>,
) -> error::Result<impl IntoResponse> {
    json.validate()?;

    // the conflict check comes before any code leaves the building
    if user::User::retrieve_email(&conn, &json.email).await?.is_some() {
        return Err(error::Error::api(ApiErrorKind::User(UserKind::EmailInUse)));
    }

    let now = chrono::Utc::now();

    match otp::EmailOtp::retrieve(&conn, &json.email).await? {
        Some(record) if record.verified && !record.expired(&now) => {
            let transaction = conn.transaction().await?;

            let created = user::User::builder(json.name)
                .email(json.email.clone())
                .build(&transaction)
                .await?;

            password::Password::create(&transaction, &created.id, &json.password).await?;

            record.delete(&transaction).await?;

            transaction.commit().await?;

            Ok((
                StatusCode::CREATED,
                facegate_api::Payload::new(facegate_api::users::User::from(&created))
            ).into_response())
        },
        _ => {
            let record = otp::EmailOtp::upsert(&conn, &json.email).await?;

            state.external().mail().deliver(&record.email, &record.code).await?;

            Ok(StatusCode::ACCEPTED.into_response())
        }
    }
}

pub async fn verify_otp(
    db::Conn(conn): db::Conn,
    axum::Json(json): axum::Json<EmailOtpVerify>,
) -> error::Result<impl IntoResponse> {
    json.validate()?;

    let Some(record) = otp::EmailOtp::retrieve(&conn, &json.email).await? else {
        return Err(error::Error::api(ApiErrorKind::Auth(AuthKind::InvalidOtp)));
    };

    let now = chrono::Utc::now();

    if record.expired(&now) || record.code != json.otp {
        return Err(error::Error::api(ApiErrorKind::Auth(AuthKind::InvalidOtp)));
    }

    let _ = record.mark_verified(&conn).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn login(
    State(state): State<ArcShared>,
    db::Conn(mut conn): db::Conn,
    axum::Json(json): axum::Json<EmailLogin>,
) -> error::Result<impl IntoResponse> {
    json.validate()?;

    let Some(found) = user::User::retrieve_email(&conn, &json.email).await? else {
        return Err(error::Error::api(ApiErrorKind::Auth(AuthKind::InvalidCredentials)));
    };

    let Some(stored) = password::Password::retrieve(&conn, &found.id).await? else {
        return Err(error::Error::api(ApiErrorKind::Auth(AuthKind::InvalidCredentials)));
    };

    if !stored.verify(&json.password)? {
        return Err(error::Error::api(ApiErrorKind::Auth(AuthKind::InvalidCredentials)));
    }

    let transaction = conn.transaction().await?;

    let (_session, cookie) = session::create_session(state.auth(), &transaction, found.id).await?;

    transaction.commit().await?;

    Ok((
        StatusCode::OK,
        cookie,
        facegate_api::Payload::new(facegate_api::users::User::from(&found))
    ))
}
