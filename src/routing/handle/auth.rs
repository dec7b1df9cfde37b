use facegate_api::Validator;
use facegate_api::auth::FederatedLogin;

use axum::Router;
use axum::debug_handler;
use axum::extract::State;
use axum::http::{StatusCode, HeaderMap};
use axum::response::IntoResponse;
use axum::routing::post;

use crate::db;
use crate::net::error::{self, ApiErrorKind, AuthKind};
use crate::external::ExternalError;
use crate::sec::authn::session;
use crate::sec::authn::initiator::{self, LookupError, Mechanism};
use crate::state::ArcShared;
use crate::user;

pub mod email;
pub mod phone;

pub fn routes() -> Router<ArcShared> {
    Router::new()
        .route("/federated-login", post(federated_login))
        .route("/user-info", post(user_info))
        .route("/logout", post(logout))
        .route("/email/register", post(email::register))
        .route("/email/verify-otp", post(email::verify_otp))
        .route("/email/login", post(email::login))
        .route("/phone/send-otp", post(phone::send_otp))
        .route("/phone/verify-otp", post(phone::verify_otp))
        .route("/phone/register", post(phone::register))
        .route("/phone/login", post(phone::login))
}

#[debug_handler]
async fn federated_login(
    State(state): State<ArcShared>,
    db::Conn(mut conn): db::Conn,
    axum::Json(json): axum::Json<FederatedLogin>,
) -> error::Result<impl IntoResponse> {
    json.validate()?;

    let identity = match state.external().identity().verify(&json.token).await {
        Ok(identity) => identity,
        Err(ExternalError::Rejected) => {
            return Err(error::Error::api((
                ApiErrorKind::Auth(AuthKind::InvalidCredentials),
                "identity token was rejected"
            )));
        },
        Err(err) => {
            return Err(err.into());
        }
    };

    let transaction = conn.transaction().await?;

    let user = if let Some(found) = user::User::retrieve_email(&transaction, &identity.email).await? {
        found
    } else {
        user::User::builder(identity.name)
            .email(identity.email)
            .picture(identity.picture)
            .build(&transaction)
            .await?
    };

    let (_session, cookie) = session::create_session(state.auth(), &transaction, user.id).await?;

    transaction.commit().await?;

    Ok((
        StatusCode::OK,
        cookie,
        facegate_api::Payload::new(facegate_api::users::User::from(&user))
    ))
}

async fn user_info(
    initiator: initiator::Initiator,
) -> error::Result<impl IntoResponse> {
    Ok(facegate_api::Payload::new(
        facegate_api::users::User::from(initiator.user())
    ))
}

async fn logout(
    State(state): State<ArcShared>,
    headers: HeaderMap,
) -> error::Result<impl IntoResponse> {
    let conn = state.pool().get().await?;

    match initiator::lookup_header_map(state.auth(), &conn, &headers).await {
        Ok(initiator) => match initiator.mechanism {
            Mechanism::Session(found) => {
                session::drop_session(state.auth(), &conn, &found).await?;
            }
        },
        Err(LookupError::Database(err)) => {
            return Err(err.into());
        },
        // revoking a missing or invalid credential is a no-op success. the
        // client still gets told to discard its cookie
        Err(_) => {},
    }

    Ok((
        StatusCode::NO_CONTENT,
        session::expire_session_cookie(state.auth())
    ))
}
