use facegate_lib::ids;
use facegate_api::Validator;
use facegate_api::face::{MatchFace, MatchOutcome, SaveBulkFaces, Uploaded, FaceRecordItem};

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, HeaderMap};
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use bytes::Bytes;

use crate::db;
use crate::face::{self, matcher};
use crate::net::error::{self, Error, ApiErrorKind, GeneralKind, Detail};
use crate::sec::authn::initiator::Initiator;
use crate::sec::authz;
use crate::state::ArcShared;

pub fn routes() -> Router<ArcShared> {
    Router::new()
        .route("/match-face", post(match_face))
        .route("/faces", get(faces))
        .route("/upload", post(upload))
        .route("/save-bulk-face", post(save_bulk_face))
}

async fn match_face(
    _initiator: Initiator,
    db::Conn(conn): db::Conn,
    axum::Json(json): axum::Json<MatchFace>,
) -> error::Result<impl IntoResponse> {
    json.validate()?;

    let corpus = face::FaceRecord::retrieve_all(&conn).await?;

    let matches = matcher::match_descriptors(&json.descriptor, &corpus)?;

    Ok(facegate_api::Payload::new(MatchOutcome::from(matches)))
}

async fn faces(
    _initiator: Initiator,
    db::Conn(conn): db::Conn,
) -> error::Result<impl IntoResponse> {
    let records = face::FaceRecord::retrieve_all(&conn).await?;

    let items: Vec<FaceRecordItem> = records.iter()
        .map(FaceRecordItem::from)
        .collect();

    Ok(facegate_api::Payload::new(items))
}

fn upload_extension(headers: &HeaderMap) -> error::Result<&'static str> {
    match headers.get(CONTENT_TYPE).and_then(|value| value.to_str().ok()) {
        Some("image/jpeg") => Ok("jpg"),
        Some("image/png") => Ok("png"),
        Some("image/webp") => Ok("webp"),
        _ => Err(Error::api((
            ApiErrorKind::General(GeneralKind::InvalidRequest),
            "unsupported upload content type"
        )))
    }
}

async fn upload(
    State(state): State<ArcShared>,
    initiator: Initiator,
    headers: HeaderMap,
    body: Bytes,
) -> error::Result<impl IntoResponse> {
    authz::admin_only(&initiator)?;

    if body.is_empty() {
        return Err(Error::api((
            ApiErrorKind::General(GeneralKind::MissingData),
            Detail::with_key("body")
        )));
    }

    let extension = upload_extension(&headers)?;
    let basename = format!("{}.{extension}", ids::create_uid());

    let image_ref = state.external().blobs().store(&basename, body).await?;

    Ok((
        StatusCode::CREATED,
        facegate_api::Payload::new(Uploaded { image_ref })
    ))
}

async fn save_bulk_face(
    initiator: Initiator,
    db::Conn(mut conn): db::Conn,
    axum::Json(json): axum::Json<SaveBulkFaces>,
) -> error::Result<impl IntoResponse> {
    authz::admin_only(&initiator)?;

    json.validate()?;

    let transaction = conn.transaction().await?;

    let mut count: usize = 0;

    for given in json.faces {
        face::FaceRecord::create(
            &transaction,
            given.name,
            given.descriptor,
            given.image_ref,
        ).await?;

        count += 1;
    }

    transaction.commit().await?;

    Ok((
        StatusCode::CREATED,
        facegate_api::Payload::new(count)
    ))
}
