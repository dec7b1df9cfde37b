use facegate_lib::ids;

use chrono::{DateTime, Utc};
use tokio_postgres::{Error as PgError};
use deadpool_postgres::GenericClient;

pub mod matcher;

/// one enrolled descriptor plus display metadata. records are append only
/// and immutable once written
#[derive(Debug, Clone)]
pub struct FaceRecord {
    pub id: ids::FaceId,
    pub name: Option<String>,
    pub descriptor: Vec<f64>,
    pub image_ref: Option<String>,
    pub created: DateTime<Utc>,
}

impl FaceRecord {
    /// full corpus in insertion order
    pub async fn retrieve_all(conn: &impl GenericClient) -> Result<Vec<FaceRecord>, PgError> {
        let rows = conn.query(
            "\
            select face_record.id, \
                   face_record.name, \
                   face_record.descriptor, \
                   face_record.image_ref, \
                   face_record.created \
            from face_record \
            order by face_record.id asc",
            &[]
        ).await?;

        let mut rtn = Vec::with_capacity(rows.len());

        for row in rows {
            rtn.push(FaceRecord {
                id: row.get(0),
                name: row.get(1),
                descriptor: row.get(2),
                image_ref: row.get(3),
                created: row.get(4),
            });
        }

        Ok(rtn)
    }

    pub async fn create(
        conn: &impl GenericClient,
        name: Option<String>,
        descriptor: Vec<f64>,
        image_ref: Option<String>,
    ) -> Result<FaceRecord, PgError> {
        let row = conn.query_one(
            "\
            insert into face_record (name, descriptor, image_ref) values \
            ($1, $2, $3) \
            returning id, created",
            &[&name, &descriptor, &image_ref]
        ).await?;

        Ok(FaceRecord {
            id: row.get(0),
            name,
            descriptor,
            image_ref,
            created: row.get(1),
        })
    }
}

impl From<&FaceRecord> for facegate_api::face::FaceRecordItem {
    fn from(record: &FaceRecord) -> Self {
        facegate_api::face::FaceRecordItem {
            id: record.id,
            name: record.name.clone(),
            image_ref: record.image_ref.clone(),
            created: record.created,
        }
    }
}
