use facegate_lib::ids;

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

use crate::{Validator, ApiError, Detail};
use crate::error::FaceKind;

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchFace {
    pub descriptor: Vec<f64>,
}

impl Validator for MatchFace {
    fn validate(&self) -> Result<(), ApiError> {
        if !facegate_lib::face::descriptor_valid(&self.descriptor) {
            Err(ApiError::from((
                FaceKind::InvalidDescriptor,
                Detail::with_key("descriptor")
            )))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceMatch {
    pub id: ids::FaceId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,

    pub distance: f64,
    pub similarity: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchOutcome {
    #[serde(rename = "match")]
    pub matched: bool,
    pub matches: Vec<FaceMatch>,
}

impl MatchOutcome {
    pub fn no_match() -> Self {
        MatchOutcome {
            matched: false,
            matches: Vec::new(),
        }
    }
}

impl From<Vec<FaceMatch>> for MatchOutcome {
    fn from(matches: Vec<FaceMatch>) -> Self {
        MatchOutcome {
            matched: !matches.is_empty(),
            matches,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FaceRecordItem {
    pub id: ids::FaceId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,

    pub created: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Uploaded {
    pub image_ref: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BulkFace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub descriptor: Vec<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveBulkFaces {
    pub faces: Vec<BulkFace>,
}

impl Validator for SaveBulkFaces {
    fn validate(&self) -> Result<(), ApiError> {
        if self.faces.is_empty() {
            return Err(ApiError::from((
                crate::error::GeneralKind::MissingData,
                Detail::with_key("faces")
            )));
        }

        for (index, face) in self.faces.iter().enumerate() {
            if !facegate_lib::face::descriptor_valid(&face.descriptor) {
                return Err(ApiError::from((
                    FaceKind::InvalidDescriptor,
                    Detail::with_key(format!("faces.{index}.descriptor"))
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use facegate_lib::face::DESCRIPTOR_LEN;

    #[test]
    fn match_face_validation() {
        let valid = MatchFace {
            descriptor: vec![0.25; DESCRIPTOR_LEN],
        };

        assert!(valid.validate().is_ok());

        let invalid = MatchFace {
            descriptor: vec![0.25; DESCRIPTOR_LEN - 3],
        };

        assert!(invalid.validate().is_err());
    }

    #[test]
    fn match_outcome_flag_follows_matches() {
        let empty = MatchOutcome::from(Vec::new());

        assert!(!empty.matched);
        assert!(empty.matches.is_empty());

        let found = MatchOutcome::from(vec![FaceMatch {
            id: 1,
            name: None,
            image_ref: None,
            distance: 0.0,
            similarity: 100.0,
        }]);

        assert!(found.matched);
        assert_eq!(found.matches.len(), 1);
    }

    #[test]
    fn bulk_faces_validation() {
        let valid = SaveBulkFaces {
            faces: vec![BulkFace {
                name: Some(String::from("someone")),
                descriptor: vec![0.5; DESCRIPTOR_LEN],
                image_ref: None,
            }],
        };

        assert!(valid.validate().is_ok());

        let empty = SaveBulkFaces { faces: Vec::new() };

        assert!(empty.validate().is_err());

        let bad_len = SaveBulkFaces {
            faces: vec![BulkFace {
                name: None,
                descriptor: vec![0.5; 12],
                image_ref: None,
            }],
        };

        assert!(bad_len.validate().is_err());
    }
}
