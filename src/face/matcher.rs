use std::cmp::Ordering;

use facegate_lib::face::{DESCRIPTOR_LEN, MATCH_THRESHOLD, MIN_SIMILARITY};
use facegate_api::face::FaceMatch;

use crate::net::error::{Error as NetError, ApiErrorKind, FaceKind, Detail};

use super::FaceRecord;

#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("query descriptor must contain exactly {DESCRIPTOR_LEN} values")]
    InvalidDescriptor,
}

impl From<MatchError> for NetError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::InvalidDescriptor => NetError::api((
                ApiErrorKind::Face(FaceKind::InvalidDescriptor),
                Detail::with_key("descriptor")
            )),
        }
    }
}

pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    let mut sum = 0.0;

    for (x, y) in a.iter().zip(b.iter()) {
        let diff = x - y;
        sum += diff * diff;
    }

    sum.sqrt()
}

pub fn similarity_score(distance: f64) -> f64 {
    (1.0 - distance / MATCH_THRESHOLD) * 100.0
}

/// brute force scan over the full corpus. fine at current corpus sizes,
/// an ANN index becomes necessary well before this gets slow enough to
/// show up in request latency
pub fn match_descriptors(
    query: &[f64],
    corpus: &[FaceRecord],
) -> Result<Vec<FaceMatch>, MatchError> {
    if query.len() != DESCRIPTOR_LEN {
        return Err(MatchError::InvalidDescriptor);
    }

    let mut matches = Vec::new();

    for record in corpus {
        if record.descriptor.len() != query.len() {
            tracing::warn!(
                id = record.id,
                "stored descriptor has unexpected length. skipping record"
            );

            continue;
        }

        let distance = euclidean_distance(query, &record.descriptor);
        let similarity = similarity_score(distance);

        if similarity >= MIN_SIMILARITY {
            matches.push(FaceMatch {
                id: record.id,
                name: record.name.clone(),
                image_ref: record.image_ref.clone(),
                distance,
                similarity,
            });
        }
    }

    // sort_by is stable so equal scores keep corpus insertion order
    matches.sort_by(|a, b| b.similarity
        .partial_cmp(&a.similarity)
        .unwrap_or(Ordering::Equal));

    Ok(matches)
}

#[cfg(test)]
mod test {
    use super::*;

    use chrono::Utc;

    fn record(id: i64, descriptor: Vec<f64>) -> FaceRecord {
        FaceRecord {
            id,
            name: Some(format!("face {id}")),
            descriptor,
            image_ref: None,
            created: Utc::now(),
        }
    }

    fn one_hot(index: usize) -> Vec<f64> {
        let mut rtn = vec![0.0; DESCRIPTOR_LEN];
        rtn[index] = 1.0;
        rtn
    }

    #[test]
    fn identical_vector_is_full_match() {
        let descriptor: Vec<f64> = (0..DESCRIPTOR_LEN)
            .map(|i| (i as f64) / (DESCRIPTOR_LEN as f64))
            .collect();
        let corpus = vec![record(1, descriptor.clone())];

        let matches = match_descriptors(&descriptor, &corpus).unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, 1);
        assert_eq!(matches[0].distance, 0.0);
        assert_eq!(matches[0].similarity, 100.0);
    }

    #[test]
    fn one_hot_against_zero_vector_is_no_match() {
        // distance 1.0 pushes similarity below zero, well under the bound
        let corpus = vec![record(1, one_hot(0))];
        let query = vec![0.0; DESCRIPTOR_LEN];

        let matches = match_descriptors(&query, &corpus).unwrap();

        assert!(matches.is_empty());
    }

    #[test]
    fn empty_corpus_is_no_match_not_an_error() {
        let query = vec![0.0; DESCRIPTOR_LEN];

        let matches = match_descriptors(&query, &[]).unwrap();

        assert!(matches.is_empty());
    }

    #[test]
    fn wrong_length_query_is_rejected() {
        let corpus = vec![record(1, one_hot(0))];

        assert!(matches!(
            match_descriptors(&vec![0.0; DESCRIPTOR_LEN - 1], &corpus),
            Err(MatchError::InvalidDescriptor)
        ));

        assert!(matches!(
            match_descriptors(&vec![0.0; DESCRIPTOR_LEN + 1], &corpus),
            Err(MatchError::InvalidDescriptor)
        ));
    }

    #[test]
    fn results_sorted_by_descending_similarity() {
        let query = vec![0.0; DESCRIPTOR_LEN];

        let mut near = vec![0.0; DESCRIPTOR_LEN];
        near[0] = 0.1;

        let mut nearer = vec![0.0; DESCRIPTOR_LEN];
        nearer[0] = 0.05;

        let corpus = vec![
            record(1, near),
            record(2, nearer),
            record(3, vec![0.0; DESCRIPTOR_LEN]),
        ];

        let matches = match_descriptors(&query, &corpus).unwrap();

        assert_eq!(matches.len(), 3);
        assert_eq!(matches[0].id, 3);
        assert_eq!(matches[1].id, 2);
        assert_eq!(matches[2].id, 1);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let query = vec![0.0; DESCRIPTOR_LEN];

        let corpus = vec![
            record(5, one_hot(1).iter().map(|v| v * 0.1).collect()),
            record(9, one_hot(2).iter().map(|v| v * 0.1).collect()),
        ];

        let matches = match_descriptors(&query, &corpus).unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].similarity, matches[1].similarity);
        assert_eq!(matches[0].id, 5);
        assert_eq!(matches[1].id, 9);
    }

    #[test]
    fn distance_properties() {
        let a = one_hot(0);
        let b = one_hot(1);

        assert_eq!(euclidean_distance(&a, &b), euclidean_distance(&b, &a));
        assert!(euclidean_distance(&a, &b) >= 0.0);
        assert_eq!(euclidean_distance(&a, &a), 0.0);
    }

    #[test]
    fn similarity_decreases_with_distance() {
        let mut last = similarity_score(0.0);

        assert_eq!(last, 100.0);

        for step in 1..10 {
            let next = similarity_score((step as f64) * 0.1);

            assert!(next < last, "similarity did not decrease at step {step}");

            last = next;
        }
    }

    #[test]
    fn threshold_distance_scores_zero() {
        let score = similarity_score(MATCH_THRESHOLD);

        assert!(score.abs() < f64::EPSILON);
        assert!(score < MIN_SIMILARITY);
    }
}
