/// length of the embedding vector produced by the upstream extractor
pub const DESCRIPTOR_LEN: usize = 128;

/// maximum meaningful euclidean distance for the embedding space
pub const MATCH_THRESHOLD: f64 = 0.9;

/// records scoring below this percentage are not reported
pub const MIN_SIMILARITY: f64 = 40.0;

pub fn descriptor_valid(given: &[f64]) -> bool {
    given.len() == DESCRIPTOR_LEN && given.iter().all(|v| v.is_finite())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn descriptor_validation() {
        assert!(descriptor_valid(&vec![0.0f64; DESCRIPTOR_LEN]));
        assert!(!descriptor_valid(&vec![0.0f64; DESCRIPTOR_LEN - 1]));
        assert!(!descriptor_valid(&vec![0.0f64; DESCRIPTOR_LEN + 1]));

        let mut nan = vec![0.0f64; DESCRIPTOR_LEN];
        nan[17] = f64::NAN;

        assert!(!descriptor_valid(&nan));
    }
}
