//! Correlation identifiers.
//!
//! Every evaluated request gets one id that threads through the audit store,
//! the caller's response, and the review queue. Ids are timestamp-prefixed so
//! an operator can eyeball when a decision happened, with a random suffix for
//! uniqueness.

use chrono::Utc;
use rand::Rng;
use rand::distr::Alphanumeric;

const PREFIX: &str = "adc";
const SUFFIX_LEN: usize = 8;

/// Generate a fresh correlation id, e.g. `adc-20260806T101500Z-4f80a1c2`.
pub fn new_correlation_id() -> String {
    let stamp = Utc::now().format("%Y%m%dT%H%M%SZ");
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect();
    format!("{}-{}-{}", PREFIX, stamp, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_has_prefix_stamp_and_suffix() {
        let id = new_correlation_id();
        let parts: Vec<&str> = id.splitn(3, '-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "adc");
        assert_eq!(parts[1].len(), "20260806T101500Z".len());
        assert_eq!(parts[2].len(), SUFFIX_LEN);
    }

    #[test]
    fn ids_are_unique_in_practice() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(new_correlation_id()));
        }
    }
}
