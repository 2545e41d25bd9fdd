//! Fingerprinting of loaded rule tables.

use sha2::{Digest, Sha256};

/// Calculate SHA-256 checksum of serialized rule-table content.
///
/// # Arguments
/// * `content` - Serialized rule tables
///
/// # Returns
/// Hexadecimal string representation of the SHA-256 hash.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_consistency() {
        let content = "cooldown_days:\n  instagram: 14\n";
        assert_eq!(calculate_checksum(content), calculate_checksum(content));
    }

    #[test]
    fn test_different_content_different_checksum() {
        let a = calculate_checksum("horizon_days: 28\n");
        let b = calculate_checksum("horizon_days: 21\n");
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }
}
