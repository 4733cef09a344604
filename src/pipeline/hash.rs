// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 assetflow contributors

//! Content hashing for write skipping
//!
//! Uses BLAKE3 to tell whether an output already holds the bytes we are about
//! to write.

use blake3::Hasher;
use std::path::Path;

/// Hash arbitrary bytes
pub fn hash_bytes(data: &[u8]) -> blake3::Hash {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Whether `path` exists and already contains exactly `contents`
pub async fn is_unchanged(path: &Path, contents: &[u8]) -> bool {
    let Ok(metadata) = tokio::fs::metadata(path).await else {
        return false;
    };
    if metadata.len() != contents.len() as u64 {
        return false;
    }

    match tokio::fs::read(path).await {
        Ok(existing) => hash_bytes(&existing) == hash_bytes(contents),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_hash_bytes() {
        assert_eq!(hash_bytes(b"hello"), hash_bytes(b"hello"));
        assert_ne!(hash_bytes(b"hello"), hash_bytes(b"world"));
    }

    #[tokio::test]
    async fn test_is_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.css");

        assert!(!is_unchanged(&path, b"a{}").await);

        std::fs::write(&path, b"a{}").unwrap();
        assert!(is_unchanged(&path, b"a{}").await);
        assert!(!is_unchanged(&path, b"b{}").await);
        assert!(!is_unchanged(&path, b"a{ }").await);
    }
}
