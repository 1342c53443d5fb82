// Copyright 2026 The Usher Authors
// SPDX-License-Identifier: Apache-2.0

//! Object identity: sanitized path segments and the object key hash.

use std::fmt;

use sha2::{Digest, Sha256};

/// Reduces a path segment to a safe filename character set.
///
/// Whitespace runs collapse to a single underscore, characters outside
/// `[A-Za-z0-9._-]` are dropped, and leading/trailing dots and underscores
/// are trimmed. Traversal sequences cannot survive this: `../etc` becomes
/// `etc`.
#[must_use]
pub fn sanitize_segment(value: &str) -> String {
    let joined = value.split_whitespace().collect::<Vec<_>>().join("_");
    let filtered: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    filtered.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// The identity of one stored object: account, bucket and object name.
///
/// Construction sanitizes every segment, so an `ObjectKey` is always safe
/// to hash, to place and to use as a filesystem path component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectKey {
    /// Owning account.
    pub account: String,
    /// Bucket within the account.
    pub bucket: String,
    /// Object name within the bucket.
    pub object: String,
}

impl ObjectKey {
    /// Creates an object key from raw path segments, sanitizing each one.
    #[must_use]
    pub fn new(account: &str, bucket: &str, object: &str) -> Self {
        Self {
            account: sanitize_segment(account),
            bucket: sanitize_segment(bucket),
            object: sanitize_segment(object),
        }
    }

    /// Returns the object URL on the given storage node.
    #[must_use]
    pub fn object_url(&self, node: &str) -> String {
        format!("http://{node}/{}/{}/{}", self.account, self.bucket, self.object)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.account, self.bucket, self.object)
    }
}

/// The deterministic digest identifying an object for placement.
///
/// A lowercase hex SHA-256 of `salt? + account + bucket + object`. Equal
/// inputs always produce the same hash, which is what makes placement
/// stable and repeatable for an unchanged topology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyHash(String);

impl KeyHash {
    /// Computes the key hash for an object, folding in the configured salt
    /// when one is set.
    #[must_use]
    pub fn compute(salt: Option<&str>, key: &ObjectKey) -> Self {
        let mut hasher = Sha256::new();
        if let Some(salt) = salt {
            hasher.update(salt.as_bytes());
        }
        hasher.update(key.account.as_bytes());
        hasher.update(key.bucket.as_bytes());
        hasher.update(key.object.as_bytes());

        Self(hex::encode(hasher.finalize()))
    }

    /// The hash as a hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
