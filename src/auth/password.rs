//! Password Hashing
//! Mission: One-way credential storage with bcrypt

use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};

/// Hash a plaintext password for storage. The salt is embedded in the digest,
/// so hashing the same input twice yields different digests.
pub fn hash_password(plain: &str) -> Result<String> {
    hash(plain, DEFAULT_COST).context("Failed to hash password")
}

/// Check a plaintext password against a stored digest.
///
/// A malformed digest counts as a mismatch rather than an error.
pub fn verify_password(plain: &str, digest: &str) -> bool {
    verify(plain, digest).unwrap_or(false)
}
