//! Cache key derivation for user entries.
//!
//! Three disjoint key families, all pure functions of their input:
//!
//! - `all` - the complete user listing
//! - `by-id:<id>` - one user
//! - `by-email-hash:<sha256(email)>` - the id of the user owning an email
//!
//! Emails are hashed so no address is stored in the key space and keys stay
//! fixed-length.

use sha2::{Digest, Sha256};

/// Key of the cached full listing.
pub const ALL_USERS: &str = "all";

const BY_ID_PREFIX: &str = "by-id:";
const BY_EMAIL_HASH_PREFIX: &str = "by-email-hash:";

/// Key of a single cached user.
pub fn by_id(id: i64) -> String {
    format!("{BY_ID_PREFIX}{id}")
}

/// Key of the email → id index entry. The email is used as stored (case-sensitive).
pub fn by_email(email: &str) -> String {
    let digest = Sha256::digest(email.as_bytes());
    format!("{BY_EMAIL_HASH_PREFIX}{}", hex::encode(digest))
}

/// Key family label, used for metrics.
pub fn family(key: &str) -> &'static str {
    if key == ALL_USERS {
        "all"
    } else if key.starts_with(BY_ID_PREFIX) {
        "by-id"
    } else if key.starts_with(BY_EMAIL_HASH_PREFIX) {
        "by-email-hash"
    } else {
        "other"
    }
}
