//! Record identifiers.

use rand::{rngs::OsRng, RngCore};
use uuid::Builder;

use crate::errors::ServiceError;

pub const IDENTIFIER_LEN: usize = 36;

/// Shape check only: exactly 36 characters from `[0-9a-fA-F-]`.
/// Hyphen positions are not enforced.
pub fn is_valid_identifier(s: &str) -> bool {
    s.len() == IDENTIFIER_LEN && s.bytes().all(|b| b.is_ascii_hexdigit() || b == b'-')
}

/// Fresh version-4 UUID in canonical lowercase 8-4-4-4-12 form, drawn from
/// the operating system's CSPRNG.
pub fn new_identifier() -> Result<String, ServiceError> {
    new_identifier_from(&mut OsRng)
}

/// Same as [`new_identifier`] with an explicit randomness source. A source
/// failure is returned, never papered over with a weaker generator.
pub fn new_identifier_from<R: RngCore + ?Sized>(rng: &mut R) -> Result<String, ServiceError> {
    let mut bytes = [0u8; 16];
    rng.try_fill_bytes(&mut bytes)
        .map_err(|e| ServiceError::Randomness(e.to_string()))?;
    // sets the version nibble to 4 and the RFC 4122 variant bits
    let id = Builder::from_random_bytes(bytes).into_uuid();
    Ok(id.hyphenated().to_string())
}
