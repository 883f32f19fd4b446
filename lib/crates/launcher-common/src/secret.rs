//! Per-instance random values: the auth token and the listening port.

use std::ops::RangeInclusive;

use rand::rngs::OsRng;
use rand::{Rng, RngCore};

/// Number of random bytes behind each token (64 hex characters).
pub const TOKEN_BYTES: usize = 32;

/// Generate a fresh auth token from the operating system CSPRNG.
#[must_use]
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Pick a port uniformly from `range`. Returns `None` for an empty range.
///
/// There is no check that the port is free or unused by another instance.
#[must_use]
pub fn pick_port(range: RangeInclusive<u16>) -> Option<u16> {
    if range.is_empty() {
        return None;
    }
    Some(rand::thread_rng().gen_range(range))
}
