//! Numeric identity generation.
//!
//! Identities are 32-bit FNV-1 hashes over a nanosecond timestamp plus the
//! record's semantic seed (username for users, date + author + text for
//! entries and comments). Collisions are possible but treated as acceptably
//! rare; there is no retry. 0 is reserved as "never a real id".

use chrono::Utc;

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// FNV-1, 32-bit: multiply, then xor.
fn fnv1(data: &[u8]) -> u32 {
    data.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        hash.wrapping_mul(FNV_PRIME) ^ u32::from(*byte)
    })
}

/// Derives a unique-enough identity from the given seed parts.
///
/// The current nanosecond epoch timestamp is prepended so that identical
/// seeds produce distinct ids across calls.
pub fn content_id(parts: &[&str]) -> u32 {
    // timestamp_nanos overflows i64 in 2262; saturate rather than panic
    let mut seed = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or(i64::MAX)
        .to_string();
    for part in parts {
        seed.push_str(part);
    }
    fnv1(seed.as_bytes())
}
