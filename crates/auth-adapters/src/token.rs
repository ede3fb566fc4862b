//! Session token generation.

use rand::Rng;

const TOKEN_LENGTH: usize = 128;
const TOKEN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890";
// 6 bits cover indexes 0..63; draws >= the alphabet size are redrawn so the
// 62 characters stay equally likely (no modulo bias).
const INDEX_BITS: u32 = 6;
const INDEX_MASK: u64 = (1 << INDEX_BITS) - 1;

/// Generates a 128-character random session token.
pub fn session_token() -> String {
    let mut rng = rand::rng();
    let mut token = String::with_capacity(TOKEN_LENGTH);
    while token.len() < TOKEN_LENGTH {
        let index = (rng.random::<u64>() & INDEX_MASK) as usize;
        if index < TOKEN_ALPHABET.len() {
            token.push(TOKEN_ALPHABET[index] as char);
        }
    }
    token
}
