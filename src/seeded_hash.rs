//! Deterministic string hashing.
//!
//! Every seed-derived value in a scene comes from here, so the arithmetic is
//! pinned down exactly: UTF-16 code units, wrapping 32-bit signed math, and a
//! fixed output domain. The same `(s, salt)` gives the same float on any
//! platform, and on any host that hashes UTF-16 strings the same way.

/// Size of the output domain before normalization.
const HASH_DOMAIN: u32 = 1_000_000;

/// Odd multiplier used to spread small salts across the accumulator.
const SALT_SPREAD: i32 = 0x9E37_79B1_u32 as i32;

/// Odd multiplier for the avalanche finalizer.
const MIX: i32 = 0x045D_9F3B;

/// Hash `s` under `salt` to a float in `[0, 1)`.
pub fn hash(s: &str, salt: i32) -> f64 {
    let mut h: i32 = salt.wrapping_mul(SALT_SPREAD);
    for unit in s.encode_utf16() {
        h = h.wrapping_mul(31).wrapping_add(unit as i32);
    }

    h ^= ((h as u32) >> 16) as i32;
    h = h.wrapping_mul(MIX);
    h ^= ((h as u32) >> 16) as i32;
    h = h.wrapping_mul(MIX);
    h ^= ((h as u32) >> 16) as i32;

    (h.unsigned_abs() % HASH_DOMAIN) as f64 / HASH_DOMAIN as f64
}

/// `floor(hash(s, salt) * max)`, always in `0..max`. Returns 0 when `max == 0`.
pub fn hash_int(s: &str, salt: i32, max: usize) -> usize {
    if max == 0 {
        return 0;
    }
    let v = (hash(s, salt) * max as f64).floor() as usize;
    v.min(max - 1)
}
