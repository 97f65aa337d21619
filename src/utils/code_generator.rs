//! Deterministic short id generation.
//!
//! Short ids are derived from the input with a polynomial rolling hash. The
//! hash is not cryptographic and collisions are not detected anywhere:
//! two inputs with the same hash map to the same storage key.

/// Short ids that would be shadowed by fixed routes and never redirect.
const RESERVED_HASH_IDS: &[&str] = &["health", "api"];

/// Polynomial base.
const BASE: i64 = 31;

/// Hash modulus (`1e9 + 9`).
const MODULUS: i64 = 1_000_000_009;

/// Computes the rolling hash of `input` after removing every `/`.
///
/// Each character contributes `(code_point(c) - code_point('a') + 1) * 31^i`,
/// reduced modulo `1_000_000_009`. Characters below `'a'` give negative
/// offsets; the running value is kept in `[0, MODULUS)` with Euclidean
/// remainder, so the result is always non-negative.
///
/// # Examples
///
/// ```
/// use link_shortener::utils::code_generator::shorten;
///
/// assert_eq!(shorten("a"), 1);
/// assert_eq!(shorten("ab"), 63);
/// assert_eq!(shorten("a/b"), 63);
/// ```
pub fn shorten(input: &str) -> u64 {
    let mut hash: i64 = 0;
    let mut power: i64 = 1;

    for c in input.chars().filter(|&c| c != '/') {
        let offset = c as i64 - 'a' as i64 + 1;
        hash = (hash + offset * power).rem_euclid(MODULUS);
        power = (power * BASE) % MODULUS;
    }

    hash as u64
}

/// Returns the storage key generated for `url`.
pub fn generate_hash_id(url: &str) -> String {
    shorten(url).to_string()
}

/// Returns true if `hash_id` is taken by a system endpoint.
///
/// Generated ids are decimal and never reserved; only custom ids need the check.
pub fn is_reserved(hash_id: &str) -> bool {
    RESERVED_HASH_IDS.contains(&hash_id)
}
