//! Tracking identifiers for requests that arrive without them

use rand::Rng;

pub const PUBLISHER_PREFIX: &str = "pub_";
pub const SITE_PREFIX: &str = "site_";
pub const AD_UNIT_PREFIX: &str = "unit_";

/// Length of the random part of a generated id
pub const RANDOM_PART_LEN: usize = 12;

const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// `prefix` followed by 12 random lowercase alphanumerics
///
/// Uses the thread-local CSPRNG; ids are for tracking only, not security.
pub fn generate_id(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let random: String = (0..RANDOM_PART_LEN)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();
    format!("{}{}", prefix, random)
}

/// Use `value` when present and non-blank, otherwise generate one
///
/// Returns the id and whether it was generated.
pub fn id_or_generate(value: Option<&str>, prefix: &str) -> (String, bool) {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => (v.to_string(), false),
        None => (generate_id(prefix), true),
    }
}
