//! Prefixed random identifiers.

pub const PREFIX_HOUSEHOLD: &str = "household";
pub const PREFIX_GUEST: &str = "guest";

/// Lowercase hex of `bytes` random bytes.
///
/// Falls back to clock-derived bytes if the OS RNG is unavailable; these ids
/// only need to be unique within one guest list.
#[must_use]
pub fn random_hex(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    if getrandom::fill(&mut buf).is_err() {
        let nanos = chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_default()
            .to_le_bytes();
        for (i, b) in buf.iter_mut().enumerate() {
            *b = nanos[i % nanos.len()] ^ u8::try_from(i % 256).unwrap_or_default();
        }
    }
    buf.iter().map(|b| format!("{b:02x}")).collect()
}

/// Generate an id such as `household-3f9a0c12d4e5b6a7`.
#[must_use]
pub fn generate_id(prefix: &str) -> String {
    format!("{prefix}-{}", random_hex(8))
}
