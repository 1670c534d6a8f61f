//! App-lock passcode hashing.
//!
//! The passcode gate is an interaction hurdle, not a security boundary: the
//! profile document is readable by anyone with access to the store. FNV-1a/64
//! keeps the stored form from being the literal passcode while staying
//! dependency-free and deterministic.

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Hash a passcode to its stored hex form.
pub fn hash(passcode: &str) -> String {
    let mut acc = FNV_OFFSET;
    for byte in passcode.as_bytes() {
        acc ^= u64::from(*byte);
        acc = acc.wrapping_mul(FNV_PRIME);
    }
    format!("{acc:016x}")
}

/// Check an entered passcode against a stored digest.
pub fn verify(passcode: &str, stored_hash: &str) -> bool {
    hash(passcode) == stored_hash
}
