//! Cache key derivation.

use sha2::{Digest, Sha256};

/// Compute the cache key for a (prompt, system, model) triple.
//
// SHA-256 over length-prefixed fields rather than a delimited string:
// a delimiter that can legally appear inside a field would let two
// different triples collide on the boundary alone. Length prefixes make
// the encoding injective. The hash is stable across processes, so the
// key works for shared backends too.
pub fn response_key(prompt: &str, system: &str, model: &str) -> String {
    let mut hasher = Sha256::new();
    for field in [prompt, system, model] {
        hasher.update((field.len() as u64).to_be_bytes());
        hasher.update(field.as_bytes());
    }
    let digest = hasher.finalize();
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}
