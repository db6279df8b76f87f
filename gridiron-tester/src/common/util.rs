use sha2::{Digest, Sha256};

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Short hex fingerprint of a narration export.
pub fn digest_text(text: &str) -> String {
    let hash = Sha256::digest(text.as_bytes());
    format!("{hash:x}").chars().take(16).collect()
}
