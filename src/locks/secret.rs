use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::RngCore;

/// Generate a fresh opaque lock secret.
///
/// 16 random bytes, URL-safe base64 without padding, so the token can
/// travel in form fields and query strings unescaped.
pub fn fresh_secret() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_are_distinct_and_url_safe() {
        let a = fresh_secret();
        let b = fresh_secret();
        assert_ne!(a, b);
        assert_eq!(a.len(), 22); // 16 bytes, unpadded base64
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
