use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// Errors produced by the common-crypto helpers.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("secret key is empty")]
    EmptyKey,
    #[error("invalid HMAC key length")]
    InvalidMacKey,
}

/// Shared secret used to sign gateway requests. The bytes are wiped on drop.
#[derive(Clone, Default)]
pub struct SecretKey(Zeroizing<String>);

impl SecretKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// Borrow the raw secret. Callers must not log or persist the returned value.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for SecretKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SecretKey {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey")
            .field("bytes", &"***redacted***")
            .finish()
    }
}

/// Raw HMAC-SHA256 over `message` keyed by `key`.
pub fn hmac_sha256(key: &[u8], message: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if key.is_empty() {
        return Err(CryptoError::EmptyKey);
    }
    let mut mac =
        <HmacSha256 as Mac>::new_from_slice(key).map_err(|_| CryptoError::InvalidMacKey)?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// HMAC-SHA256 rendered as lowercase hex, the format the gateway expects in `pp_SecureHash`.
pub fn hmac_sha256_hex(key: &SecretKey, message: &str) -> Result<String, CryptoError> {
    let digest = hmac_sha256(key.expose().as_bytes(), message.as_bytes())?;
    Ok(hex::encode(digest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_rfc4231_case_two() {
        let key = SecretKey::new("Jefe");
        let mac = hmac_sha256_hex(&key, "what do ya want for nothing?").expect("mac");
        assert_eq!(
            mac,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn output_is_lowercase_hex() {
        let key = SecretKey::new("HK1");
        let mac = hmac_sha256_hex(&key, "HK1&a&b").expect("mac");
        assert_eq!(mac.len(), 64);
        assert!(mac.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn empty_key_is_rejected() {
        let err = hmac_sha256(b"", b"payload").expect_err("empty key");
        assert!(matches!(err, CryptoError::EmptyKey));
    }

    #[test]
    fn debug_redacts_secret() {
        let key = SecretKey::new("super-secret-value");
        let rendered = format!("{key:?}");
        assert!(!rendered.contains("super-secret-value"));
        assert!(rendered.contains("redacted"));
    }
}
