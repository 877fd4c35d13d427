//! Time-limited signed URLs.
//!
//! A signed URL has the shape
//! `{base}/{bucket}/{path}?expires={unix_secs}&token={hex}` where the token
//! is a BLAKE3 keyed hash over bucket, path and expiry. Anyone holding the
//! signing key can verify a URL without storing it.

use crate::error::{StoreError, StoreResult};

const KEY_CONTEXT: &str = "artarget 2024 signed-url key v1";

/// Longest lifetime a signed URL may be issued for (seven days).
pub const MAX_SIGNED_URL_EXPIRY_SECS: u64 = 7 * 24 * 60 * 60;

/// Signs and verifies object URLs for one bucket.
#[derive(Clone)]
pub struct UrlSigner {
    key: [u8; 32],
    base_url: String,
    bucket: String,
}

impl UrlSigner {
    pub fn new(base_url: impl Into<String>, bucket: impl Into<String>, key: [u8; 32]) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            key,
            base_url,
            bucket: bucket.into(),
        }
    }

    /// Derive the signing key from a configured secret.
    pub fn from_secret(base_url: impl Into<String>, bucket: impl Into<String>, secret: &str) -> Self {
        let key = blake3::derive_key(KEY_CONTEXT, secret.as_bytes());
        Self::new(base_url, bucket, key)
    }

    /// A signer with a fresh random key; URLs die with the process.
    pub fn ephemeral(base_url: impl Into<String>, bucket: impl Into<String>) -> Self {
        let mut key = [0u8; 32];
        rand::Rng::fill(&mut rand::thread_rng(), &mut key);
        Self::new(base_url, bucket, key)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn public_url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.bucket, path)
    }

    /// Sign `path` for access until `expires_at` (unix seconds).
    pub fn sign(&self, path: &str, expires_at: i64) -> String {
        let token = self.token(path, expires_at);
        format!(
            "{}?expires={expires_at}&token={}",
            self.public_url(path),
            token.to_hex()
        )
    }

    /// Sign `path` for `expiry_secs` seconds starting at `now` (unix seconds).
    pub fn sign_for(&self, path: &str, now: i64, expiry_secs: u64) -> StoreResult<String> {
        if expiry_secs == 0 || expiry_secs > MAX_SIGNED_URL_EXPIRY_SECS {
            return Err(StoreError::InvalidExpiry(expiry_secs));
        }
        let expires_at = i64::try_from(expiry_secs)
            .ok()
            .and_then(|secs| now.checked_add(secs))
            .ok_or(StoreError::InvalidExpiry(expiry_secs))?;
        Ok(self.sign(path, expires_at))
    }

    /// Check a signed URL at time `now` (unix seconds), returning the object
    /// path it grants access to.
    pub fn verify(&self, url: &str, now: i64) -> StoreResult<String> {
        let prefix = format!("{}/{}/", self.base_url, self.bucket);
        let rest = url
            .strip_prefix(&prefix)
            .ok_or_else(|| StoreError::InvalidSignature("URL is not for this bucket".into()))?;
        let (path, query) = rest
            .split_once('?')
            .ok_or_else(|| StoreError::InvalidSignature("missing query string".into()))?;

        let mut expires = None;
        let mut token = None;
        for pair in query.split('&') {
            match pair.split_once('=') {
                Some(("expires", v)) => expires = v.parse::<i64>().ok(),
                Some(("token", v)) => token = blake3::Hash::from_hex(v).ok(),
                _ => {}
            }
        }
        let expires =
            expires.ok_or_else(|| StoreError::InvalidSignature("missing or bad expiry".into()))?;
        let token =
            token.ok_or_else(|| StoreError::InvalidSignature("missing or bad token".into()))?;

        // blake3::Hash equality is constant-time.
        if token != self.token(path, expires) {
            return Err(StoreError::InvalidSignature("token mismatch".into()));
        }
        if now > expires {
            return Err(StoreError::Expired(expires));
        }
        Ok(path.to_string())
    }

    fn token(&self, path: &str, expires_at: i64) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new_keyed(&self.key);
        hasher.update(self.bucket.as_bytes());
        hasher.update(b"\n");
        hasher.update(path.as_bytes());
        hasher.update(b"\n");
        hasher.update(expires_at.to_string().as_bytes());
        hasher.finalize()
    }
}

impl std::fmt::Debug for UrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlSigner")
            .field("base_url", &self.base_url)
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> UrlSigner {
        UrlSigner::from_secret("https://store.example/", "targetsimages", "s3cret")
    }

    #[test]
    fn public_url_trims_base_slash() {
        assert_eq!(
            signer().public_url("marker-1.png"),
            "https://store.example/targetsimages/marker-1.png"
        );
    }

    #[test]
    fn sign_then_verify() {
        let s = signer();
        let url = s.sign("marker-5-1.png", 2_000);
        assert!(url.starts_with("https://store.example/targetsimages/marker-5-1.png?expires=2000&token="));
        assert_eq!(s.verify(&url, 1_999).unwrap(), "marker-5-1.png");
        assert_eq!(s.verify(&url, 2_000).unwrap(), "marker-5-1.png");
    }

    #[test]
    fn expired_url_is_rejected() {
        let s = signer();
        let url = s.sign("a.png", 100);
        assert!(matches!(s.verify(&url, 101), Err(StoreError::Expired(100))));
    }

    #[test]
    fn tampered_path_or_expiry_is_rejected() {
        let s = signer();
        let url = s.sign("a.png", 100);
        let moved = url.replace("a.png", "b.png");
        assert!(matches!(s.verify(&moved, 0), Err(StoreError::InvalidSignature(_))));
        let extended = url.replace("expires=100", "expires=999");
        assert!(matches!(s.verify(&extended, 0), Err(StoreError::InvalidSignature(_))));
    }

    #[test]
    fn other_key_is_rejected() {
        let url = signer().sign("a.png", 100);
        let other = UrlSigner::from_secret("https://store.example", "targetsimages", "other");
        assert!(other.verify(&url, 0).is_err());
    }

    #[test]
    fn sign_for_adds_expiry() {
        let s = signer();
        let url = s.sign_for("a.png", 1_000, 60).unwrap();
        assert!(url.contains("expires=1060&"));
        assert_eq!(s.verify(&url, 1_060).unwrap(), "a.png");
    }

    #[test]
    fn sign_for_rejects_out_of_range_expiry() {
        let s = signer();
        for secs in [0, MAX_SIGNED_URL_EXPIRY_SECS + 1, i64::MAX as u64, u64::MAX] {
            assert!(matches!(
                s.sign_for("a.png", 1_000, secs),
                Err(StoreError::InvalidExpiry(v)) if v == secs
            ));
        }
        assert!(s.sign_for("a.png", 1_000, MAX_SIGNED_URL_EXPIRY_SECS).is_ok());
        assert!(s.sign_for("a.png", i64::MAX - 10, 60).is_err());
    }

    #[test]
    fn debug_hides_key() {
        let dbg = format!("{:?}", UrlSigner::ephemeral("http://x", "b"));
        assert!(dbg.contains("UrlSigner"));
        assert!(!dbg.contains("key"));
    }
}
