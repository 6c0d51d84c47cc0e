//! Subsonic token authentication.
//!
//! Every upstream call carries `u` (user), `s` (salt) and `t` (token), where
//! `t = md5_hex(secret || salt)` and the salt is six fresh alphanumeric
//! characters. See <http://www.subsonic.org/pages/api.jsp> ("Authentication").

use std::fmt;

use md5::{Digest, Md5};
use rand::Rng;
use rand::distributions::Alphanumeric;

/// Subsonic REST protocol version sent with every request.
pub const PROTOCOL_VERSION: &str = "1.16.1";

/// Client identifier sent with every request.
pub const CLIENT_NAME: &str = "glance-proxy";

/// Response format requested from the server.
pub const RESPONSE_FORMAT: &str = "json";

const SALT_LEN: usize = 6;

/// Parameter names owned by the signer. Caller-supplied extras never replace these.
const RESERVED_PARAMS: &[&str] = &["u", "t", "s", "v", "c", "f", "p"];

/// Upstream account used to sign requests.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    secret: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Token for the given salt: lowercase hex MD5 of `secret || salt`.
    pub fn token(&self, salt: &str) -> String {
        let mut hasher = Md5::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(salt.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Generate a fresh salt of six characters drawn uniformly from `[A-Za-z0-9]`.
pub fn generate_salt() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SALT_LEN)
        .map(char::from)
        .collect()
}

/// A fully signed upstream call, ready to be sent once.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub endpoint: String,
    pub salt: String,
    pub token: String,
    params: Vec<(String, String)>,
}

impl SignedRequest {
    /// Sign a call with a freshly generated salt.
    pub fn new(endpoint: &str, extra: &[(&str, &str)], credentials: &Credentials) -> Self {
        Self::with_salt(endpoint, extra, credentials, generate_salt())
    }

    /// Sign a call with an explicit salt.
    pub fn with_salt(
        endpoint: &str,
        extra: &[(&str, &str)],
        credentials: &Credentials,
        salt: String,
    ) -> Self {
        let token = credentials.token(&salt);
        let mut params = vec![
            ("u".to_string(), credentials.username().to_string()),
            ("t".to_string(), token.clone()),
            ("s".to_string(), salt.clone()),
            ("v".to_string(), PROTOCOL_VERSION.to_string()),
            ("c".to_string(), CLIENT_NAME.to_string()),
            ("f".to_string(), RESPONSE_FORMAT.to_string()),
        ];

        for (key, value) in extra {
            if RESERVED_PARAMS.contains(key) {
                tracing::debug!(endpoint, param = *key, "dropping reserved parameter override");
                continue;
            }
            params.push((key.to_string(), value.to_string()));
        }

        Self {
            endpoint: endpoint.to_string(),
            salt,
            token,
            params,
        }
    }

    /// Query pairs in the order they are sent.
    pub fn query(&self) -> &[(String, String)] {
        &self.params
    }

    /// Value of a single query parameter.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials::new("admin", "sesame")
    }

    #[test]
    fn token_matches_published_example() {
        // Example from the Subsonic API documentation.
        assert_eq!(creds().token("c19b2d"), "26719a1196d2a940705a59634eb18eab");
    }

    #[test]
    fn salt_is_six_alphanumerics() {
        for _ in 0..100 {
            let salt = generate_salt();
            assert_eq!(salt.len(), 6);
            assert!(salt.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn salt_is_regenerated_per_call() {
        let a = SignedRequest::new("ping", &[], &creds());
        let b = SignedRequest::new("ping", &[], &creds());
        // 62^6 possibilities; a collision here means the salt is not random.
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn fixed_params_present() {
        let req = SignedRequest::with_salt("getArtists", &[], &creds(), "c19b2d".into());
        assert_eq!(req.param("u"), Some("admin"));
        assert_eq!(req.param("s"), Some("c19b2d"));
        assert_eq!(req.param("t"), Some("26719a1196d2a940705a59634eb18eab"));
        assert_eq!(req.param("v"), Some("1.16.1"));
        assert_eq!(req.param("c"), Some("glance-proxy"));
        assert_eq!(req.param("f"), Some("json"));
    }

    #[test]
    fn extras_cannot_override_identity() {
        let req = SignedRequest::with_salt(
            "getAlbumList2",
            &[("u", "mallory"), ("f", "xml"), ("type", "alphabeticalByName"), ("size", "10")],
            &creds(),
            "abcdef".into(),
        );
        assert_eq!(req.param("u"), Some("admin"));
        assert_eq!(req.param("f"), Some("json"));
        assert_eq!(req.param("type"), Some("alphabeticalByName"));
        assert_eq!(req.param("size"), Some("10"));
        assert_eq!(req.query().iter().filter(|(k, _)| k == "u").count(), 1);
    }

    #[test]
    fn debug_redacts_secret() {
        let rendered = format!("{:?}", creds());
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("sesame"));
    }
}
