//! Credentials held by the configuration
//!
//! The database connection string, the PostgREST API key and the FTP password
//! are all wrapped in [`SecretString`]. The inner value is zeroed on drop and
//! never shows up in `Debug` output or log fields.
//!
//! ```rust
//! use stockfeed::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let password = secret_string("ftp-pass".to_string());
//! assert_eq!(password.expose_secret().as_ref(), "ftp-pass");
//! assert!(!format!("{password:?}").contains("ftp-pass"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Credential text, only reachable through `ExposeSecret`
#[derive(Clone, Debug, Serialize, Deserialize, Zeroize)]
#[serde(transparent)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// The part of a connection URL that is safe to print
    ///
    /// Drops the scheme and any `user:password@` prefix, so
    /// `postgresql://feed:pw@db:5432/stock` becomes `db:5432/stock`.
    pub fn redacted_endpoint(&self) -> &str {
        let value = self.0.as_str();
        let rest = value.split_once("://").map_or(value, |(_, rest)| rest);
        rest.rsplit_once('@').map_or(rest, |(_, host)| host)
    }
}

pub type SecretString = Secret<SecretValue>;

#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}
