//! Authentication primitives: login credentials, stored password digests and
//! user accounts.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased and must not be empty.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use orders_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Admin@Example.com ", "password").unwrap();
/// assert_eq!(creds.email(), "admin@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalized.to_lowercase(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email suitable for account lookups.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

const HASH_SCHEME: &str = "sha256";
const HASH_ITERATIONS: u32 = 10_000;
const SALT_LEN: usize = 16;

/// Error raised when a stored digest cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed password hash: {reason}")]
pub struct PasswordHashFormatError {
    reason: &'static str,
}

/// Salted, iterated SHA-256 password digest.
///
/// Encoded as `sha256$<iterations>$<salt hex>$<digest hex>`.
// TODO: move to argon2 once the dependency is approved for the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    iterations: u32,
    salt: Vec<u8>,
    digest: Vec<u8>,
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> Vec<u8> {
    let mut digest = Zeroizing::new(
        Sha256::new()
            .chain_update(salt)
            .chain_update(password)
            .finalize()
            .to_vec(),
    );
    for _ in 1..iterations {
        let next = Sha256::new()
            .chain_update(salt)
            .chain_update(digest.as_slice())
            .finalize()
            .to_vec();
        digest = Zeroizing::new(next);
    }
    digest.to_vec()
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

impl PasswordHash {
    /// Hash a password with a fresh random salt.
    pub fn generate(password: &str) -> Self {
        let mut salt = vec![0_u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let digest = derive(password, &salt, HASH_ITERATIONS);
        Self {
            iterations: HASH_ITERATIONS,
            salt,
            digest,
        }
    }

    /// Check a candidate password against the stored digest.
    pub fn verify(&self, password: &str) -> bool {
        let candidate = derive(password, &self.salt, self.iterations);
        constant_time_eq(&candidate, &self.digest)
    }

    /// Decode a stored digest.
    pub fn parse(encoded: &str) -> Result<Self, PasswordHashFormatError> {
        let mut parts = encoded.split('$');
        let (Some(scheme), Some(iterations), Some(salt), Some(digest), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(PasswordHashFormatError {
                reason: "expected four `$`-separated fields",
            });
        };
        if scheme != HASH_SCHEME {
            return Err(PasswordHashFormatError {
                reason: "unsupported scheme",
            });
        }
        let iterations = iterations
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or(PasswordHashFormatError {
                reason: "invalid iteration count",
            })?;
        let salt = hex::decode(salt).map_err(|_| PasswordHashFormatError {
            reason: "salt is not hex",
        })?;
        let digest = hex::decode(digest).map_err(|_| PasswordHashFormatError {
            reason: "digest is not hex",
        })?;
        Ok(Self {
            iterations,
            salt,
            digest,
        })
    }

    /// Encode the digest for storage.
    pub fn encode(&self) -> String {
        format!(
            "{HASH_SCHEME}${}${}${}",
            self.iterations,
            hex::encode(&self.salt),
            hex::encode(&self.digest)
        )
    }
}

/// Database identifier of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct UserAccountId(i64);

impl UserAccountId {
    /// Wrap a raw identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserAccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Back-office account allowed to log in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: UserAccountId,
    pub name: String,
    pub email: String,
    pub password_hash: PasswordHash,
}

/// Public view of an authenticated account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    pub id: UserAccountId,
    pub name: String,
    pub email: String,
}

impl From<&UserAccount> for AccountSummary {
    fn from(value: &UserAccount) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
            email: value.email.clone(),
        }
    }
}
