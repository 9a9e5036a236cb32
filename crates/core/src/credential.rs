//! Password credential decoding.
//!
//! Keycloak stores a password as a credential whose `secretData` and
//! `credentialData` fields are themselves JSON documents encoded as strings:
//!
//! ```json
//! {
//!   "type": "password",
//!   "secretData": "{\"value\":\"<base64 hash>\",\"salt\":\"<base64 salt>\"}",
//!   "credentialData": "{\"hashIterations\":27500,\"algorithm\":\"pbkdf2-sha256\"}"
//! }
//! ```
//!
//! ZITADEL imports such hashes through its generic hash mechanism, which
//! parses the string `$<algorithm>$<iterations>$<salt>$<hash>` positionally.
//! Algorithm, iteration count, salt and hash are carried over unchanged; only
//! the framing is re-encoded.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::CredentialError;

/// Credential `type` that carries a password.
pub const PASSWORD_CREDENTIAL_TYPE: &str = "password";

// ---------------------------------------------------------------------------
// Algorithms
// ---------------------------------------------------------------------------

/// Supported password hashing algorithms: salted PBKDF2 over one of the SHA
/// digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PasswordAlgorithm {
    Pbkdf2Sha1,
    Pbkdf2Sha224,
    Pbkdf2Sha256,
    Pbkdf2Sha384,
    Pbkdf2Sha512,
}

impl PasswordAlgorithm {
    /// Every supported algorithm, in digest-size order.
    pub const ALL: [PasswordAlgorithm; 5] = [
        Self::Pbkdf2Sha1,
        Self::Pbkdf2Sha224,
        Self::Pbkdf2Sha256,
        Self::Pbkdf2Sha384,
        Self::Pbkdf2Sha512,
    ];

    /// Identifier shared by Keycloak and the ZITADEL hash format.
    pub fn identifier(self) -> &'static str {
        match self {
            Self::Pbkdf2Sha1 => "pbkdf2",
            Self::Pbkdf2Sha224 => "pbkdf2-sha224",
            Self::Pbkdf2Sha256 => "pbkdf2-sha256",
            Self::Pbkdf2Sha384 => "pbkdf2-sha384",
            Self::Pbkdf2Sha512 => "pbkdf2-sha512",
        }
    }
}

impl FromStr for PasswordAlgorithm {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.identifier() == s)
            .ok_or_else(|| CredentialError::UnsupportedAlgorithm(s.to_string()))
    }
}

impl fmt::Display for PasswordAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

// ---------------------------------------------------------------------------
// Provider structures
// ---------------------------------------------------------------------------

/// A single credential of a Keycloak user. Only the fields needed to locate
/// and decode a password are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    #[serde(rename = "type", default)]
    pub kind: String,

    /// JSON-encoded [`SecretData`].
    #[serde(default)]
    pub secret_data: String,

    /// JSON-encoded [`CredentialData`].
    #[serde(default)]
    pub credential_data: String,
}

/// Decoded `secretData`: the base64 hash and salt.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretData {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub salt: String,
}

/// Decoded `credentialData`: how the hash was produced.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialData {
    #[serde(default)]
    pub hash_iterations: u64,
    #[serde(default)]
    pub algorithm: String,
}

// ---------------------------------------------------------------------------
// Encoded hash
// ---------------------------------------------------------------------------

/// A PBKDF2 hash in the `$<algorithm>$<iterations>$<salt>$<hash>` layout.
///
/// `salt` and `hash` are kept in their original base64 text form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pbkdf2Hash {
    pub algorithm: PasswordAlgorithm,
    pub iterations: u64,
    pub salt: String,
    pub hash: String,
}

impl Pbkdf2Hash {
    /// Build a hash from decoded Keycloak secret and credential data.
    pub fn from_keycloak(
        secret: SecretData,
        data: &CredentialData,
    ) -> Result<Self, CredentialError> {
        Ok(Self {
            algorithm: data.algorithm.parse()?,
            iterations: data.hash_iterations,
            salt: secret.salt,
            hash: secret.value,
        })
    }
}

impl fmt::Display for Pbkdf2Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${}${}${}${}",
            self.algorithm, self.iterations, self.salt, self.hash
        )
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Return the first credential of type `password`, if any.
pub fn find_password_credential(credentials: &[Credential]) -> Option<&Credential> {
    credentials
        .iter()
        .find(|c| c.kind == PASSWORD_CREDENTIAL_TYPE)
}

/// Decode the password of a user into the encoded hash string.
///
/// Users without a password credential, or whose secret or credential data
/// is empty, get an empty string: importing a password is optional.
pub fn decode_password(credentials: &[Credential]) -> Result<String, CredentialError> {
    let Some(credential) = find_password_credential(credentials) else {
        return Ok(String::new());
    };
    if credential.secret_data.is_empty() || credential.credential_data.is_empty() {
        debug!("password credential without secret or credential data");
        return Ok(String::new());
    }

    let secret: SecretData =
        serde_json::from_str(&credential.secret_data).map_err(CredentialError::SecretData)?;
    let data: CredentialData = serde_json::from_str(&credential.credential_data)
        .map_err(CredentialError::CredentialData)?;

    Ok(Pbkdf2Hash::from_keycloak(secret, &data)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use pbkdf2::pbkdf2_hmac;
    use sha1::Sha1;
    use sha2::{Sha224, Sha256, Sha384, Sha512};

    impl Pbkdf2Hash {
        /// Split an encoded hash positionally, the way the importer reads it.
        fn parse(encoded: &str) -> Option<Self> {
            let mut parts = encoded.strip_prefix('$')?.splitn(4, '$');
            Some(Self {
                algorithm: parts.next()?.parse().ok()?,
                iterations: parts.next()?.parse().ok()?,
                salt: parts.next()?.to_string(),
                hash: parts.next()?.to_string(),
            })
        }

        /// Derive a key of the stored hash's length from `password` and
        /// compare. Keycloak's 512-bit keys over SHA-256 span two blocks.
        fn verify(&self, password: &str) -> bool {
            let (Ok(salt), Ok(expected), Ok(rounds)) = (
                STANDARD.decode(&self.salt),
                STANDARD.decode(&self.hash),
                u32::try_from(self.iterations),
            ) else {
                return false;
            };

            let mut derived = vec![0u8; expected.len()];
            let password = password.as_bytes();
            match self.algorithm {
                PasswordAlgorithm::Pbkdf2Sha1 => {
                    pbkdf2_hmac::<Sha1>(password, &salt, rounds, &mut derived)
                }
                PasswordAlgorithm::Pbkdf2Sha224 => {
                    pbkdf2_hmac::<Sha224>(password, &salt, rounds, &mut derived)
                }
                PasswordAlgorithm::Pbkdf2Sha256 => {
                    pbkdf2_hmac::<Sha256>(password, &salt, rounds, &mut derived)
                }
                PasswordAlgorithm::Pbkdf2Sha384 => {
                    pbkdf2_hmac::<Sha384>(password, &salt, rounds, &mut derived)
                }
                PasswordAlgorithm::Pbkdf2Sha512 => {
                    pbkdf2_hmac::<Sha512>(password, &salt, rounds, &mut derived)
                }
            }
            !expected.is_empty() && derived == expected
        }
    }

    const SECRET: &str = r#"{"value":"ng6oDRung/pBLayd5ro7IU3mL/p86pg3WvQNQc+N1Eg=","salt":"RaXjs4RiUKgJGkX6kp277w==","additionalParameters":{}}"#;
    const CRED_SHA256: &str =
        r#"{"hashIterations":27500,"algorithm":"pbkdf2-sha256","additionalParameters":{}}"#;

    fn password(secret: &str, data: &str) -> Vec<Credential> {
        vec![Credential {
            kind: "password".into(),
            secret_data: secret.into(),
            credential_data: data.into(),
        }]
    }

    #[test]
    fn test_algorithm_identifiers_round_trip() {
        for alg in PasswordAlgorithm::ALL {
            assert_eq!(alg.identifier().parse::<PasswordAlgorithm>().unwrap(), alg);
        }
        assert!(matches!(
            "bcrypt".parse::<PasswordAlgorithm>(),
            Err(CredentialError::UnsupportedAlgorithm(ref a)) if a == "bcrypt"
        ));
    }

    #[test]
    fn test_no_password_credential() {
        let creds = vec![Credential {
            kind: "otp".into(),
            ..Default::default()
        }];
        assert_eq!(decode_password(&creds).unwrap(), "");
        assert_eq!(decode_password(&[]).unwrap(), "");
    }

    #[test]
    fn test_empty_credential_data() {
        assert_eq!(decode_password(&password(SECRET, "")).unwrap(), "");
    }

    #[test]
    fn test_empty_secret_data() {
        assert_eq!(decode_password(&password("", CRED_SHA256)).unwrap(), "");
    }

    #[test]
    fn test_secret_data_error() {
        let result = decode_password(&password("~~~", CRED_SHA256));
        assert!(matches!(result, Err(CredentialError::SecretData(_))));
    }

    #[test]
    fn test_credential_data_error() {
        let result = decode_password(&password(SECRET, "~~~"));
        assert!(matches!(result, Err(CredentialError::CredentialData(_))));
    }

    #[test]
    fn test_unknown_algorithm() {
        let data = r#"{"hashIterations":27500,"algorithm":"foobar","additionalParameters":{}}"#;
        let result = decode_password(&password(SECRET, data));
        assert!(matches!(
            result,
            Err(CredentialError::UnsupportedAlgorithm(ref a)) if a == "foobar"
        ));
    }

    #[test]
    fn test_success() {
        let got = decode_password(&password(SECRET, CRED_SHA256)).unwrap();
        assert_eq!(
            got,
            "$pbkdf2-sha256$27500$RaXjs4RiUKgJGkX6kp277w==$ng6oDRung/pBLayd5ro7IU3mL/p86pg3WvQNQc+N1Eg="
        );

        // The encoded string must be consumable as a PBKDF2 hash.
        let parsed = Pbkdf2Hash::parse(&got).unwrap();
        assert_eq!(parsed.algorithm, PasswordAlgorithm::Pbkdf2Sha256);
        assert_eq!(parsed.iterations, 27500);
        assert!(!parsed.verify("x"));
    }

    #[test]
    fn test_iterations_beyond_u32() {
        let data = r#"{"hashIterations":5000000000,"algorithm":"pbkdf2-sha512"}"#;
        let got = decode_password(&password(SECRET, data)).unwrap();
        assert!(got.starts_with("$pbkdf2-sha512$5000000000$"), "{got}");
    }

    #[test]
    fn test_plain_values_are_not_reencoded() {
        let got = decode_password(&password(
            r#"{"value":"V","salt":"S"}"#,
            r#"{"algorithm":"pbkdf2-sha256","hashIterations":27500}"#,
        ))
        .unwrap();
        assert_eq!(got, "$pbkdf2-sha256$27500$S$V");
    }

    #[test]
    fn test_first_password_credential_wins() {
        let mut creds = password(SECRET, CRED_SHA256);
        creds.insert(
            0,
            Credential {
                kind: "otp".into(),
                secret_data: "ignored".into(),
                credential_data: "ignored".into(),
            },
        );
        creds.push(Credential {
            kind: "password".into(),
            secret_data: r#"{"value":"other","salt":"other"}"#.into(),
            credential_data: CRED_SHA256.into(),
        });
        let got = decode_password(&creds).unwrap();
        assert!(got.ends_with("$ng6oDRung/pBLayd5ro7IU3mL/p86pg3WvQNQc+N1Eg="));
    }

    #[test]
    fn test_verify_known_vectors() {
        // Vectors produced with an independent PBKDF2 implementation,
        // password "Password1!", salt "zitadel-migrate!".
        let vectors = [
            "$pbkdf2$1000$eml0YWRlbC1taWdyYXRlIQ==$4KW4wOp1RTmN1mPK9YPYOry9SWs=",
            "$pbkdf2-sha224$1000$eml0YWRlbC1taWdyYXRlIQ==$3KvkwGju+oN+SRHsxzjOofbc8jrhzgLxPgRkVg==",
            "$pbkdf2-sha256$27500$eml0YWRlbC1taWdyYXRlIQ==$jyK/fWuYCSvOJBrJnOlLW9XNlXpIwih4Yp+LGcBr/vs=",
            "$pbkdf2-sha384$1000$eml0YWRlbC1taWdyYXRlIQ==$TGZ9mz8DI37lYK0aWziaNVzdntJngjw0lC2dzwgSRaQB/lAB/oLhFvZzPGTlJyO4",
            "$pbkdf2-sha512$1000$eml0YWRlbC1taWdyYXRlIQ==$L1pHB8aY/x7T0sFjBzTHxRSxkXYF/cv/mYDMZhkAt/+drjqBiBIuC/YRfLd/3K94QPGggmItTocsLQ7sxMLX5A==",
            // 64-byte key over SHA-256 spans two PBKDF2 blocks.
            "$pbkdf2-sha256$1000$eml0YWRlbC1taWdyYXRlIQ==$9WlWlWvArjTkFV7vRBD3XRGnOYFMdggjBNaKYSkebL0gwDujJ6hlEQvLLsUguSfDfY8LeMt+1a+/P15AohR+XA==",
        ];
        for encoded in vectors {
            let hash = Pbkdf2Hash::parse(encoded).unwrap();
            assert_eq!(hash.to_string(), encoded);
            assert!(hash.verify("Password1!"), "{encoded}");
            assert!(!hash.verify("password1!"), "{encoded}");
        }
    }
}
