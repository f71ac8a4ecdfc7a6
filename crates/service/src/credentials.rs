//! Credential hashing.
//!
//! Hashes are deterministic: the salt is fixed per deployment, so verifying a
//! credential means hashing the candidate and comparing stored values. The
//! hasher itself never compares.

use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use configs::CredentialsConfig;

use crate::errors::ServiceError;

pub trait CredentialHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, ServiceError>;
}

/// Argon2id with deployment-wide parameters; output is a PHC string.
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
    salt: SaltString,
}

impl Argon2Hasher {
    pub fn new(cfg: &CredentialsConfig) -> Result<Self, ServiceError> {
        cfg.validate().map_err(|e| ServiceError::Validation(e.to_string()))?;
        let params = Params::new(cfg.memory_kib, cfg.iterations, cfg.parallelism, None)
            .map_err(|e| ServiceError::Hash(e.to_string()))?;
        let salt = SaltString::encode_b64(cfg.salt.as_bytes()).map_err(|e| ServiceError::Hash(e.to_string()))?;
        Ok(Self { argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params), salt })
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String, ServiceError> {
        self.argon2
            .hash_password(plaintext.as_bytes(), &self.salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ServiceError::Hash(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::credentials_config;

    #[test]
    fn same_input_same_output() {
        let hasher = Argon2Hasher::new(&credentials_config()).unwrap();
        let a = hasher.hash("p1").unwrap();
        assert_eq!(a, hasher.hash("p1").unwrap());
        assert!(a.starts_with("$argon2id$"));
        assert!(!a.contains("p1$"));
    }

    #[test]
    fn distinct_inputs_distinct_outputs() {
        let hasher = Argon2Hasher::new(&credentials_config()).unwrap();
        assert_ne!(hasher.hash("p1").unwrap(), hasher.hash("p2").unwrap());
        assert_ne!(hasher.hash("").unwrap(), hasher.hash(" ").unwrap());
    }

    #[test]
    fn two_hashers_with_one_profile_agree() {
        let a = Argon2Hasher::new(&credentials_config()).unwrap();
        let b = Argon2Hasher::new(&credentials_config()).unwrap();
        assert_eq!(a.hash("secret").unwrap(), b.hash("secret").unwrap());
    }

    #[test]
    fn short_salt_is_refused() {
        let cfg = CredentialsConfig { salt: "tiny".into(), ..credentials_config() };
        assert!(matches!(Argon2Hasher::new(&cfg), Err(ServiceError::Validation(_))));
    }
}
