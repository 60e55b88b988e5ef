use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Clear-text login credential. The manual `Debug` impl redacts the
/// value so request logging can never leak one.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    pub fn new(password: String) -> Self {
        Self(password)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// PHC-format hash string as stored on the principal record.
#[derive(Debug, Clone)]
pub struct PasswordHashString(String);

impl PasswordHashString {
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Hash with Argon2id and a fresh random salt.
pub fn hash_password(password: &Password) -> Result<PasswordHashString, anyhow::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_str().as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Password hashing failed: {}", e))?;

    Ok(PasswordHashString::new(hash.to_string()))
}

/// Check a candidate password against a stored hash. Ok(()) on match; the
/// mismatch error is deliberately unspecific.
pub fn verify_password(
    password: &Password,
    password_hash: &PasswordHashString,
) -> Result<(), anyhow::Error> {
    let parsed = PasswordHash::new(password_hash.as_str())
        .map_err(|e| anyhow::anyhow!("Stored password hash is not valid PHC: {}", e))?;

    Argon2::default()
        .verify_password(password.as_str().as_bytes(), &parsed)
        .map_err(|_| anyhow::anyhow!("Password verification failed"))
}
