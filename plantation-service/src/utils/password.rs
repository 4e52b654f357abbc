use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a password with Argon2id; the generated salt is embedded in the hash.
pub fn hash_password(password: &str) -> Result<String, anyhow::Error> {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against a stored hash. Ok(()) on match, Err otherwise.
pub fn verify_password(password: &str, password_hash: &str) -> Result<(), anyhow::Error> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {}", e))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| anyhow::anyhow!("Password verification failed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("estatePassword123").expect("Failed to hash password");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("estatePassword123", &hash).is_ok());
    }

    #[test]
    fn wrong_password_fails_verification() {
        let hash = hash_password("estatePassword123").expect("Failed to hash password");
        assert!(verify_password("somethingElse", &hash).is_err());
    }

    #[test]
    fn same_password_hashes_differently() {
        let first = hash_password("estatePassword123").expect("Failed to hash password");
        let second = hash_password("estatePassword123").expect("Failed to hash password");
        assert_ne!(first, second);
    }
}
