use argon2::{
    password_hash::{
        rand_core::OsRng,
        Error::{self, Password},
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};

/// Hash `password` with Argon2 and a fresh random salt.
///
/// The result is a PHC string (`$argon2id$v=19$...`) that embeds the salt and
/// parameters, so it is the only thing that needs storing.
///
/// # Errors
/// Returns the `password_hash` error if hashing fails.
pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);

    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Check `password` against a stored PHC string.
///
/// # Errors
/// Fails only when `hash` is not a valid PHC string; a wrong password is
/// `Ok(false)`.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, Error> {
    let parsed_hash = PasswordHash::new(hash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(Password) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_only_the_original_password() {
        let hash = hash_password("correct horse").expect("Failed to hash password");

        assert!(verify_password("correct horse", &hash).expect("Failed to verify password"));
        assert!(!verify_password("battery staple", &hash).expect("Failed to verify password"));
    }

    #[test]
    fn same_password_hashes_differently() {
        let first = hash_password("same").expect("Failed to hash password");
        let second = hash_password("same").expect("Failed to hash password");

        assert_ne!(first, second);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }
}
