use crate::error::AppError;
use bcrypt::{hash, verify};

/// bcrypt only reads the first 72 bytes of its input. Anything longer is refused
/// so that two passwords sharing that prefix never verify as each other.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// One-way salted password hashing backed by bcrypt.
///
/// Every call to [`PasswordHasher::hash`] draws a fresh random salt, so the same
/// plaintext never produces the same hash twice. The salt and cost are embedded
/// in the hash string, which is all [`PasswordHasher::verify`] needs.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AppError::ValidationError(format!(
                "password: must be at most {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }
        hash(password, self.cost)
            .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
    }

    /// Returns `Ok(false)` on mismatch. Only a hash that cannot be parsed is an error.
    ///
    /// bcrypt compares the recomputed digest in constant time.
    pub fn verify(&self, password: &str, hashed_password: &str) -> Result<bool, AppError> {
        // No stored hash can come from a longer input.
        if password.len() > MAX_PASSWORD_BYTES {
            return Ok(false);
        }
        verify(password, hashed_password)
            .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}
