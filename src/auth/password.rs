use crate::error::AppError;
use bcrypt::{hash, verify, DEFAULT_COST};

/// bcrypt hashing with a configurable work factor.
///
/// Each call to `hash` draws a fresh salt, which bcrypt embeds in the digest.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        Ok(hash(password, self.cost)?)
    }

    /// Returns `false` for a wrong password and for a digest bcrypt cannot parse.
    pub fn verify(&self, password: &str, hashed_password: &str) -> bool {
        match verify(password, hashed_password) {
            Ok(matches) => matches,
            Err(e) => {
                log::warn!("rejecting unreadable password hash: {}", e);
                false
            }
        }
    }
}
