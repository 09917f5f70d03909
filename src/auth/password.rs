//! Password hashing with bcrypt.

use crate::error::ApiError;

pub struct PasswordService;

impl PasswordService {
    pub fn hash_password(password: &str) -> Result<String, ApiError> {
        bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))
    }

    pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
        bcrypt::verify(password, hash)
            .map_err(|e| ApiError::Internal(format!("Password verification failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = PasswordService::hash_password("hunter2hunter2").unwrap();
        assert!(PasswordService::verify_password("hunter2hunter2", &hash).unwrap());
        assert!(!PasswordService::verify_password("wrong-password", &hash).unwrap());
    }
}
