use crate::error::AppResult;

pub fn hash(plain: &str) -> AppResult<String> {
    Ok(bcrypt::hash(plain, bcrypt::DEFAULT_COST)?)
}

/// Constant-time comparison via bcrypt. A malformed stored hash verifies
/// as false rather than erroring out of the login flow.
pub fn verify(plain: &str, hash: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let hashed = hash("hunter2").unwrap();
        assert_ne!(hashed, "hunter2");
        assert!(verify("hunter2", &hashed));
        assert!(!verify("hunter3", &hashed));
    }

    #[test]
    fn verify_garbage_hash_is_false() {
        assert!(!verify("hunter2", "not-a-bcrypt-hash"));
    }
}
