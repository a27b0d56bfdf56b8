use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

/// Returns the plaintext token and its hash. Only the hash is stored.
pub fn generate_token() -> (String, String) {
    let token = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect::<String>();

    let hash = hash_token(&token);
    (token, hash)
}

pub fn hash_token(val: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(val.as_bytes());

    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_token_matches_its_hash() {
        let (token, hash) = generate_token();
        assert_eq!(token.len(), 32);
        assert_eq!(hash_token(&token), hash);
    }

    #[test]
    fn test_tokens_are_unique() {
        let (a, _) = generate_token();
        let (b, _) = generate_token();
        assert_ne!(a, b);
    }
}
