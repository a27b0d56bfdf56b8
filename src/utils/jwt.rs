use chrono::{Duration, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode, errors::ErrorKind,
};
use surrealdb::RecordId;

use crate::errors::{Error, Result};

const TOKEN_LIFETIME_DAYS: i64 = 7;

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub id: String,
    pub exp: usize,
    pub iat: usize,
    pub iss: String,
}

impl Claims {
    pub fn new(user_id: &RecordId) -> Self {
        let iat = Utc::now();
        let exp = iat + Duration::days(TOKEN_LIFETIME_DAYS);
        Self {
            id: user_id.to_string(),
            exp: exp.timestamp() as usize,
            iat: iat.timestamp() as usize,
            iss: "vayam".to_string(),
        }
    }
}

pub fn encode_jwt(claim: &Claims, secret: &[u8]) -> Result<String> {
    let token = encode(&Header::default(), claim, &EncodingKey::from_secret(secret))?;
    Ok(token)
}

pub fn decode_jwt(token: &str, secret: &[u8]) -> Result<TokenData<Claims>> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => Error::TokenExpired,
        _ => Error::InvalidToken,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_roundtrip() {
        let user_id = RecordId::from_table_key("users", "abc123");
        let claims = Claims::new(&user_id);
        let token = encode_jwt(&claims, b"test-secret").expect("Failed to encode");

        let decoded = decode_jwt(&token, b"test-secret").expect("Failed to decode");
        assert_eq!(decoded.claims.id, "users:abc123");
        assert_eq!(decoded.claims.iss, "vayam");
    }

    #[test]
    fn test_decode_with_wrong_secret_fails() {
        let user_id = RecordId::from_table_key("users", "abc123");
        let token = encode_jwt(&Claims::new(&user_id), b"test-secret").expect("Failed to encode");

        assert!(matches!(
            decode_jwt(&token, b"other-secret"),
            Err(Error::InvalidToken)
        ));
    }
}
