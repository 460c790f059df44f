use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // admin username
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(username: &str) -> Self {
        let now = Utc::now();
        let exp = now + Duration::days(30);

        Self {
            sub: username.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        }
    }
}

pub fn create_token(secret: &str, username: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims::new(username);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
}

pub fn verify_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let token = create_token("secret", "admin").unwrap();
        let claims = verify_token("secret", &token).unwrap();

        assert_eq!(claims.sub, "admin");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_token("secret", "admin").unwrap();
        assert!(verify_token("other-secret", &token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = Claims {
            sub: "admin".to_string(),
            exp: (Utc::now() - Duration::hours(2)).timestamp(),
            iat: (Utc::now() - Duration::hours(3)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(verify_token("secret", &token).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(verify_token("secret", "not-a-jwt").is_err());
    }
}
