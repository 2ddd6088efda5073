//! Issuing and verifying the JSON web tokens that authenticate API requests.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, user::UserID};

/// How long an access token is valid for by default.
pub const DEFAULT_TOKEN_DURATION: Duration = Duration::days(7);

/// The contents of a JSON Web Token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub sub: UserID,
    /// The time the token was issued as a unix timestamp.
    pub iat: i64,
    /// The expiry time of the token as a unix timestamp.
    pub exp: i64,
}

/// Create a signed token for `user_id` that expires after `duration`.
///
/// # Errors
///
/// Returns an [Error::TokenCreation] if the token could not be encoded.
pub fn encode_token(
    user_id: UserID,
    duration: Duration,
    encoding_key: &EncodingKey,
) -> Result<String, Error> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        sub: user_id,
        iat: now.unix_timestamp(),
        exp: (now + duration).unix_timestamp(),
    };

    encode(&Header::default(), &claims, encoding_key)
        .map_err(|error| Error::TokenCreation(error.to_string()))
}

/// Verify the signature and expiry of `token` and return its claims.
///
/// # Errors
///
/// Returns [Error::ExpiredToken] if the token has expired and
/// [Error::InvalidToken] for any other problem with the token.
pub fn decode_token(token: &str, decoding_key: &DecodingKey) -> Result<Claims, Error> {
    decode::<Claims>(token, decoding_key, &Validation::default())
        .map(|token_data| token_data.claims)
        .map_err(|error| match error.kind() {
            ErrorKind::ExpiredSignature => Error::ExpiredToken,
            _ => Error::InvalidToken,
        })
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{DecodingKey, EncodingKey};
    use time::Duration;

    use crate::{Error, user::UserID};

    use super::{DEFAULT_TOKEN_DURATION, decode_token, encode_token};

    const SECRET: &[u8] = b"averysecretsecret";

    #[test]
    fn decode_gives_same_user_id() {
        let token = encode_token(
            UserID::new(42),
            DEFAULT_TOKEN_DURATION,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let claims = decode_token(&token, &DecodingKey::from_secret(SECRET)).unwrap();

        assert_eq!(claims.sub, UserID::new(42));
        assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_DURATION.whole_seconds());
    }

    #[test]
    fn expired_token_is_rejected_as_expired() {
        // The default validation allows 60 seconds of leeway.
        let token = encode_token(
            UserID::new(1),
            Duration::hours(-1),
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let result = decode_token(&token, &DecodingKey::from_secret(SECRET));

        assert_eq!(result, Err(Error::ExpiredToken));
    }

    #[test]
    fn token_signed_with_other_key_is_invalid() {
        let token = encode_token(
            UserID::new(1),
            DEFAULT_TOKEN_DURATION,
            &EncodingKey::from_secret(b"someothersecret"),
        )
        .unwrap();

        let result = decode_token(&token, &DecodingKey::from_secret(SECRET));

        assert_eq!(result, Err(Error::InvalidToken));
    }

    #[test]
    fn garbage_is_invalid() {
        let result = decode_token("not.a.token", &DecodingKey::from_secret(SECRET));

        assert_eq!(result, Err(Error::InvalidToken));
    }
}
