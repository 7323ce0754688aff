//! HS256 JWT implementation of the `IdentityVerifier` trait.

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};

use crate::domain::{GenderTag, Identity, IdentityError, IdentityVerifier, UserId};

/// Default lifetime of issued tokens
pub fn default_token_ttl() -> TimeDelta {
    TimeDelta::days(7)
}

/// Claims carried by a session credential
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    user_id: u64,
    gender: String,
    exp: i64,
}

/// Verifies (and issues) tokens signed with a shared secret
pub struct JwtIdentityVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtIdentityVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a token for `user_id` that expires after `ttl`.
    pub fn sign(
        &self,
        user_id: UserId,
        gender: GenderTag,
        ttl: TimeDelta,
    ) -> Result<String, IdentityError> {
        let claims = Claims {
            user_id: user_id.value(),
            gender: gender.as_str().to_string(),
            exp: (Utc::now() + ttl).timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| IdentityError::InvalidClaims(e.to_string()))
    }
}

#[async_trait]
impl IdentityVerifier for JwtIdentityVerifier {
    async fn verify(&self, credential: &str) -> Result<Identity, IdentityError> {
        let token_data =
            jsonwebtoken::decode::<Claims>(credential, &self.decoding, &self.validation).map_err(
                |e| {
                    tracing::debug!(?e, "credential validation failed");
                    match e.kind() {
                        ErrorKind::ExpiredSignature => IdentityError::Expired,
                        _ => IdentityError::InvalidCredential(e.to_string()),
                    }
                },
            )?;

        let claims = token_data.claims;
        let gender = GenderTag::try_from(claims.gender.as_str())
            .map_err(|e| IdentityError::InvalidClaims(e.to_string()))?;
        Ok(Identity::new(UserId::new(claims.user_id), gender))
    }
}
