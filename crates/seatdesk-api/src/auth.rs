//! JWT Authentication
//!
//! Bearer tokens carry `{sub, role, admin_id?, exp}`. A verified token becomes
//! the [`Actor`] every use case runs as.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use seatdesk_core::domain::value_objects::{ActorError, Role};
use seatdesk_core::{Actor, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_id: Option<Uuid>,
    pub exp: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("invalid account claims: {0}")]
    InvalidClaims(#[from] ActorError),
    #[error("token lifetime out of range")]
    Lifetime,
}

/// Token issuer and verifier sharing one HMAC secret
pub struct JwtAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtAuth {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    pub fn issue(&self, actor: &Actor, ttl_hours: i64) -> Result<String, AuthError> {
        let exp = chrono::Utc::now()
            .checked_add_signed(chrono::Duration::hours(ttl_hours))
            .ok_or(AuthError::Lifetime)?
            .timestamp();

        let admin_id = match actor.role() {
            Role::Admin => None,
            Role::Subadmin { parent } => Some(*parent.as_uuid()),
        };
        let claims = Claims {
            sub: *actor.id().as_uuid(),
            role: actor.role_name().to_string(),
            admin_id,
            exp: usize::try_from(exp).map_err(|_| AuthError::Lifetime)?,
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    pub fn verify(&self, token: &str) -> Result<Actor, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)?.claims;
        Ok(Actor::from_parts(
            UserId::from_uuid(claims.sub),
            &claims.role,
            claims.admin_id.map(UserId::from_uuid),
        )?)
    }
}

/// The authenticated caller of a request
pub struct AuthActor(pub Actor);

#[async_trait]
impl FromRequestParts<AppState> for AuthActor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(AuthError::MissingToken)?;

        let actor = state.auth.verify(token.trim()).map_err(|e| {
            tracing::debug!(error = %e, "rejected bearer token");
            e
        })?;
        Ok(AuthActor(actor))
    }
}
