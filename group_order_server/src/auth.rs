//! Access-token verification.
//!
//! Token issuance is the identity service's job; this server only verifies. A token is
//! `base64url(claims_json).base64url(hmac_sha256(secret, claims_json))`, carried in the `Authorization: Bearer`
//! header. The claims identify the acting user; every handler passes that principal explicitly into the engine.
use std::future::{ready, Ready};

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use chrono::Utc;
use group_order_engine::db_types::UserId;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub user_id: String,
    pub name: String,
    /// Expiry as a unix timestamp (seconds).
    pub exp: i64,
}

/// The verified principal for a request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub display_name: String,
}

impl From<TokenClaims> for AuthenticatedUser {
    fn from(claims: TokenClaims) -> Self {
        Self { user_id: UserId::from(claims.user_id), display_name: claims.name }
    }
}

/// Signs a set of claims into an access token. The server never calls this in production (issuance is external);
/// it exists for tooling and tests.
pub fn issue_token(claims: &TokenClaims, secret: &str) -> String {
    let payload = serde_json::to_vec(claims).expect("TokenClaims serialization is infallible");
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(&payload);
    let tag = mac.finalize().into_bytes();
    let payload_b64 = base64::encode_config(payload, base64::URL_SAFE_NO_PAD);
    let tag_b64 = base64::encode_config(tag, base64::URL_SAFE_NO_PAD);
    format!("{payload_b64}.{tag_b64}")
}

/// Verifies a token's HMAC and expiry, returning the embedded claims.
pub fn validate_token(token: &str, secret: &str) -> Result<TokenClaims, AuthError> {
    let (payload_b64, tag_b64) = token
        .split_once('.')
        .ok_or_else(|| AuthError::PoorlyFormattedToken("expected two dot-separated parts".to_string()))?;
    let payload = base64::decode_config(payload_b64, base64::URL_SAFE_NO_PAD)
        .map_err(|e| AuthError::PoorlyFormattedToken(e.to_string()))?;
    let tag = base64::decode_config(tag_b64, base64::URL_SAFE_NO_PAD)
        .map_err(|e| AuthError::PoorlyFormattedToken(e.to_string()))?;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(&payload);
    mac.verify_slice(&tag).map_err(|e| AuthError::ValidationError(e.to_string()))?;
    let claims: TokenClaims =
        serde_json::from_slice(&payload).map_err(|e| AuthError::PoorlyFormattedToken(e.to_string()))?;
    if claims.exp < Utc::now().timestamp() {
        return Err(AuthError::TokenExpired);
    }
    Ok(claims)
}

impl FromRequest for AuthenticatedUser {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_principal(req))
    }
}

fn extract_principal(req: &HttpRequest) -> Result<AuthenticatedUser, ServerError> {
    let config = req
        .app_data::<web::Data<AuthConfig>>()
        .ok_or_else(|| ServerError::InitializeError("AuthConfig is not registered with the app".to_string()))?;
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;
    let token = header.strip_prefix("Bearer ").ok_or(AuthError::MissingToken)?;
    let claims = validate_token(token, config.api_secret.reveal())?;
    Ok(AuthenticatedUser::from(claims))
}
