//! JWT validation, issuance and token extraction helpers

use axum::http::HeaderValue;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::claims::AccessClaims;
use crate::config::AuthConfig;
use crate::error::AuthError;

/// Validate an HS256 access token
pub(crate) fn validate_access_token(
    token: &str,
    config: &AuthConfig,
) -> Result<AccessClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);

    if let Some(aud) = &config.audience {
        validation.set_audience(&[aud]);
    } else {
        validation.validate_aud = false;
    }

    if let Some(iss) = &config.issuer {
        validation.set_issuer(&[iss]);
    }

    let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_ref());

    let token_data = decode::<AccessClaims>(token, &decoding_key, &validation).map_err(|e| {
        tracing::debug!(error = %e, "JWT validation failed");
        AuthError::InvalidToken
    })?;

    Ok(token_data.claims)
}

/// Sign an access token for `user_id` valid for `ttl_secs`
///
/// Audience and issuer are taken from `config` so the token passes
/// [`validate_access_token`] under the same configuration.
pub fn issue_access_token(
    user_id: Uuid,
    email: Option<&str>,
    config: &AuthConfig,
    ttl_secs: u64,
) -> Result<String, AuthError> {
    let now = chrono::Utc::now().timestamp().max(0) as u64;
    let claims = AccessClaims {
        sub: user_id.to_string(),
        email: email.map(String::from),
        iat: now,
        exp: now + ttl_secs,
        aud: config.audience.clone(),
        iss: config.issuer.clone(),
    };

    let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_ref());
    encode(&Header::new(Algorithm::HS256), &claims, &encoding_key).map_err(|e| {
        tracing::error!(error = %e, user_id = %user_id, "Failed to sign access token");
        AuthError::TokenIssueFailed
    })
}

/// Extract bearer token from Authorization header
pub(crate) fn extract_bearer_token(header: &HeaderValue) -> Result<String, AuthError> {
    let header_str = header
        .to_str()
        .map_err(|_| AuthError::InvalidAuthorizationFormat)?;

    match header_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(AuthError::InvalidAuthorizationFormat),
    }
}
