//! Custom axum extractors for Lingodesk

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::Error;

/// JSON extractor that validates the deserialized value automatically.
///
/// Malformed bodies and failed validation both reject with
/// [`Error::Validation`] (400).
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| Error::Validation(e.body_text()))?;
        value
            .validate()
            .map_err(|e| Error::Validation(format!("Validation failed: {}", e)))?;
        Ok(ValidatedJson(value))
    }
}
