//! Request extractors that reject malformed input with the fixed 400 body
//! before any handler (and so any remote call) runs.

use axum::extract::{FromRequest, FromRequestParts, Json, Path, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::ApiError;

/// Shape checks on a deserialized body. The reason is only logged.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

pub fn validate_email(email: &str) -> Result<(), String> {
    if email.len() > 254 || email.chars().any(char::is_whitespace) {
        return Err("email is malformed".into());
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err("email needs an @".into());
    };
    if local.is_empty() || domain.contains('@') {
        return Err("email is malformed".into());
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err("email domain is malformed".into());
    }
    Ok(())
}

pub fn require_non_empty(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    Ok(())
}

/// JSON body that deserialized and passed [`Validate`].
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            debug!(reason = %rejection.body_text(), "request body rejected");
            ApiError::Validation
        })?;
        value.validate().map_err(|reason| {
            debug!(%reason, "request body failed validation");
            ApiError::Validation
        })?;
        Ok(Self(value))
    }
}

/// Positive integer id from a single-segment path parameter.
pub struct IdPath(pub i32);

#[axum::async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i32>::from_request_parts(parts, state).await.map_err(|rejection| {
            debug!(reason = %rejection.body_text(), "path rejected");
            ApiError::Validation
        })?;
        if id < 1 {
            return Err(ApiError::Validation);
        }
        Ok(Self(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        for ok in ["a@x.com", "first.last@sub.example.org"] {
            assert!(validate_email(ok).is_ok(), "{ok}");
        }
        for bad in ["", "a", "@x.com", "a@", "a@x", "a@@x.com", "a b@x.com", "a@x.com."] {
            assert!(validate_email(bad).is_err(), "{bad}");
        }
    }
}
