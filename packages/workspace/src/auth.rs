//! Bearer-token authentication.
//!
//! Tokens map to user ids through a static table loaded from config.
//! Handlers take [`CurrentUser`] when a caller must be signed in and
//! [`MaybeUser`] when anonymous access is allowed.

use crate::error::ApiError;
use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct TokenAuth {
    tokens: Arc<HashMap<String, String>>,
}

impl TokenAuth {
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self {
            tokens: Arc::new(tokens),
        }
    }

    /// User id for a raw `Authorization` header value.
    pub fn authenticate(&self, header: &str) -> Option<&str> {
        let token = header.strip_prefix("Bearer ")?.trim();
        if token.is_empty() {
            return None;
        }
        self.tokens.get(token).map(String::as_str)
    }

    fn user_from(&self, parts: &Parts) -> Result<Option<String>, ApiError> {
        let Some(value) = parts.headers.get(AUTHORIZATION) else {
            return Ok(None);
        };
        let header = value.to_str().map_err(|_| ApiError::Unauthorized)?;
        self.authenticate(header)
            .map(|user| Some(user.to_string()))
            .ok_or(ApiError::Unauthorized)
    }
}

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub String);

/// A caller who may be anonymous. A bad token is still rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaybeUser(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    TokenAuth: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = TokenAuth::from_ref(state);
        auth.user_from(parts)?.map(CurrentUser).ok_or(ApiError::Unauthorized)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    TokenAuth: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = TokenAuth::from_ref(state);
        Ok(MaybeUser(auth.user_from(parts)?))
    }
}
