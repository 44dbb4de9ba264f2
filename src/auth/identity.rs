//! Bearer-token identity resolution for protected routes.
//!
//! A request starts unauthenticated. [`IdentityGate::authenticate`] either
//! resolves it to a stored [`User`] or rejects it; the [`Identity`] extractor
//! runs the gate and binds the user to the request's extensions.

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpMessage, HttpRequest};
use chrono::{DateTime, Utc};
use futures::future::LocalBoxFuture;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::token::TokenManager;
use crate::db::{User, UserStore};
use crate::error::{AppError, AuthError, IdentityRejection};
use crate::{AppState, Result};

pub struct IdentityGate {
    tokens: Arc<TokenManager>,
    store: Arc<dyn UserStore>,
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

impl IdentityGate {
    pub fn new(tokens: Arc<TokenManager>, store: Arc<dyn UserStore>) -> Self {
        Self { tokens, store }
    }

    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<User> {
        self.authenticate_at(authorization, Utc::now()).await
    }

    pub async fn authenticate_at(
        &self,
        authorization: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<User> {
        let header_value = authorization.ok_or(AuthError::MissingToken)?;
        let token = bearer_token(header_value).ok_or(AuthError::InvalidToken)?;
        let claims = self.tokens.verify_at(token, now)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        // Store failures propagate as-is; only a missing record is an auth failure.
        match self.store.find_by_id(user_id).await? {
            Some(user) => Ok(user),
            None => {
                warn!("Token for unknown user {}", user_id);
                Err(AuthError::UnknownIdentity.into())
            }
        }
    }
}

/// The authenticated user of the current request.
#[derive(Debug, Clone)]
pub struct Identity(pub User);

impl Identity {
    pub fn id(&self) -> Uuid {
        self.0.id
    }
}

impl FromRequest for Identity {
    type Error = IdentityRejection;
    type Future = LocalBoxFuture<'static, std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            if let Some(user) = req.extensions().get::<User>() {
                return Ok(Identity(user.clone()));
            }

            let state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::Internal("Application state not configured".into()))?
                .clone();
            let authorization = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok());

            let user = state.identity.authenticate(authorization).await.map_err(|e| {
                debug!("Rejected request to {}: {}", req.path(), e);
                IdentityRejection(e)
            })?;

            req.extensions_mut().insert(user.clone());
            Ok(Identity(user))
        })
    }
}
