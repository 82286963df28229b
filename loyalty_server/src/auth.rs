//! Access tokens.
//!
//! Users receive an HS256 JWT when they register or log in. It is sent back both in the `Authorization` header and as
//! the [`AUTH_COOKIE`] cookie, and requests may authenticate with either. Handlers that need a user simply take an
//! [`AuthenticatedUser`] argument.
use std::future::{ready, Ready};

use actix_web::{
    cookie::{Cookie, SameSite},
    dev::Payload,
    http::header::AUTHORIZATION,
    web,
    FromRequest,
    HttpRequest,
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use log::*;
use loyalty_engine::db_types::UserAccount;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// The user id
    pub sub: String,
    pub login: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: chrono::Duration,
    secure_cookie: bool,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TokenIssuer (lifetime: {})", self.lifetime)
    }
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.reveal().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            lifetime: config.token_lifetime,
            secure_cookie: config.secure_cookie,
        }
    }

    pub fn issue_token(&self, user: &UserAccount) -> Result<String, ServerError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user.id.to_string(),
            login: user.login.clone(),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ServerError::CouldNotSerializeAccessToken(e.to_string()))
    }

    /// Checks the signature and expiry of the token and returns its claims.
    pub fn validate(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| AuthError::ValidationError(e.to_string()))?;
        Ok(data.claims)
    }

    pub fn cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build(AUTH_COOKIE, token)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(self.secure_cookie)
            .finish()
    }
}

/// The user a request was made on behalf of. Extracting this fails with `401 Unauthorized` if the request carries no
/// valid access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub login: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, ServerError> {
    let issuer = req
        .app_data::<web::Data<TokenIssuer>>()
        .ok_or_else(|| ServerError::ConfigurationError("No token issuer has been configured".into()))?;
    let token = token_from_request(req).ok_or(AuthError::MissingToken)?;
    let claims = issuer.validate(&token).map_err(|e| {
        debug!("💻️ Rejected access token for {}. {e}", req.path());
        e
    })?;
    let user_id = claims
        .sub
        .parse::<i64>()
        .map_err(|e| AuthError::ValidationError(format!("Invalid subject in token. {e}")))?;
    trace!("💻️ Request to {} authenticated as user #{user_id}", req.path());
    Ok(AuthenticatedUser { user_id, login: claims.login })
}

/// A bearer token in the `Authorization` header takes precedence over the cookie.
fn token_from_request(req: &HttpRequest) -> Option<String> {
    let from_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim().to_string())
        .filter(|token| !token.is_empty());
    from_header.or_else(|| req.cookie(AUTH_COOKIE).map(|c| c.value().to_string()))
}
