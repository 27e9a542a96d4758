use chrono::{serde::ts_seconds, DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation};
use log::{debug, error};
use rocket::{
    http::{Cookie, SameSite, Status},
    outcome::{try_outcome, IntoOutcome},
    request::{FromRequest, Outcome},
    time::Duration,
    Request,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{common::AdminId, db::admin::Admin};
use crate::store::Store;

pub const AUTH_TOKEN_COOKIE: &str = "auth_token";

/// An authentication token proving the bearer is a specific admin.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthToken {
    #[serde(rename = "adm")]
    pub id: AdminId,
}

impl AuthToken {
    /// Create a new [`AuthToken`] for the given admin.
    pub fn new(admin: &Admin) -> Self {
        Self { id: admin.id }
    }

    /// Sign this token and wrap it in a cookie that expires with it.
    pub fn into_cookie(self, config: &Config) -> Result<Cookie<'static>> {
        let claims = Claims {
            token: self,
            expire_at: Utc::now() + config.auth_ttl(),
        };

        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret()),
        )?;

        Ok(Cookie::build(AUTH_TOKEN_COOKIE, token)
            .max_age(Duration::seconds(config.auth_ttl().num_seconds()))
            .http_only(true)
            .same_site(SameSite::Strict)
            .finish())
    }

    /// Verify and decode a token from a cookie.
    pub fn from_cookie(cookie: &Cookie<'static>, config: &Config) -> Result<Self> {
        let token = jsonwebtoken::decode(
            cookie.value(),
            &DecodingKey::from_secret(config.jwt_secret()),
            &Validation::default(),
        )
        .map(|claims: TokenData<Claims>| claims.claims.token)?;
        Ok(token)
    }
}

/// Cookie claims: the token itself plus an expiry datetime.
#[derive(Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    token: AuthToken,
    #[serde(rename = "exp", with = "ts_seconds")]
    expire_at: DateTime<Utc>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthToken {
    type Error = Error;

    /// Get an [`AuthToken`] from the cookie and check that its admin still exists.
    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let (config, store) = match (req.rocket().state::<Config>(), req.rocket().state::<Store>()) {
            (Some(config), Some(store)) => (config, store),
            _ => {
                error!("Authentication requested before the config and store are managed");
                return Outcome::Failure((
                    Status::InternalServerError,
                    Error::Status(Status::InternalServerError, "Server not ready".to_string()),
                ));
            }
        };

        // Forward to any routes that do not require an authentication token.
        let cookie = try_outcome!(req.cookies().get(AUTH_TOKEN_COOKIE).or_forward(()));

        // Decode the token.
        let token: Self = try_outcome!(Self::from_cookie(cookie, config).or_forward(()));

        // Check the admin actually exists.
        match store.admin_by_id(token.id).await {
            Ok(Some(_)) => Outcome::Success(token),
            Ok(None) => {
                debug!("Auth token names unknown admin {}", token.id);
                Outcome::Forward(())
            }
            Err(e) => Outcome::Failure((Status::InternalServerError, e)),
        }
    }
}
