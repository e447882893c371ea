use crate::auth::claims::{Claims, TokenKind};
use crate::config::JwtConfig;
use crate::state::AppState;
use axum::{async_trait, extract::{FromRef, FromRequestParts}, http::{request::Parts, StatusCode}};
use jsonwebtoken::{decode, DecodingKey, Validation};
use tracing::{debug, warn};

/// Verification side of the provider's HS256 tokens.
#[derive(Clone)]
pub struct JwtKeys {
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            issuer,
            audience,
            ..
        } = &state.config.jwt;
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.clone(),
            audience: audience.clone(),
        }
    }
}

impl JwtKeys {
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, kind = ?data.claims.kind, "jwt verified");
        Ok(data.claims)
    }
}

/// Issues a token the way the auth provider does. Only tests mint tokens here.
#[cfg(test)]
pub fn sign(config: &JwtConfig, user_id: uuid::Uuid, kind: TokenKind) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use time::{Duration, OffsetDateTime};

    let now = OffsetDateTime::now_utc();
    let exp = now + Duration::minutes(config.ttl_minutes.max(0));
    let claims = Claims {
        sub: user_id,
        iat: now.unix_timestamp() as usize,
        exp: exp.unix_timestamp() as usize,
        iss: config.issuer.clone(),
        aud: config.audience.clone(),
        kind,
    };
    let key = EncodingKey::from_secret(config.secret.as_bytes());
    Ok(encode(&Header::default(), &claims, &key)?)
}

#[cfg(test)]
pub fn sign_access(config: &JwtConfig, user_id: uuid::Uuid) -> anyhow::Result<String> {
    sign(config, user_id, TokenKind::Access)
}

/// Extracts and validates the bearer access token, returning the user ID.
pub struct AuthUser(pub uuid::Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or((
                StatusCode::UNAUTHORIZED,
                "Missing Authorization header".to_string(),
            ))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or((
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header".to_string(),
            ))?;

        let claims = match keys.verify(token) {
            Ok(c) => c,
            Err(_) => {
                warn!("invalid or expired token");
                return Err((
                    StatusCode::UNAUTHORIZED,
                    "Invalid or expired token".to_string(),
                ));
            }
        };

        if claims.kind != TokenKind::Access {
            return Err((
                StatusCode::UNAUTHORIZED,
                "Access token required".to_string(),
            ));
        }

        Ok(AuthUser(claims.sub))
    }
}

#[cfg(test)]
mod jwt_tests {
    use super::*;
    use axum::http::Request;
    use uuid::Uuid;

    fn config() -> JwtConfig {
        AppState::fake().config.jwt.clone()
    }

    fn make_keys() -> JwtKeys {
        JwtKeys::from_ref(&AppState::fake())
    }

    async fn extract(header: Option<String>) -> Result<AuthUser, (StatusCode, String)> {
        let mut builder = Request::builder().uri("/dashboard");
        if let Some(h) = header {
            builder = builder.header(axum::http::header::AUTHORIZATION, h);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        let state = AppState::fake();
        AuthUser::from_request_parts(&mut parts, &state).await
    }

    #[test]
    fn sign_and_verify_access_token() {
        let keys = make_keys();
        let user_id = Uuid::new_v4();
        let token = sign_access(&config(), user_id).expect("sign access");
        let claims = keys.verify(&token).expect("verify token");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "test");
        assert_eq!(claims.aud, "test");
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[test]
    fn verify_rejects_foreign_audience() {
        let mut other = make_keys();
        other.audience = "someone-else".into();
        let token = sign_access(&config(), Uuid::new_v4()).expect("sign access");
        assert!(other.verify(&token).is_err());
    }

    #[tokio::test]
    async fn extractor_accepts_access_tokens_only() {
        let user_id = Uuid::new_v4();

        let access = sign_access(&config(), user_id).unwrap();
        let AuthUser(id) = extract(Some(format!("Bearer {access}"))).await.unwrap();
        assert_eq!(id, user_id);

        let refresh = sign(&config(), user_id, TokenKind::Refresh).unwrap();
        let (status, msg) = extract(Some(format!("Bearer {refresh}"))).await.err().unwrap();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(msg, "Access token required");

        let (status, _) = extract(None).await.err().unwrap();
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (_, msg) = extract(Some(format!("Basic {access}"))).await.err().unwrap();
        assert_eq!(msg, "Invalid Authorization header");
    }
}
