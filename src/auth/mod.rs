/// 인증 / 인가
/// 1. Bearer 토큰 검증 후 저장소의 사용자로 해석
/// 2. 소유자 또는 관리자 권한 확인
// region:    --- Imports
use crate::error::AppError;
use crate::store::MarketStore;
use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

// endregion: --- Imports

// region:    --- Tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

/// HS256 서명/검증 키
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_hours: i64,
}

impl TokenKeys {
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
        }
    }

    /// 토큰 발급
    /// 가입/로그인은 별도 서비스의 몫이며, 같은 비밀키를 공유하는 쪽에서 사용한다.
    pub fn issue(&self, user_id: i64) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp() as usize,
            exp: (now + Duration::hours(self.expiry_hours)).timestamp() as usize,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    /// 토큰 검증 후 사용자 id 반환
    pub fn verify(&self, token: &str) -> Result<i64, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|e| {
                warn!("{:<12} --> 토큰 검증 실패: {}", "Auth", e);
                AppError::Unauthorized
            })?;
        data.claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::Unauthorized)
    }
}

// endregion: --- Tokens

// region:    --- Auth User
/// 인증된 요청자
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub admin: bool,
}

impl AuthUser {
    pub fn can_modify(&self, owner_id: i64) -> bool {
        self.admin || self.id == owner_id
    }

    /// 소유자나 관리자가 아니면 Forbidden
    pub fn ensure_can_modify(&self, owner_id: i64, message: &str) -> Result<(), AppError> {
        if self.can_modify(owner_id) {
            Ok(())
        } else {
            warn!(
                "{:<12} --> 권한 없음: user={}, owner={}",
                "Auth", self.id, owner_id
            );
            Err(AppError::Forbidden(message.to_string()))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<dyn MarketStore>: FromRef<S>,
    TokenKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized)?;

        let user_id = <TokenKeys as FromRef<S>>::from_ref(state).verify(token.trim())?;

        let store = <Arc<dyn MarketStore> as FromRef<S>>::from_ref(state);
        let user = store
            .find_user(user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(AuthUser {
            id: user.id,
            admin: user.admin,
        })
    }
}

// endregion: --- Auth User

// endregion: --- Tests
