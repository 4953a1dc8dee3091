use crate::entities::Role;
use crate::error::{AppError, AppResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ACCESS: &str = "access";
const REFRESH: &str = "refresh";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // user_id
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
    pub jti: Uuid,
    pub token_type: String, // "access" or "refresh"
}

#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct JwtService {
    access_encoding_key: EncodingKey,
    access_decoding_key: DecodingKey,
    refresh_encoding_key: EncodingKey,
    refresh_decoding_key: DecodingKey,
    access_token_expires_in: i64,
    refresh_token_expires_in: i64,
}

impl JwtService {
    pub fn new(
        secret: &str,
        refresh_secret: Option<&str>,
        access_expires_in: i64,
        refresh_expires_in: i64,
    ) -> Self {
        let refresh_secret = refresh_secret.unwrap_or(secret);
        Self {
            access_encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            access_decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            refresh_encoding_key: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding_key: DecodingKey::from_secret(refresh_secret.as_bytes()),
            access_token_expires_in: access_expires_in,
            refresh_token_expires_in: refresh_expires_in,
        }
    }

    fn claims(user_id: Uuid, role: Role, token_type: &str, expires_in: i64) -> Claims {
        let now = Utc::now();
        let exp = now + Duration::seconds(expires_in);
        Claims {
            sub: user_id,
            role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4(),
            token_type: token_type.to_string(),
        }
    }

    pub fn generate_access_token(&self, user_id: Uuid, role: Role) -> AppResult<String> {
        let claims = Self::claims(user_id, role, ACCESS, self.access_token_expires_in);
        Ok(encode(&Header::default(), &claims, &self.access_encoding_key)?)
    }

    pub fn generate_refresh_token(&self, user_id: Uuid, role: Role) -> AppResult<String> {
        let claims = Self::claims(user_id, role, REFRESH, self.refresh_token_expires_in);
        Ok(encode(&Header::default(), &claims, &self.refresh_encoding_key)?)
    }

    pub fn generate_pair(&self, user_id: Uuid, role: Role) -> AppResult<TokenPair> {
        Ok(TokenPair {
            access_token: self.generate_access_token(user_id, role)?,
            refresh_token: self.generate_refresh_token(user_id, role)?,
        })
    }

    fn verify_token(&self, token: &str, key: &DecodingKey, expected_type: &str) -> AppResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        let claims = decode::<Claims>(token.trim(), key, &validation)?.claims;

        if claims.token_type != expected_type {
            return Err(AppError::AuthError(format!(
                "Invalid {expected_type} token type"
            )));
        }

        Ok(claims)
    }

    pub fn verify_access_token(&self, token: &str) -> AppResult<Claims> {
        self.verify_token(token, &self.access_decoding_key, ACCESS)
    }

    pub fn verify_refresh_token(&self, token: &str) -> AppResult<Claims> {
        self.verify_token(token, &self.refresh_decoding_key, REFRESH)
    }

    pub fn get_access_token_expires_in(&self) -> i64 {
        self.access_token_expires_in
    }
}
