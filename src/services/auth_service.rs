use crate::entities::user_entity as users;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::member_service::insert_account;
use crate::utils::*;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};
use std::sync::Arc;
use uuid::Uuid;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct AuthService {
    pool: Arc<DatabaseConnection>,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(pool: impl Into<Arc<DatabaseConnection>>, jwt_service: JwtService) -> Self {
        Self {
            pool: pool.into(),
            jwt_service,
        }
    }

    /// 会员自助注册，注册成功后直接登录
    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        let user = insert_account(self.pool.as_ref(), request.into()).await?;
        self.issue_tokens(user).await
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let email = normalize_email(&request.email);

        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::AuthError(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::AuthError(INVALID_CREDENTIALS.to_string()));
        }

        if !user.is_active {
            return Err(AppError::Forbidden("Account is inactive".to_string()));
        }

        log::info!("User {} logged in", user.id);
        self.issue_tokens(user).await
    }

    /// 刷新令牌轮换：只接受当前保存的那一个
    pub async fn refresh_token(&self, request: RefreshTokenRequest) -> AppResult<TokenResponse> {
        let token = request.refresh_token.trim();
        let claims = self.jwt_service.verify_refresh_token(token)?;

        let user = users::Entity::find_by_id(claims.sub)
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::AuthError("User no longer exists".to_string()))?;

        if !user.is_active {
            return Err(AppError::Forbidden("Account is inactive".to_string()));
        }

        if user.refresh_token.as_deref() != Some(token) {
            log::warn!("Rejected stale refresh token for user {}", user.id);
            return Err(AppError::AuthError(
                "Refresh token has been revoked".to_string(),
            ));
        }

        let auth = self.issue_tokens(user).await?;
        Ok(TokenResponse {
            access_token: auth.access_token,
            refresh_token: auth.refresh_token,
            expires_in: auth.expires_in,
        })
    }

    pub async fn logout(&self, user_id: Uuid) -> AppResult<()> {
        let user = users::Entity::find_by_id(user_id)
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let mut model = user.into_active_model();
        model.refresh_token = Set(None);
        model.update(self.pool.as_ref()).await?;

        log::info!("User {user_id} logged out");
        Ok(())
    }

    async fn issue_tokens(&self, user: users::Model) -> AppResult<AuthResponse> {
        let pair = self.jwt_service.generate_pair(user.id, user.role)?;

        let mut model = user.into_active_model();
        model.refresh_token = Set(Some(pair.refresh_token.clone()));
        let user = model.update(self.pool.as_ref()).await?;

        Ok(AuthResponse {
            user: UserResponse::from(user),
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }
}
