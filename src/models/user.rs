use crate::entities::{Role, gym_package_entity as packages, user_entity as users};
use crate::models::PackageResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub package_id: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<users::Model> for UserResponse {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            phone_number: user.phone_number,
            address: user.address,
            package_id: user.package_id,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Member together with the package it references.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub package: Option<PackageResponse>,
}

impl From<(users::Model, Option<packages::Model>)> for MemberResponse {
    fn from((user, package): (users::Model, Option<packages::Model>)) -> Self {
        Self {
            user: UserResponse::from(user),
            package: package.map(PackageResponse::from),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "Member Contoh")]
    pub name: String,
    #[schema(example = "member@gym.com")]
    pub email: String,
    #[schema(example = "securepassword")]
    pub password: String,
    #[schema(example = "08123456789")]
    pub phone_number: Option<String>,
    pub address: Option<String>,
    #[schema(example = 1)]
    pub package_id: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "admin@gym.com")]
    pub email: String,
    #[schema(example = "securepassword")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Replaces the member's profile; `isActive` is kept when omitted.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    pub name: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub package_id: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStaffRequest {
    #[schema(example = "Staff Resepsionis")]
    pub name: String,
    #[schema(example = "staff@gym.com")]
    pub email: String,
    pub password: String,
    /// Defaults to `staff`.
    pub role: Option<Role>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStaffRequest {
    pub name: String,
    pub email: String,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberQuery {
    /// Case-insensitive match on name or email.
    pub search: Option<String>,
    /// `active` or `inactive`.
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user() -> users::Model {
        let now = Utc::now();
        users::Model {
            id: Uuid::new_v4(),
            name: "Member Contoh".into(),
            email: "member@gym.com".into(),
            password_hash: "hash".into(),
            role: Role::Member,
            phone_number: Some("08123456789".into()),
            address: None,
            package_id: Some(1),
            is_active: true,
            refresh_token: Some("token".into()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_user_response_hides_secrets() {
        let value = serde_json::to_value(UserResponse::from(user())).unwrap();
        assert!(value.get("passwordHash").is_none());
        assert!(value.get("refreshToken").is_none());
        assert_eq!(value["phoneNumber"], "08123456789");
        assert_eq!(value["packageId"], 1);
        assert_eq!(value["isActive"], true);
        assert_eq!(value["role"], "member");
    }

    #[test]
    fn test_member_response_flattens_user() {
        let value = serde_json::to_value(MemberResponse::from((user(), None))).unwrap();
        assert_eq!(value["email"], "member@gym.com");
        assert!(value["package"].is_null());
    }

    #[test]
    fn test_register_request_uses_camel_case() {
        let req: RegisterRequest = serde_json::from_value(json!({
            "name": "Member Contoh",
            "email": "member@gym.com",
            "password": "securepassword",
            "phoneNumber": "08123456789",
            "packageId": 2
        }))
        .unwrap();
        assert_eq!(req.phone_number.as_deref(), Some("08123456789"));
        assert_eq!(req.package_id, Some(2));
        assert!(req.address.is_none());
    }

    #[test]
    fn test_create_staff_rejects_unknown_role() {
        let res = serde_json::from_value::<CreateStaffRequest>(json!({
            "name": "X",
            "email": "x@gym.com",
            "password": "secret",
            "role": "owner"
        }));
        assert!(res.is_err());
    }
}
