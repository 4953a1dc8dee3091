use crate::entities::{Role, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::member_service::{NewAccount, ensure_email_available, insert_account};
use crate::utils::*;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

fn ensure_staff_role(role: Role) -> AppResult<Role> {
    if !role.is_staff_or_admin() {
        return Err(AppError::ValidationError(format!(
            "Role must be staff or admin, got {role}"
        )));
    }
    Ok(role)
}

#[derive(Clone)]
pub struct StaffService {
    pool: Arc<DatabaseConnection>,
}

impl StaffService {
    pub fn new(pool: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { pool: pool.into() }
    }

    pub async fn get_staffs(&self) -> AppResult<Vec<UserResponse>> {
        let staffs = users::Entity::find()
            .filter(users::Column::Role.is_in([Role::Staff, Role::Admin]))
            .order_by_desc(users::Column::CreatedAt)
            .all(self.pool.as_ref())
            .await?;

        Ok(staffs.into_iter().map(UserResponse::from).collect())
    }

    pub async fn create_staff(&self, request: CreateStaffRequest) -> AppResult<UserResponse> {
        let role = ensure_staff_role(request.role.unwrap_or(Role::Staff))?;

        let user = insert_account(
            self.pool.as_ref(),
            NewAccount {
                name: request.name,
                email: request.email,
                password: request.password,
                role,
                phone_number: None,
                address: None,
                package_id: None,
            },
        )
        .await?;

        Ok(UserResponse::from(user))
    }

    async fn find_staff(&self, id: Uuid) -> AppResult<users::Model> {
        users::Entity::find_by_id(id)
            .one(self.pool.as_ref())
            .await?
            .filter(|u| u.role.is_staff_or_admin())
            .ok_or_else(|| AppError::NotFound("Staff not found".to_string()))
    }

    pub async fn update_staff(
        &self,
        id: Uuid,
        request: UpdateStaffRequest,
    ) -> AppResult<UserResponse> {
        let name = request.name.trim().to_string();
        validate_required("name", &name, 255)?;
        let email = normalize_email(&request.email);
        validate_email(&email)?;
        let role = request.role.map(ensure_staff_role).transpose()?;

        let staff = self.find_staff(id).await?;
        if staff.email != email {
            ensure_email_available(self.pool.as_ref(), &email, Some(id)).await?;
        }

        let mut model = staff.into_active_model();
        model.name = Set(name);
        model.email = Set(email);
        if let Some(role) = role {
            model.role = Set(role);
        }
        if let Some(active) = request.is_active {
            model.is_active = Set(active);
            if !active {
                model.refresh_token = Set(None);
            }
        }
        let updated = model.update(self.pool.as_ref()).await?;

        Ok(UserResponse::from(updated))
    }

    /// 管理员不能删除自己的账号
    pub async fn delete_staff(&self, id: Uuid, acting_user_id: Uuid) -> AppResult<()> {
        if id == acting_user_id {
            return Err(AppError::Forbidden(
                "You cannot delete your own account".to_string(),
            ));
        }

        let staff = self.find_staff(id).await?;
        users::Entity::delete_by_id(staff.id).exec(self.pool.as_ref()).await?;
        log::info!("Staff {id} deleted by {acting_user_id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;
    use sea_orm::Value;

    #[tokio::test]
    async fn test_get_staffs() {
        let db = fixtures::mock()
            .append_query_results(vec![vec![
                fixtures::user(Role::Admin, "admin@gym.com"),
                fixtures::user(Role::Staff, "staff@gym.com"),
            ]])
            .into_connection();
        let service = StaffService::new(db);

        let staffs = service.get_staffs().await.unwrap();
        assert_eq!(staffs.len(), 2);
        assert!(staffs.iter().all(|s| s.role.is_staff_or_admin()));
    }

    #[tokio::test]
    async fn test_create_staff_rejects_member_role() {
        let service = StaffService::new(fixtures::empty_db());
        let err = service
            .create_staff(CreateStaffRequest {
                name: "Someone".into(),
                email: "someone@gym.com".into(),
                password: "securepassword".into(),
                role: Some(Role::Member),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_update_staff_checks_new_email() {
        let staff = fixtures::user(Role::Staff, "staff@gym.com");
        let taken = fixtures::user(Role::Member, "member@gym.com");
        let db = fixtures::mock()
            .append_query_results(vec![vec![staff.clone()]])
            .append_query_results(vec![vec![taken]])
            .into_connection();
        let service = StaffService::new(db);

        let err = service
            .update_staff(
                staff.id,
                UpdateStaffRequest {
                    name: "Staff".into(),
                    email: "member@gym.com".into(),
                    role: None,
                    is_active: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_staff_promotes_to_admin() {
        let staff = fixtures::user(Role::Staff, "staff@gym.com");
        let mut promoted = staff.clone();
        promoted.role = Role::Admin;
        let db = fixtures::mock()
            .append_query_results(vec![vec![staff.clone()]])
            .append_query_results(vec![vec![promoted]])
            .into_connection();
        let service = StaffService::new(db);

        let resp = service
            .update_staff(
                staff.id,
                UpdateStaffRequest {
                    name: "Staff".into(),
                    email: "staff@gym.com".into(),
                    role: Some(Role::Admin),
                    is_active: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(resp.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_update_staff_deactivation_revokes_token() {
        let mut staff = fixtures::user(Role::Staff, "staff@gym.com");
        staff.refresh_token = Some("still-valid".into());
        let mut deactivated = staff.clone();
        deactivated.is_active = false;
        deactivated.refresh_token = None;
        let db = fixtures::mock()
            .append_query_results(vec![vec![staff.clone()]])
            .append_query_results(vec![vec![deactivated]])
            .into_connection();
        let service = StaffService::new(db);

        let resp = service
            .update_staff(
                staff.id,
                UpdateStaffRequest {
                    name: "Staff".into(),
                    email: "staff@gym.com".into(),
                    role: None,
                    is_active: Some(false),
                },
            )
            .await
            .unwrap();
        assert!(!resp.is_active);

        // UPDATE 语句必须同时写回 refresh_token = NULL
        let log = Arc::try_unwrap(service.pool)
            .ok()
            .unwrap()
            .into_transaction_log();
        let update = &log[1].statements()[0];
        assert!(update.sql.starts_with("UPDATE"));
        assert!(update.sql.contains(r#""refresh_token" = $"#));
        let values = &update.values.as_ref().unwrap().0;
        assert!(values.contains(&Value::String(None)));
    }

    #[tokio::test]
    async fn test_update_staff_ignores_members() {
        let member = fixtures::user(Role::Member, "member@gym.com");
        let db = fixtures::mock()
            .append_query_results(vec![vec![member.clone()]])
            .into_connection();
        let service = StaffService::new(db);

        let err = service
            .update_staff(
                member.id,
                UpdateStaffRequest {
                    name: "Member".into(),
                    email: "member@gym.com".into(),
                    role: None,
                    is_active: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_admin_cannot_delete_self() {
        let service = StaffService::new(fixtures::empty_db());
        let id = Uuid::new_v4();
        let err = service.delete_staff(id, id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_delete_staff() {
        let staff = fixtures::user(Role::Staff, "staff@gym.com");
        let db = fixtures::mock()
            .append_query_results(vec![vec![staff.clone()]])
            .append_exec_results(vec![fixtures::exec_ok(1)])
            .into_connection();
        let service = StaffService::new(db);

        assert!(service.delete_staff(staff.id, Uuid::new_v4()).await.is_ok());
    }
}
