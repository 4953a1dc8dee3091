use crate::entities::{Role, gym_package_entity as packages, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::*;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// Fields shared by self-registration, front-desk member creation and staff creation.
pub(crate) struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub package_id: Option<i32>,
}

impl From<RegisterRequest> for NewAccount {
    fn from(req: RegisterRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
            role: Role::Member,
            phone_number: req.phone_number,
            address: req.address,
            package_id: req.package_id,
        }
    }
}

pub(crate) async fn ensure_email_available<C: ConnectionTrait>(
    db: &C,
    email: &str,
    exclude_id: Option<Uuid>,
) -> AppResult<()> {
    let mut query = users::Entity::find().filter(users::Column::Email.eq(email));
    if let Some(id) = exclude_id {
        query = query.filter(users::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(AppError::Conflict("Email is already registered".to_string()));
    }
    Ok(())
}

pub(crate) async fn ensure_package_exists<C: ConnectionTrait>(
    db: &C,
    package_id: Option<i32>,
) -> AppResult<()> {
    if let Some(id) = package_id {
        if packages::Entity::find_by_id(id).one(db).await?.is_none() {
            return Err(AppError::ValidationError(format!(
                "Package {id} does not exist"
            )));
        }
    }
    Ok(())
}

fn validate_phone(phone: Option<String>) -> AppResult<Option<String>> {
    let phone = non_empty(phone);
    if let Some(p) = &phone {
        validate_phone_number(p)?;
    }
    Ok(phone)
}

/// 校验并写入一个新账号，返回落库后的记录
pub(crate) async fn insert_account<C: ConnectionTrait>(
    db: &C,
    account: NewAccount,
) -> AppResult<users::Model> {
    let name = account.name.trim().to_string();
    validate_required("name", &name, 255)?;
    let email = normalize_email(&account.email);
    validate_email(&email)?;
    validate_password(&account.password)?;
    let phone_number = validate_phone(account.phone_number)?;

    ensure_email_available(db, &email, None).await?;
    ensure_package_exists(db, account.package_id).await?;

    let user = users::ActiveModel {
        name: Set(name),
        email: Set(email),
        password_hash: Set(hash_password(&account.password)?),
        role: Set(account.role),
        phone_number: Set(phone_number),
        address: Set(non_empty(account.address)),
        package_id: Set(account.package_id),
        ..Default::default()
    }
    .insert(db)
    .await?;

    log::info!("Created {} account {}", user.role, user.id);
    Ok(user)
}

fn parse_status(status: Option<String>) -> AppResult<Option<bool>> {
    match non_empty(status).as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => Ok(None),
        Some("active") => Ok(Some(true)),
        Some("inactive") => Ok(Some(false)),
        Some(other) => Err(AppError::ValidationError(format!(
            "Invalid status '{other}', expected active or inactive"
        ))),
    }
}

#[derive(Clone)]
pub struct MemberService {
    pool: Arc<DatabaseConnection>,
}

impl MemberService {
    pub fn new(pool: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { pool: pool.into() }
    }

    /// 会员列表，支持按姓名/邮箱模糊搜索和状态筛选
    pub async fn get_members(&self, query: MemberQuery) -> AppResult<Vec<MemberResponse>> {
        let status = parse_status(query.status)?;

        let mut select = users::Entity::find().filter(users::Column::Role.eq(Role::Member));

        if let Some(search) = non_empty(query.search) {
            let pattern = format!("%{}%", search.trim().to_lowercase());
            select = select.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col((users::Entity, users::Column::Name))))
                            .like(pattern.clone()),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col((users::Entity, users::Column::Email))))
                            .like(pattern),
                    ),
            );
        }
        if let Some(active) = status {
            select = select.filter(users::Column::IsActive.eq(active));
        }

        let rows = select
            .order_by_desc(users::Column::CreatedAt)
            .find_also_related(packages::Entity)
            .all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(MemberResponse::from).collect())
    }

    pub async fn create_member(&self, request: RegisterRequest) -> AppResult<UserResponse> {
        let user = insert_account(self.pool.as_ref(), request.into()).await?;
        Ok(UserResponse::from(user))
    }

    async fn find_member(&self, id: Uuid) -> AppResult<users::Model> {
        users::Entity::find_by_id(id)
            .filter(users::Column::Role.eq(Role::Member))
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))
    }

    pub async fn update_member(
        &self,
        id: Uuid,
        request: UpdateMemberRequest,
    ) -> AppResult<UserResponse> {
        let name = request.name.trim().to_string();
        validate_required("name", &name, 255)?;
        let phone_number = validate_phone(request.phone_number)?;

        let member = self.find_member(id).await?;
        ensure_package_exists(self.pool.as_ref(), request.package_id).await?;

        let mut model = member.into_active_model();
        model.name = Set(name);
        model.phone_number = Set(phone_number);
        model.address = Set(non_empty(request.address));
        model.package_id = Set(request.package_id);
        if let Some(active) = request.is_active {
            model.is_active = Set(active);
            if !active {
                // 停用后旧的刷新令牌不再可用
                model.refresh_token = Set(None);
            }
        }
        let updated = model.update(self.pool.as_ref()).await?;

        Ok(UserResponse::from(updated))
    }

    pub async fn delete_member(&self, id: Uuid) -> AppResult<()> {
        let member = self.find_member(id).await?;
        users::Entity::delete_by_id(member.id).exec(self.pool.as_ref()).await?;
        log::info!("Deleted member {id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status(None).unwrap(), None);
        assert_eq!(parse_status(Some("  ".into())).unwrap(), None);
        assert_eq!(parse_status(Some("active".into())).unwrap(), Some(true));
        assert_eq!(parse_status(Some("Inactive".into())).unwrap(), Some(false));
        assert!(matches!(
            parse_status(Some("banned".into())),
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_create_member_rejects_duplicate_email() {
        let existing = fixtures::user(Role::Member, "member@gym.com");
        let db = fixtures::mock()
            .append_query_results(vec![vec![existing]])
            .into_connection();
        let service = MemberService::new(db);

        let err = service
            .create_member(RegisterRequest {
                name: "Another".into(),
                email: "Member@Gym.com ".into(),
                password: "securepassword".into(),
                phone_number: None,
                address: None,
                package_id: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_member_rejects_unknown_package() {
        let db = fixtures::mock()
            .append_query_results(vec![Vec::<users::Model>::new()])
            .append_query_results(vec![Vec::<packages::Model>::new()])
            .into_connection();
        let service = MemberService::new(db);

        let err = service
            .create_member(RegisterRequest {
                name: "Member".into(),
                email: "new@gym.com".into(),
                password: "securepassword".into(),
                phone_number: Some("08123456789".into()),
                address: None,
                package_id: Some(99),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_create_member_validates_before_querying() {
        let service = MemberService::new(fixtures::empty_db());
        let err = service
            .create_member(RegisterRequest {
                name: "Member".into(),
                email: "not-an-email".into(),
                password: "securepassword".into(),
                phone_number: None,
                address: None,
                package_id: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_get_members_returns_package() {
        let mut member = fixtures::user(Role::Member, "member@gym.com");
        member.package_id = Some(1);
        let package = fixtures::package(1, "Bulanan", 300_000);
        let db = fixtures::mock()
            .append_query_results(vec![vec![(member.clone(), package)]])
            .into_connection();
        let service = MemberService::new(db);

        let members = service
            .get_members(MemberQuery {
                search: Some("Contoh".into()),
                status: Some("active".into()),
            })
            .await
            .unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user.id, member.id);
        assert_eq!(members[0].package.as_ref().map(|p| p.price), Some(300_000));
    }

    #[tokio::test]
    async fn test_update_member_deactivates() {
        let member = fixtures::user(Role::Member, "member@gym.com");
        let mut updated = member.clone();
        updated.name = "Renamed".into();
        updated.is_active = false;
        let db = fixtures::mock()
            .append_query_results(vec![vec![member.clone()]])
            .append_query_results(vec![vec![updated]])
            .into_connection();
        let service = MemberService::new(db);

        let resp = service
            .update_member(
                member.id,
                UpdateMemberRequest {
                    name: "Renamed".into(),
                    phone_number: None,
                    address: None,
                    package_id: None,
                    is_active: Some(false),
                },
            )
            .await
            .unwrap();
        assert_eq!(resp.name, "Renamed");
        assert!(!resp.is_active);
    }

    #[tokio::test]
    async fn test_delete_unknown_member() {
        let db = fixtures::mock()
            .append_query_results(vec![Vec::<users::Model>::new()])
            .into_connection();
        let service = MemberService::new(db);

        let err = service.delete_member(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_member() {
        let member = fixtures::user(Role::Member, "member@gym.com");
        let db = fixtures::mock()
            .append_query_results(vec![vec![member.clone()]])
            .append_exec_results(vec![fixtures::exec_ok(1)])
            .into_connection();
        let service = MemberService::new(db);

        assert!(service.delete_member(member.id).await.is_ok());
    }
}
