use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::TableCreateStatement;
use sea_orm::{ActiveValue, DbBackend, DeriveActiveEnum, EnumIter, Schema, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Account role. Stored as the Postgres enum `role_enum`.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    ToSchema,
    DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "role_enum")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "staff")]
    Staff,
    #[sea_orm(string_value = "member")]
    Member,
}

impl Default for Role {
    fn default() -> Self {
        Role::Member
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
            Role::Member => "member",
        }
    }

    /// Staff and admins run the front desk.
    pub fn is_staff_or_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::Staff)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "staff" => Ok(Role::Staff),
            "member" => Ok(Role::Member),
            other => Err(format!("invalid role '{other}', expected admin, staff or member")),
        }
    }
}

/// 会员、员工与管理员共用的用户表
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    #[sea_orm(column_type = "String(Some(50))", nullable)]
    pub phone_number: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub address: Option<String>,
    #[sea_orm(nullable)]
    pub package_id: Option<i32>,
    pub is_active: bool,
    /// Latest issued refresh token; `None` after logout.
    #[sea_orm(column_type = "String(Some(512))", nullable)]
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::gym_packages::Entity",
        from = "Column::PackageId",
        to = "super::gym_packages::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    GymPackage,
    #[sea_orm(has_many = "super::attendances::Entity")]
    Attendances,
}

impl Related<super::gym_packages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GymPackage.def()
    }
}

impl Related<super::attendances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendances.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    /// New rows get a fresh id, the `member` role and an active account.
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            role: Set(Role::Member),
            is_active: Set(true),
            ..<Self as ActiveModelTrait>::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        if insert {
            for (field, value) in [
                ("name", &self.name),
                ("email", &self.email),
                ("password", &self.password_hash),
            ] {
                if !is_present(value) {
                    return Err(DbErr::Custom(format!("users.{field} must not be null")));
                }
            }
            if self.created_at.is_not_set() {
                self.created_at = Set(now);
            }
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}

fn is_present(value: &ActiveValue<String>) -> bool {
    match value {
        ActiveValue::Set(v) | ActiveValue::Unchanged(v) => !v.trim().is_empty(),
        ActiveValue::NotSet => false,
    }
}

/// `CREATE TABLE` statement derived from the entity definition.
pub fn create_table_statement(backend: DbBackend) -> TableCreateStatement {
    Schema::new(backend).create_table_from_entity(Entity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ActiveEnum, DatabaseBackend, MockDatabase, RelationType, Value};

    fn sample() -> Model {
        let now = Utc::now();
        Model {
            id: Uuid::new_v4(),
            name: "Member Contoh".to_string(),
            email: "member@gym.com".to_string(),
            password_hash: "$2b$12$hash".to_string(),
            role: Role::Member,
            phone_number: Some("08123456789".to_string()),
            address: None,
            package_id: Some(1),
            is_active: true,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_new_active_model_defaults() {
        let model = ActiveModel::new();
        assert!(model.id.is_set());
        assert!(matches!(model.role, ActiveValue::Set(Role::Member)));
        assert!(matches!(model.is_active, ActiveValue::Set(true)));
        assert!(model.refresh_token.is_not_set());
        assert!(model.package_id.is_not_set());
    }

    #[test]
    fn test_default_goes_through_behavior() {
        let model = ActiveModel {
            name: Set("Staff".to_string()),
            ..Default::default()
        };
        assert!(matches!(model.role, ActiveValue::Set(Role::Member)));
        assert!(matches!(model.is_active, ActiveValue::Set(true)));
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("staff".parse::<Role>(), Ok(Role::Staff));
        assert_eq!("member".parse::<Role>(), Ok(Role::Member));
        assert!("owner".parse::<Role>().is_err());
        assert!("Admin".parse::<Role>().is_err());
        assert_eq!(Role::Staff.to_string(), "staff");
        assert_eq!(Role::default(), Role::Member);
    }

    #[test]
    fn test_role_rejects_unknown_json_value() {
        let ok: Role = serde_json::from_str("\"staff\"").unwrap();
        assert_eq!(ok, Role::Staff);
        assert!(serde_json::from_str::<Role>("\"superuser\"").is_err());
    }

    #[test]
    fn test_role_active_enum_values() {
        assert_eq!(Role::Admin.to_value(), "admin".to_string());
        assert_eq!(Role::try_from_value(&"member".to_string()).unwrap(), Role::Member);
        assert!(Role::try_from_value(&"guest".to_string()).is_err());
    }

    #[test]
    fn test_create_table_statement() {
        let sql = DbBackend::Postgres
            .build(&create_table_statement(DbBackend::Postgres))
            .to_string();
        assert!(sql.contains(r#"CREATE TABLE "users""#));
        assert!(sql.contains("UNIQUE"));
        assert!(sql.contains("role_enum"));
        assert!(sql.contains("varchar(512)"));
        assert!(sql.contains(r#"REFERENCES "gym_packages" ("id")"#));
    }

    #[test]
    fn test_relations() {
        let package = Relation::GymPackage.def();
        assert_eq!(package.rel_type, RelationType::HasOne);
        assert!(!package.is_owner);

        let attendances = Relation::Attendances.def();
        assert_eq!(attendances.rel_type, RelationType::HasMany);
        assert!(attendances.is_owner);
    }

    #[tokio::test]
    async fn test_insert_without_required_fields_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let missing_name = ActiveModel {
            email: Set("a@gym.com".to_string()),
            password_hash: Set("hash".to_string()),
            ..Default::default()
        };
        let err = missing_name.insert(&db).await.unwrap_err();
        assert!(matches!(err, DbErr::Custom(msg) if msg.contains("name")));

        let blank_email = ActiveModel {
            name: Set("A".to_string()),
            email: Set("  ".to_string()),
            password_hash: Set("hash".to_string()),
            ..Default::default()
        };
        let err = blank_email.insert(&db).await.unwrap_err();
        assert!(matches!(err, DbErr::Custom(msg) if msg.contains("email")));

        let missing_password = ActiveModel {
            name: Set("A".to_string()),
            email: Set("a@gym.com".to_string()),
            ..Default::default()
        };
        let err = missing_password.insert(&db).await.unwrap_err();
        assert!(matches!(err, DbErr::Custom(msg) if msg.contains("password")));
    }

    #[tokio::test]
    async fn test_insert_fills_defaults() {
        let expected = sample();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![expected.clone()]])
            .into_connection();

        let inserted = ActiveModel {
            name: Set(expected.name.clone()),
            email: Set(expected.email.clone()),
            password_hash: Set(expected.password_hash.clone()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();
        assert_eq!(inserted, expected);

        let log = db.into_transaction_log();
        let insert = &log[0].statements()[0];
        assert!(insert.sql.starts_with(r#"INSERT INTO "users""#));
        for column in [r#""role""#, r#""is_active""#, r#""created_at""#] {
            assert!(insert.sql.contains(column), "missing {column} in {}", insert.sql);
        }
        let values = &insert.values.as_ref().unwrap().0;
        assert!(values.contains(&Value::from("member")));
        assert!(values.contains(&Value::Bool(Some(true))));
    }
}
