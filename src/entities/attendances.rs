use chrono::{DateTime, Utc};
use sea_orm::Set;
use sea_orm::entity::prelude::*;

/// 到店签到记录
/// - check_out_time 为空表示会员仍在馆内
/// - 删除用户时级联删除
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "attendances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub check_in_time: DateTime<Utc>,
    pub check_out_time: Option<DateTime<Utc>>,
}

impl Model {
    pub fn is_open(&self) -> bool {
        self.check_out_time.is_none()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            ..<Self as ActiveModelTrait>::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::sea_query::ForeignKeyAction;
    use sea_orm::{ActiveValue, DbBackend, Schema};

    #[test]
    fn test_new_generates_id() {
        let a = ActiveModel::new();
        let b = ActiveModel::new();
        match (a.id, b.id) {
            (ActiveValue::Set(x), ActiveValue::Set(y)) => assert_ne!(x, y),
            _ => panic!("id should be set"),
        }
        assert!(a.check_in_time.is_not_set());
    }

    #[test]
    fn test_user_relation_cascades() {
        let rel = Relation::User.def();
        assert!(!rel.is_owner);
        assert!(matches!(rel.on_delete, Some(ForeignKeyAction::Cascade)));

        let sql = DbBackend::Postgres
            .build(&Schema::new(DbBackend::Postgres).create_table_from_entity(Entity))
            .to_string();
        assert!(sql.contains(r#"REFERENCES "users" ("id")"#));
        assert!(sql.contains("ON DELETE CASCADE"));
    }

    #[test]
    fn test_is_open() {
        let mut model = Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            check_in_time: Utc::now(),
            check_out_time: None,
        };
        assert!(model.is_open());
        model.check_out_time = Some(Utc::now());
        assert!(!model.is_open());
    }
}
