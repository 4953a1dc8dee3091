use crate::entities::{Role, gym_package_entity as packages, user_entity as users};
use crate::error::AppResult;
use crate::models::*;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select,
};
use std::sync::Arc;

#[derive(Debug, FromQueryResult)]
struct CountRow {
    count: i64,
}

#[derive(Debug, FromQueryResult)]
struct RevenueRow {
    revenue: i64,
}

#[derive(Clone)]
pub struct DashboardService {
    pool: Arc<DatabaseConnection>,
}

impl DashboardService {
    pub fn new(pool: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { pool: pool.into() }
    }

    fn members() -> Select<users::Entity> {
        users::Entity::find().filter(users::Column::Role.eq(Role::Member))
    }

    async fn count(&self, select: Select<users::Entity>) -> AppResult<u64> {
        let count = select
            .select_only()
            .column_as(Expr::val(1).count(), "count")
            .into_model::<CountRow>()
            .one(self.pool.as_ref())
            .await?
            .map(|r| r.count)
            .unwrap_or(0);
        Ok(count.max(0) as u64)
    }

    /// 后台首页统计
    pub async fn get_stats(&self) -> AppResult<DashboardStats> {
        let total_members = self.count(Self::members()).await?;
        let active_members = self
            .count(Self::members().filter(users::Column::IsActive.eq(true)))
            .await?;

        let members_by_package = Self::members()
            .select_only()
            .column_as(packages::Column::Name, "package_name")
            .column_as(
                Expr::col((users::Entity, users::Column::Id)).count(),
                "member_count",
            )
            .join(JoinType::InnerJoin, users::Relation::GymPackage.def())
            .group_by(packages::Column::Name)
            .order_by_asc(packages::Column::Name)
            .into_model::<PackageCount>()
            .all(self.pool.as_ref())
            .await?;

        // SUM(bigint) 在 Postgres 中返回 numeric，需要转回 BIGINT
        let projected_monthly_revenue = Self::members()
            .filter(users::Column::IsActive.eq(true))
            .select_only()
            .column_as(
                Expr::cust("COALESCE(SUM(\"gym_packages\".\"price\"), 0)::BIGINT"),
                "revenue",
            )
            .join(JoinType::InnerJoin, users::Relation::GymPackage.def())
            .into_model::<RevenueRow>()
            .one(self.pool.as_ref())
            .await?
            .map(|r| r.revenue)
            .unwrap_or(0);

        Ok(DashboardStats {
            total_members,
            active_members,
            members_by_package,
            projected_monthly_revenue,
        })
    }
}
