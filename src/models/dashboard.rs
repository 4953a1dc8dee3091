use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_members: u64,
    pub active_members: u64,
    pub members_by_package: Vec<PackageCount>,
    /// Sum of the package prices of active members.
    pub projected_monthly_revenue: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, FromQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct PackageCount {
    pub package_name: String,
    pub member_count: i64,
}
