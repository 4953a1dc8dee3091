use crate::entities::gym_package_entity as packages;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PackageResponse {
    pub id: i32,
    pub name: String,
    pub price: i64,
    pub duration_days: i32,
    pub benefits: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<packages::Model> for PackageResponse {
    fn from(m: packages::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            price: m.price,
            duration_days: m.duration_days,
            benefits: m.benefits,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePackageRequest {
    #[schema(example = "Bulanan")]
    pub name: String,
    #[schema(example = 300000)]
    pub price: i64,
    #[schema(example = 30)]
    pub duration_days: i32,
    #[schema(example = "Akses 30 hari")]
    pub benefits: Option<String>,
}

/// Only the provided fields change.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePackageRequest {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub duration_days: Option<i32>,
    pub benefits: Option<String>,
}
