use crate::entities::{gym_package_entity as packages, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::*;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;

fn validate_name(name: &str) -> AppResult<String> {
    let name = name.trim().to_string();
    validate_required("name", &name, 100)?;
    Ok(name)
}

fn validate_price(price: i64) -> AppResult<i64> {
    if price <= 0 {
        return Err(AppError::ValidationError(
            "price must be greater than 0".to_string(),
        ));
    }
    Ok(price)
}

fn validate_duration(days: i32) -> AppResult<i32> {
    if days <= 0 {
        return Err(AppError::ValidationError(
            "durationDays must be greater than 0".to_string(),
        ));
    }
    Ok(days)
}

#[derive(Clone)]
pub struct PackageService {
    pool: Arc<DatabaseConnection>,
}

impl PackageService {
    pub fn new(pool: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { pool: pool.into() }
    }

    /// 按价格从低到高
    pub async fn get_packages(&self) -> AppResult<Vec<PackageResponse>> {
        let list = packages::Entity::find()
            .order_by_asc(packages::Column::Price)
            .order_by_asc(packages::Column::Id)
            .all(self.pool.as_ref())
            .await?;
        Ok(list.into_iter().map(PackageResponse::from).collect())
    }

    async fn ensure_name_available(&self, name: &str, exclude_id: Option<i32>) -> AppResult<()> {
        let mut query = packages::Entity::find().filter(packages::Column::Name.eq(name));
        if let Some(id) = exclude_id {
            query = query.filter(packages::Column::Id.ne(id));
        }
        if query.one(self.pool.as_ref()).await?.is_some() {
            return Err(AppError::Conflict(format!("Package '{name}' already exists")));
        }
        Ok(())
    }

    pub async fn create_package(&self, request: CreatePackageRequest) -> AppResult<PackageResponse> {
        let name = validate_name(&request.name)?;
        let price = validate_price(request.price)?;
        let duration_days = validate_duration(request.duration_days)?;

        self.ensure_name_available(&name, None).await?;

        let package = packages::ActiveModel {
            name: Set(name),
            price: Set(price),
            duration_days: Set(duration_days),
            benefits: Set(non_empty(request.benefits)),
            ..Default::default()
        }
        .insert(self.pool.as_ref())
        .await?;

        log::info!("Created package {} ({})", package.id, package.name);
        Ok(PackageResponse::from(package))
    }

    pub async fn update_package(
        &self,
        id: i32,
        request: UpdatePackageRequest,
    ) -> AppResult<PackageResponse> {
        let name = request.name.as_deref().map(validate_name).transpose()?;
        let price = request.price.map(validate_price).transpose()?;
        let duration_days = request.duration_days.map(validate_duration).transpose()?;

        let package = packages::Entity::find_by_id(id)
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound("Package not found".to_string()))?;

        if let Some(name) = &name {
            if *name != package.name {
                self.ensure_name_available(name, Some(id)).await?;
            }
        }

        let mut model = package.into_active_model();
        if let Some(name) = name {
            model.name = Set(name);
        }
        if let Some(price) = price {
            model.price = Set(price);
        }
        if let Some(days) = duration_days {
            model.duration_days = Set(days);
        }
        if request.benefits.is_some() {
            model.benefits = Set(non_empty(request.benefits));
        }
        let updated = model.update(self.pool.as_ref()).await?;

        Ok(PackageResponse::from(updated))
    }

    /// 仍有会员使用的套餐不允许删除
    pub async fn delete_package(&self, id: i32) -> AppResult<()> {
        let package = packages::Entity::find_by_id(id)
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound("Package not found".to_string()))?;

        #[derive(Debug, FromQueryResult)]
        struct CountRow {
            count: i64,
        }
        let members = users::Entity::find()
            .filter(users::Column::PackageId.eq(id))
            .select_only()
            .column_as(Expr::val(1).count(), "count")
            .into_model::<CountRow>()
            .one(self.pool.as_ref())
            .await?
            .map(|r| r.count)
            .unwrap_or(0);

        if members > 0 {
            return Err(AppError::Conflict(format!(
                "Package '{}' is still assigned to {members} member(s)",
                package.name
            )));
        }

        packages::Entity::delete_by_id(id).exec(self.pool.as_ref()).await?;
        log::info!("Deleted package {id}");
        Ok(())
    }
}
