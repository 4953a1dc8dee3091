use crate::config::SeedConfig;
use crate::entities::{Role, gym_package_entity as packages, user_entity as users};
use crate::error::AppResult;
use crate::utils::hash_password;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};

pub const ADMIN_EMAIL: &str = "admin@gym.com";
const STAFF_EMAIL: &str = "staff@gym.com";
const MEMBER_EMAIL: &str = "member@gym.com";

async fn ensure_package<C: ConnectionTrait>(
    db: &C,
    name: &str,
    price: i64,
    duration_days: i32,
    benefits: &str,
) -> AppResult<packages::Model> {
    if let Some(existing) = packages::Entity::find()
        .filter(packages::Column::Name.eq(name))
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    let package = packages::ActiveModel {
        name: Set(name.to_string()),
        price: Set(price),
        duration_days: Set(duration_days),
        benefits: Set(Some(benefits.to_string())),
        ..Default::default()
    }
    .insert(db)
    .await?;
    log::info!("Seeded package {name}");
    Ok(package)
}

fn account(
    name: &str,
    email: &str,
    password_hash: &str,
    role: Role,
) -> users::ActiveModel {
    users::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash.to_string()),
        role: Set(role),
        ..Default::default()
    }
}

/// 初始化默认套餐和账号，可重复执行
pub async fn seed_database(db: &DatabaseConnection, config: &SeedConfig) -> AppResult<()> {
    let monthly = ensure_package(db, "Bulanan", 300_000, 30, "Akses 30 hari").await?;
    ensure_package(
        db,
        "Tahunan",
        3_000_000,
        365,
        "Akses 1 tahun, gratis loker khusus",
    )
    .await?;

    if users::Entity::find()
        .filter(users::Column::Email.eq(ADMIN_EMAIL))
        .one(db)
        .await?
        .is_some()
    {
        log::info!("Default accounts already present, skipping user seed");
        return Ok(());
    }

    let password_hash = hash_password(&config.default_password)?;

    let txn = db.begin().await?;
    account("Super Admin", ADMIN_EMAIL, &password_hash, Role::Admin)
        .insert(&txn)
        .await?;
    account("Staff Resepsionis", STAFF_EMAIL, &password_hash, Role::Staff)
        .insert(&txn)
        .await?;

    let mut member = account("Member Contoh", MEMBER_EMAIL, &password_hash, Role::Member);
    member.phone_number = Set(Some("08123456789".to_string()));
    member.package_id = Set(Some(monthly.id));
    member.insert(&txn).await?;
    txn.commit().await?;

    log::info!("Seeded default admin, staff and member accounts");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = fixtures::mock()
            .append_query_results(vec![vec![fixtures::package(1, "Bulanan", 300_000)]])
            .append_query_results(vec![vec![fixtures::package(2, "Tahunan", 3_000_000)]])
            .append_query_results(vec![vec![fixtures::user(Role::Admin, ADMIN_EMAIL)]])
            .into_connection();

        seed_database(&db, &SeedConfig::default()).await.unwrap();
        // 三次查询，没有任何写入
        assert_eq!(db.into_transaction_log().len(), 3);
    }

    #[tokio::test]
    async fn test_seed_fresh_database() {
        let mut member = fixtures::user(Role::Member, MEMBER_EMAIL);
        member.package_id = Some(1);
        let db = fixtures::mock()
            .append_query_results(vec![Vec::<packages::Model>::new()])
            .append_query_results(vec![vec![fixtures::package(1, "Bulanan", 300_000)]])
            .append_query_results(vec![Vec::<packages::Model>::new()])
            .append_query_results(vec![vec![fixtures::package(2, "Tahunan", 3_000_000)]])
            .append_query_results(vec![Vec::<users::Model>::new()])
            .append_query_results(vec![vec![fixtures::user(Role::Admin, ADMIN_EMAIL)]])
            .append_query_results(vec![vec![fixtures::user(Role::Staff, STAFF_EMAIL)]])
            .append_query_results(vec![vec![member]])
            .into_connection();

        assert!(seed_database(&db, &SeedConfig::default()).await.is_ok());
    }
}
