pub mod attendance_service;
pub mod auth_service;
pub mod dashboard_service;
pub mod member_service;
pub mod package_service;
pub mod staff_service;

pub use attendance_service::*;
pub use auth_service::*;
pub use dashboard_service::*;
pub use member_service::*;
pub use package_service::*;
pub use staff_service::*;

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::entities::{
        Role, attendance_entity as attendances, gym_package_entity as packages,
        user_entity as users,
    };
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use uuid::Uuid;

    pub fn user(role: Role, email: &str) -> users::Model {
        let now = Utc::now();
        users::Model {
            id: Uuid::new_v4(),
            name: "Member Contoh".to_string(),
            email: email.to_string(),
            password_hash: String::new(),
            role,
            phone_number: None,
            address: None,
            package_id: None,
            is_active: true,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn package(id: i32, name: &str, price: i64) -> packages::Model {
        let now = Utc::now();
        packages::Model {
            id,
            name: name.to_string(),
            price,
            duration_days: 30,
            benefits: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn attendance(user_id: Uuid) -> attendances::Model {
        attendances::Model {
            id: Uuid::new_v4(),
            user_id,
            check_in_time: Utc::now(),
            check_out_time: None,
        }
    }

    pub fn mock() -> MockDatabase {
        MockDatabase::new(DatabaseBackend::Postgres)
    }

    pub fn exec_ok(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    pub fn empty_db() -> DatabaseConnection {
        mock().into_connection()
    }
}
