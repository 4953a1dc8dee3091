pub mod attendances;
pub mod gym_packages;
pub mod users;

pub use attendances as attendance_entity;
pub use gym_packages as gym_package_entity;
pub use users as user_entity;
pub use users::Role;
