pub mod attendance;
pub mod auth;
pub mod dashboard;
pub mod member;
pub mod package;
pub mod staff;

pub use attendance::attendance_config;
pub use auth::auth_config;
pub use dashboard::dashboard_config;
pub use member::member_config;
pub use package::package_config;
pub use staff::staff_config;
