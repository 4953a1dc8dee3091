pub mod auth;
pub mod cors;

pub use auth::{
    ADMIN_ONLY, ANY_ROLE, AuthMiddleware, AuthUser, MEMBER_ONLY, STAFF_OR_ADMIN, current_user,
    require_role,
};
pub use cors::create_cors;
