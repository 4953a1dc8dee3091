use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::Role;
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh_token,
        handlers::auth::logout,
        handlers::member::get_members,
        handlers::member::create_member,
        handlers::member::update_member,
        handlers::member::delete_member,
        handlers::staff::get_staffs,
        handlers::staff::create_staff,
        handlers::staff::update_staff,
        handlers::staff::delete_staff,
        handlers::package::get_packages,
        handlers::package::create_package,
        handlers::package::update_package,
        handlers::package::delete_package,
        handlers::attendance::check_in,
        handlers::attendance::check_out,
        handlers::attendance::my_history,
        handlers::attendance::all_history,
        handlers::dashboard::get_stats,
    ),
    components(
        schemas(
            Role,
            UserResponse,
            MemberResponse,
            RegisterRequest,
            LoginRequest,
            RefreshTokenRequest,
            AuthResponse,
            TokenResponse,
            UpdateMemberRequest,
            CreateStaffRequest,
            UpdateStaffRequest,
            PackageResponse,
            CreatePackageRequest,
            UpdatePackageRequest,
            AttendanceRequest,
            AttendanceMember,
            AttendanceResponse,
            DashboardStats,
            PackageCount,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication API"),
        (name = "members", description = "Member management API"),
        (name = "staff", description = "Staff management API"),
        (name = "packages", description = "Gym package API"),
        (name = "attendance", description = "Check-in / check-out API"),
        (name = "dashboard", description = "Admin dashboard API"),
    ),
    info(
        title = "Gym Backend API",
        version = "1.0.0",
        description = "Gym membership management REST API documentation"
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
