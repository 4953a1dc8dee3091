use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use crate::middlewares::{ADMIN_ONLY, require_role};
use crate::models::*;
use crate::services::DashboardService;

#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    tag = "dashboard",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取统计数据成功", body = DashboardStats),
        (status = 403, description = "仅管理员可用", body = ApiError)
    )
)]
pub async fn get_stats(
    dashboard_service: web::Data<DashboardService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_role(&req, ADMIN_ONLY) {
        return Ok(e.error_response());
    }

    match dashboard_service.get_stats().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(stats))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn dashboard_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/dashboard").route("/stats", web::get().to(get_stats)));
}
