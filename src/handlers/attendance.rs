use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use crate::middlewares::{MEMBER_ONLY, STAFF_OR_ADMIN, require_role};
use crate::models::*;
use crate::services::AttendanceService;

#[utoipa::path(
    post,
    path = "/api/attendance/checkin",
    tag = "attendance",
    request_body = AttendanceRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "签到成功", body = AttendanceResponse),
        (status = 403, description = "会员已停用", body = ApiError),
        (status = 404, description = "会员不存在", body = ApiError),
        (status = 409, description = "今日已签到", body = ApiError)
    )
)]
pub async fn check_in(
    attendance_service: web::Data<AttendanceService>,
    req: HttpRequest,
    request: web::Json<AttendanceRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require_role(&req, STAFF_OR_ADMIN) {
        return Ok(e.error_response());
    }

    match attendance_service.check_in(request.into_inner()).await {
        Ok(record) => Ok(HttpResponse::Created().json(ApiResponse::success_with_message(
            record,
            "Check-in successful",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/attendance/checkout",
    tag = "attendance",
    request_body = AttendanceRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "签出成功", body = AttendanceResponse),
        (status = 404, description = "今日没有未签出的记录", body = ApiError)
    )
)]
pub async fn check_out(
    attendance_service: web::Data<AttendanceService>,
    req: HttpRequest,
    request: web::Json<AttendanceRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require_role(&req, STAFF_OR_ADMIN) {
        return Ok(e.error_response());
    }

    match attendance_service.check_out(request.into_inner()).await {
        Ok(record) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            record,
            "Check-out successful",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/attendance/my-history",
    tag = "attendance",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "最近50条签到记录", body = [AttendanceResponse]),
        (status = 403, description = "仅会员可用", body = ApiError)
    )
)]
pub async fn my_history(
    attendance_service: web::Data<AttendanceService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = match require_role(&req, MEMBER_ONLY) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match attendance_service.my_history(user.id).await {
        Ok(records) => Ok(HttpResponse::Ok().json(ApiResponse::success(records))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/attendance/history",
    tag = "attendance",
    params(
        ("userId" = Option<uuid::Uuid>, Query, description = "会员ID"),
        ("dateFrom" = Option<String>, Query, description = "开始时间 (RFC 3339 或 YYYY-MM-DD)"),
        ("dateTo" = Option<String>, Query, description = "结束时间 (RFC 3339 或 YYYY-MM-DD，含当天)")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "签到记录", body = [AttendanceResponse]),
        (status = 400, description = "日期格式错误", body = ApiError)
    )
)]
pub async fn all_history(
    attendance_service: web::Data<AttendanceService>,
    req: HttpRequest,
    query: web::Query<AttendanceHistoryQuery>,
) -> Result<HttpResponse> {
    if let Err(e) = require_role(&req, STAFF_OR_ADMIN) {
        return Ok(e.error_response());
    }

    match attendance_service.all_history(query.into_inner()).await {
        Ok(records) => Ok(HttpResponse::Ok().json(ApiResponse::success(records))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn attendance_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/attendance")
            .route("/checkin", web::post().to(check_in))
            .route("/checkout", web::post().to(check_out))
            .route("/history", web::get().to(all_history))
            .route("/my-history", web::get().to(my_history)),
    );
}
