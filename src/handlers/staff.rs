use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use uuid::Uuid;
use crate::middlewares::{ADMIN_ONLY, STAFF_OR_ADMIN, require_role};
use crate::models::*;
use crate::services::StaffService;

#[utoipa::path(
    get,
    path = "/api/staff",
    tag = "staff",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取员工列表成功", body = [UserResponse]),
        (status = 403, description = "无权限", body = ApiError)
    )
)]
pub async fn get_staffs(
    staff_service: web::Data<StaffService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_role(&req, STAFF_OR_ADMIN) {
        return Ok(e.error_response());
    }

    match staff_service.get_staffs().await {
        Ok(staffs) => Ok(HttpResponse::Ok().json(ApiResponse::success(staffs))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/staff",
    tag = "staff",
    request_body = CreateStaffRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "员工创建成功", body = UserResponse),
        (status = 400, description = "请求参数错误", body = ApiError),
        (status = 409, description = "邮箱已注册", body = ApiError)
    )
)]
pub async fn create_staff(
    staff_service: web::Data<StaffService>,
    req: HttpRequest,
    request: web::Json<CreateStaffRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require_role(&req, ADMIN_ONLY) {
        return Ok(e.error_response());
    }

    match staff_service.create_staff(request.into_inner()).await {
        Ok(staff) => Ok(HttpResponse::Created().json(ApiResponse::success(staff))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/staff/{id}",
    tag = "staff",
    params(
        ("id" = Uuid, Path, description = "员工ID")
    ),
    request_body = UpdateStaffRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "员工更新成功", body = UserResponse),
        (status = 404, description = "员工不存在", body = ApiError),
        (status = 409, description = "邮箱已被使用", body = ApiError)
    )
)]
pub async fn update_staff(
    staff_service: web::Data<StaffService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    request: web::Json<UpdateStaffRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require_role(&req, ADMIN_ONLY) {
        return Ok(e.error_response());
    }

    match staff_service
        .update_staff(path.into_inner(), request.into_inner())
        .await
    {
        Ok(staff) => Ok(HttpResponse::Ok().json(ApiResponse::success(staff))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/staff/{id}",
    tag = "staff",
    params(
        ("id" = Uuid, Path, description = "员工ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "员工已删除"),
        (status = 403, description = "不能删除自己的账号", body = ApiError),
        (status = 404, description = "员工不存在", body = ApiError)
    )
)]
pub async fn delete_staff(
    staff_service: web::Data<StaffService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let admin = match require_role(&req, ADMIN_ONLY) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match staff_service.delete_staff(path.into_inner(), admin.id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::message("Staff deleted"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn staff_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/staff")
            .route("", web::get().to(get_staffs))
            .route("", web::post().to(create_staff))
            .route("/{id}", web::put().to(update_staff))
            .route("/{id}", web::delete().to(delete_staff)),
    );
}
