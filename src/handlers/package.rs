use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use crate::middlewares::{ADMIN_ONLY, ANY_ROLE, require_role};
use crate::models::*;
use crate::services::PackageService;

#[utoipa::path(
    get,
    path = "/api/packages",
    tag = "packages",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取套餐列表成功", body = [PackageResponse])
    )
)]
pub async fn get_packages(
    package_service: web::Data<PackageService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_role(&req, ANY_ROLE) {
        return Ok(e.error_response());
    }

    match package_service.get_packages().await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/packages",
    tag = "packages",
    request_body = CreatePackageRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "套餐创建成功", body = PackageResponse),
        (status = 400, description = "请求参数错误", body = ApiError),
        (status = 409, description = "套餐名称已存在", body = ApiError)
    )
)]
pub async fn create_package(
    package_service: web::Data<PackageService>,
    req: HttpRequest,
    request: web::Json<CreatePackageRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require_role(&req, ADMIN_ONLY) {
        return Ok(e.error_response());
    }

    match package_service.create_package(request.into_inner()).await {
        Ok(package) => Ok(HttpResponse::Created().json(ApiResponse::success(package))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/packages/{id}",
    tag = "packages",
    params(
        ("id" = i32, Path, description = "套餐ID")
    ),
    request_body = UpdatePackageRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "套餐更新成功", body = PackageResponse),
        (status = 404, description = "套餐不存在", body = ApiError)
    )
)]
pub async fn update_package(
    package_service: web::Data<PackageService>,
    req: HttpRequest,
    path: web::Path<i32>,
    request: web::Json<UpdatePackageRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require_role(&req, ADMIN_ONLY) {
        return Ok(e.error_response());
    }

    match package_service
        .update_package(path.into_inner(), request.into_inner())
        .await
    {
        Ok(package) => Ok(HttpResponse::Ok().json(ApiResponse::success(package))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/packages/{id}",
    tag = "packages",
    params(
        ("id" = i32, Path, description = "套餐ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "套餐已删除"),
        (status = 404, description = "套餐不存在", body = ApiError),
        (status = 409, description = "仍有会员使用该套餐", body = ApiError)
    )
)]
pub async fn delete_package(
    package_service: web::Data<PackageService>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    if let Err(e) = require_role(&req, ADMIN_ONLY) {
        return Ok(e.error_response());
    }

    match package_service.delete_package(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::message("Package deleted"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn package_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/packages")
            .route("", web::get().to(get_packages))
            .route("", web::post().to(create_package))
            .route("/{id}", web::put().to(update_package))
            .route("/{id}", web::delete().to(delete_package)),
    );
}
