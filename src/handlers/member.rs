use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use uuid::Uuid;
use crate::middlewares::{ADMIN_ONLY, STAFF_OR_ADMIN, require_role};
use crate::models::*;
use crate::services::MemberService;

#[utoipa::path(
    get,
    path = "/api/members",
    tag = "members",
    params(
        ("search" = Option<String>, Query, description = "按姓名或邮箱模糊搜索"),
        ("status" = Option<String>, Query, description = "active / inactive")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取会员列表成功", body = [MemberResponse]),
        (status = 400, description = "筛选参数错误", body = ApiError),
        (status = 403, description = "无权限", body = ApiError)
    )
)]
pub async fn get_members(
    member_service: web::Data<MemberService>,
    req: HttpRequest,
    query: web::Query<MemberQuery>,
) -> Result<HttpResponse> {
    if let Err(e) = require_role(&req, STAFF_OR_ADMIN) {
        return Ok(e.error_response());
    }

    match member_service.get_members(query.into_inner()).await {
        Ok(members) => Ok(HttpResponse::Ok().json(ApiResponse::success(members))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/members",
    tag = "members",
    request_body = RegisterRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "会员创建成功", body = UserResponse),
        (status = 400, description = "请求参数错误", body = ApiError),
        (status = 409, description = "邮箱已注册", body = ApiError)
    )
)]
pub async fn create_member(
    member_service: web::Data<MemberService>,
    req: HttpRequest,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require_role(&req, STAFF_OR_ADMIN) {
        return Ok(e.error_response());
    }

    match member_service.create_member(request.into_inner()).await {
        Ok(member) => Ok(HttpResponse::Created().json(ApiResponse::success(member))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/members/{id}",
    tag = "members",
    params(
        ("id" = Uuid, Path, description = "会员ID")
    ),
    request_body = UpdateMemberRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "会员更新成功", body = UserResponse),
        (status = 404, description = "会员不存在", body = ApiError)
    )
)]
pub async fn update_member(
    member_service: web::Data<MemberService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    request: web::Json<UpdateMemberRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require_role(&req, STAFF_OR_ADMIN) {
        return Ok(e.error_response());
    }

    match member_service
        .update_member(path.into_inner(), request.into_inner())
        .await
    {
        Ok(member) => Ok(HttpResponse::Ok().json(ApiResponse::success(member))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/members/{id}",
    tag = "members",
    params(
        ("id" = Uuid, Path, description = "会员ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "会员已删除"),
        (status = 403, description = "仅管理员可删除", body = ApiError),
        (status = 404, description = "会员不存在", body = ApiError)
    )
)]
pub async fn delete_member(
    member_service: web::Data<MemberService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    if let Err(e) = require_role(&req, ADMIN_ONLY) {
        return Ok(e.error_response());
    }

    match member_service.delete_member(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::message("Member deleted"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn member_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/members")
            .route("", web::get().to(get_members))
            .route("", web::post().to(create_member))
            .route("/{id}", web::put().to(update_member))
            .route("/{id}", web::delete().to(delete_member)),
    );
}
