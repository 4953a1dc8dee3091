use actix_web::{App, HttpServer, middleware::Logger, web};
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;
use chrono::Local;  // timestamp in log lines

use gym_backend::{
    config::Config,
    database::{create_pool, run_migrations, seed_database},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration");

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to connect to database");

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // 初始化默认数据
    if config.seed.enabled
        && let Err(e) = seed_database(&pool, &config.seed).await
    {
        log::error!("Failed to seed database: {e}");
    }

    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.refresh_secret.as_deref(),
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );

    // 所有服务共享同一个连接池
    let pool = Arc::new(pool);

    // 创建服务
    let auth_service = AuthService::new(pool.clone(), jwt_service.clone());
    let member_service = MemberService::new(pool.clone());
    let staff_service = StaffService::new(pool.clone());
    let package_service = PackageService::new(pool.clone());
    let attendance_service = AttendanceService::new(pool.clone());
    let dashboard_service = DashboardService::new(pool.clone());

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    let cors_config = config.cors.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .wrap(create_cors(&cors_config))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(member_service.clone()))
            .app_data(web::Data::new(staff_service.clone()))
            .app_data(web::Data::new(package_service.clone()))
            .app_data(web::Data::new(attendance_service.clone()))
            .app_data(web::Data::new(dashboard_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api")
                    .configure(handlers::auth_config)
                    .configure(handlers::member_config)
                    .configure(handlers::staff_config)
                    .configure(handlers::package_config)
                    .configure(handlers::attendance_config)
                    .configure(handlers::dashboard_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
