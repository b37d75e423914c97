//! 龙虎榜数据后端服务
//!
//! 提供每日龙虎榜、上榜统计、机构席位和营业部买卖明细的 RESTful API
//! 数据来源：东方财富、新浪财经
//!
//! 也可以直接在命令行打印营业部买卖明细：
//! `lhb-backend details <代码> [日期]`

mod config;   // 配置
mod handlers; // HTTP 请求处理器
mod models;   // 数据模型定义
mod services; // 业务逻辑服务

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use env_logger::Env;
use log::LevelFilter;

use crate::config::AppConfig;
use crate::services::billboard::{build_report, print_report, BillboardService};

/// 命令行模式：打印营业部买卖明细报表
async fn print_details(service: &BillboardService, args: &[String]) -> anyhow::Result<()> {
    let code = args.first().map(String::as_str);
    let date = args.get(1).map(String::as_str);
    match service.lhb_details(code, date).await? {
        Some(detail) => print_report(&build_report(&detail)),
        None => println!("非交易日，无龙虎榜数据"),
    }
    Ok(())
}

/// 应用程序入口
///
/// 无参数时启动 HTTP 服务器，监听地址来自配置（默认 0.0.0.0:8080）
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // 日志先于配置初始化；RUST_LOG 优先，否则加载前为 info，加载后取配置中的级别
    let from_env = std::env::var_os("RUST_LOG").is_some();
    env_logger::init_from_env(Env::default().default_filter_or("trace"));
    if !from_env {
        log::set_max_level(LevelFilter::Info);
    }

    let config = AppConfig::load();
    if !from_env {
        log::set_max_level(config.log.level_filter());
    }

    let service = BillboardService::from_config(&config).context("初始化龙虎榜服务失败")?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.first().map(String::as_str) == Some("details") {
        return print_details(&service, &args[1..]).await;
    }

    let service = web::Data::new(service);
    let bind_addr = config.bind_addr();
    log::info!("🚀 启动龙虎榜后端服务，监听 {}", bind_addr);

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default()) // 请求日志
            .app_data(service.clone())
            .configure(handlers::config)
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_addr)
        .with_context(|| format!("绑定地址失败: {}", bind_addr))?
        .run()
        .await?;
    Ok(())
}
