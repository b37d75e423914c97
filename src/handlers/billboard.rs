use actix_web::{web, HttpResponse, Result};
use serde::Serialize;

use crate::models::{ApiResponse, DetailsQuery, LookbackQuery, TopListQuery};
use crate::services::billboard::{
    build_report, render_report, BillboardError, BillboardService, PagedResult,
};

const DEFAULT_DAYS: u32 = 5;
const NO_DATA: &str = "非交易日，无龙虎榜数据";

/// 参数错误 400，抓取或解析失败 502
fn error_response(e: BillboardError) -> HttpResponse {
    log::error!("❌ {}", e);
    let body = ApiResponse::<()>::error(e.to_string());
    match e {
        BillboardError::InvalidArgument(_) => HttpResponse::BadRequest().json(body),
        BillboardError::Network(_) | BillboardError::Decode(_) => {
            HttpResponse::BadGateway().json(body)
        }
    }
}

fn paged_response<T: Serialize>(result: PagedResult<T>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::partial(result.rows, result.warning))
}

pub async fn get_top_list(
    service: web::Data<BillboardService>,
    query: web::Query<TopListQuery>,
) -> Result<HttpResponse> {
    match service.top_list(query.date.as_deref()).await {
        Ok(Some(rows)) => Ok(HttpResponse::Ok().json(ApiResponse::success(rows))),
        Ok(None) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::no_data(NO_DATA.to_string()))),
        Err(e) => Ok(error_response(e)),
    }
}

pub async fn get_cap_tops(
    service: web::Data<BillboardService>,
    query: web::Query<LookbackQuery>,
) -> Result<HttpResponse> {
    match service.cap_tops(query.days.unwrap_or(DEFAULT_DAYS)).await {
        Ok(result) => Ok(paged_response(result)),
        Err(e) => Ok(error_response(e)),
    }
}

pub async fn get_broker_tops(
    service: web::Data<BillboardService>,
    query: web::Query<LookbackQuery>,
) -> Result<HttpResponse> {
    match service.broker_tops(query.days.unwrap_or(DEFAULT_DAYS)).await {
        Ok(result) => Ok(paged_response(result)),
        Err(e) => Ok(error_response(e)),
    }
}

pub async fn get_inst_tops(
    service: web::Data<BillboardService>,
    query: web::Query<LookbackQuery>,
) -> Result<HttpResponse> {
    match service.inst_tops(query.days.unwrap_or(DEFAULT_DAYS)).await {
        Ok(result) => Ok(paged_response(result)),
        Err(e) => Ok(error_response(e)),
    }
}

pub async fn get_inst_detail(service: web::Data<BillboardService>) -> Result<HttpResponse> {
    Ok(paged_response(service.inst_detail().await))
}

/// 营业部买卖明细，`format=text` 时返回文本报表
pub async fn get_details(
    service: web::Data<BillboardService>,
    query: web::Query<DetailsQuery>,
) -> Result<HttpResponse> {
    let as_text = match query.format.as_deref() {
        None | Some("json") => false,
        Some("text") => true,
        Some(other) => {
            return Ok(error_response(BillboardError::invalid(format!(
                "format 只能是 json 或 text: {}",
                other
            ))))
        }
    };

    let detail = match service
        .lhb_details(query.code.as_deref(), query.date.as_deref())
        .await
    {
        Ok(Some(detail)) => detail,
        Ok(None) if as_text => {
            return Ok(HttpResponse::Ok()
                .content_type("text/plain; charset=utf-8")
                .body(NO_DATA))
        }
        Ok(None) => {
            return Ok(HttpResponse::Ok().json(ApiResponse::<()>::no_data(NO_DATA.to_string())))
        }
        Err(e) => return Ok(error_response(e)),
    };

    let report = build_report(&detail);
    if as_text {
        Ok(HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(render_report(&report)))
    } else {
        Ok(HttpResponse::Ok().json(ApiResponse::success(report)))
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/billboard")
            .route("/top_list", web::get().to(get_top_list))
            .route("/cap_tops", web::get().to(get_cap_tops))
            .route("/broker_tops", web::get().to(get_broker_tops))
            .route("/inst_tops", web::get().to(get_inst_tops))
            .route("/inst_detail", web::get().to(get_inst_detail))
            .route("/details", web::get().to(get_details)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use std::sync::Arc;

    use crate::config::FetchConfig;
    use crate::services::billboard::{HolidayCalendar, Transport};

    /// 所有请求都失败的传输层
    struct Offline;

    #[async_trait::async_trait]
    impl Transport for Offline {
        async fn get(&self, url: &str) -> crate::services::billboard::Result<Vec<u8>> {
            Err(BillboardError::Network(format!("离线: {}", url)))
        }
    }

    fn offline_service() -> web::Data<BillboardService> {
        let fetch = FetchConfig {
            pause_ms: 0,
            ..FetchConfig::default()
        };
        web::Data::new(BillboardService::new(
            Arc::new(Offline),
            Arc::new(HolidayCalendar::default()),
            &fetch,
        ))
    }

    #[actix_web::test]
    async fn test_invalid_days_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(offline_service())
                .service(web::scope("/api/v1").configure(config)),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/api/v1/billboard/cap_tops?days=7")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_top_list_network_failure_is_bad_gateway() {
        let app = test::init_service(
            App::new()
                .app_data(offline_service())
                .service(web::scope("/api/v1").configure(config)),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/api/v1/billboard/top_list?date=2024-03-08")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[actix_web::test]
    async fn test_holiday_and_partial_results() {
        let app = test::init_service(
            App::new()
                .app_data(offline_service())
                .service(web::scope("/api/v1").configure(config)),
        )
        .await;

        // 周六
        let req = test::TestRequest::get()
            .uri("/api/v1/billboard/top_list?date=2024-03-09")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert!(body["data"].is_null());

        let req = test::TestRequest::get()
            .uri("/api/v1/billboard/broker_tops?days=10")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"], serde_json::json!([]));
        assert!(body["warning"].is_string());
    }

    #[actix_web::test]
    async fn test_details_requires_code() {
        let app = test::init_service(
            App::new()
                .app_data(offline_service())
                .service(web::scope("/api/v1").configure(config)),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/api/v1/billboard/details?date=2024-03-08")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get()
            .uri("/api/v1/billboard/details?code=000973&format=xml")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
