//! 龙虎榜数据服务
//!
//! 对外入口：
//! - `top_list` 每日龙虎榜（必须成功，重试用尽返回网络错误）
//! - `cap_tops` / `broker_tops` / `inst_tops` 个股、营业部、机构席位上榜统计
//! - `inst_detail` 机构席位成交明细
//! - `lhb_details` 单只证券营业部买卖明细（必须成功）
//!
//! 分页统计类接口尽力而为：失败时返回已抓到的数据并附带警告

use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;

use super::calendar::{default_trade_date, HolidayCalendar, TradingCalendar};
use super::common::{beijing_now, parse_date, zfill_code, CODE_WIDTH};
use super::eastmoney::fetch_top_list;
use super::error::{BillboardError, Result};
use super::normalize::{
    normalize_broker_tops, normalize_inst_detail, normalize_inst_tops, normalize_stock_tops,
};
use super::request::{LookbackDays, SinaKind};
use super::retry::RetryPolicy;
use super::sina::{fetch_combs_detail, SinaTableSource};
use super::transport::{HttpTransport, Transport};
use super::walker::{PageWalker, PagedResult};
use crate::config::{AppConfig, FetchConfig};
use crate::models::{
    BrokerTopStat, ComBSDetail, InstTopStat, InstitutionDetailRecord, StockTopStat, TopListRecord,
};

pub struct BillboardService {
    transport: Arc<dyn Transport>,
    calendar: Arc<dyn TradingCalendar>,
    retry: RetryPolicy,
    max_pages: u32,
    publish_hour: u32,
}

impl BillboardService {
    pub fn new(
        transport: Arc<dyn Transport>,
        calendar: Arc<dyn TradingCalendar>,
        config: &FetchConfig,
    ) -> Self {
        Self {
            transport,
            calendar,
            retry: RetryPolicy::from(config),
            max_pages: config.max_pages,
            publish_hour: config.publish_hour,
        }
    }

    /// 使用 reqwest 传输层和配置中的节假日
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config.fetch)?;
        let calendar = HolidayCalendar::from_config(&config.calendar)?;
        Ok(Self::new(
            Arc::new(transport),
            Arc::new(calendar),
            &config.fetch,
        ))
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn walker(&self) -> PageWalker {
        PageWalker::new(self.retry, self.max_pages)
    }

    /// 解析请求日期；非交易日返回 None
    fn resolve_date(&self, date: Option<&str>) -> Result<Option<NaiveDate>> {
        match date {
            Some(d) => {
                let date = parse_date(d)?;
                if self.calendar.is_holiday(date) {
                    log::info!("{} 为非交易日，无龙虎榜数据", date);
                    Ok(None)
                } else {
                    Ok(Some(date))
                }
            }
            None => Ok(Some(default_trade_date(
                self.calendar.as_ref(),
                beijing_now(),
                self.publish_hour,
            ))),
        }
    }

    /// 每日龙虎榜列表
    ///
    /// date: YYYY-MM-DD，为空时取最近一个交易日；非交易日返回 `Ok(None)`
    pub async fn top_list(&self, date: Option<&str>) -> Result<Option<Vec<TopListRecord>>> {
        let Some(date) = self.resolve_date(date)? else {
            return Ok(None);
        };

        let transport = self.transport.as_ref();
        let what = format!("每日龙虎榜 {}", date);
        let rows = self
            .retry
            .run(&what, move || fetch_top_list(transport, date))
            .await?;

        log::info!("📊 {} 共 {} 条数据", what, rows.len());
        Ok(Some(rows))
    }

    /// 个股上榜统计，按代码去重保留首次出现的记录
    pub async fn cap_tops(&self, days: u32) -> Result<PagedResult<StockTopStat>> {
        let last = LookbackDays::try_from(days)?;
        let source = SinaTableSource::new(
            self.transport.as_ref(),
            SinaKind::StockTops,
            Some(last),
            normalize_stock_tops,
        );
        let result = self.walker().walk(&source).await;
        Ok(result.map_rows(|rows| {
            let mut seen = HashSet::new();
            rows.into_iter()
                .filter(|r| seen.insert(r.code.clone()))
                .collect()
        }))
    }

    /// 营业部上榜统计
    pub async fn broker_tops(&self, days: u32) -> Result<PagedResult<BrokerTopStat>> {
        let last = LookbackDays::try_from(days)?;
        let source = SinaTableSource::new(
            self.transport.as_ref(),
            SinaKind::BrokerTops,
            Some(last),
            normalize_broker_tops,
        );
        Ok(self.walker().walk(&source).await)
    }

    /// 机构席位追踪统计
    pub async fn inst_tops(&self, days: u32) -> Result<PagedResult<InstTopStat>> {
        let last = LookbackDays::try_from(days)?;
        let source = SinaTableSource::new(
            self.transport.as_ref(),
            SinaKind::InstTops,
            Some(last),
            normalize_inst_tops,
        );
        Ok(self.walker().walk(&source).await)
    }

    /// 最近一个交易日机构席位成交明细
    pub async fn inst_detail(&self) -> PagedResult<InstitutionDetailRecord> {
        let source = SinaTableSource::new(
            self.transport.as_ref(),
            SinaKind::InstDetail,
            None,
            normalize_inst_detail,
        );
        self.walker().walk(&source).await
    }

    /// 单只证券的营业部买卖明细（买入前五、卖出前五）
    ///
    /// 缺少代码时直接返回参数错误；非交易日返回 `Ok(None)`
    pub async fn lhb_details(
        &self,
        code: Option<&str>,
        date: Option<&str>,
    ) -> Result<Option<ComBSDetail>> {
        let code = validate_code(code)?;
        let Some(date) = self.resolve_date(date)? else {
            return Ok(None);
        };

        let transport = self.transport.as_ref();
        let what = format!("营业部买卖明细 {} {}", code, date);
        let code_ref = code.as_str();
        let detail = self
            .retry
            .run(&what, move || fetch_combs_detail(transport, code_ref, date))
            .await?;
        Ok(Some(detail))
    }
}

/// 证券代码必须为 1~6 位数字，返回补零后的代码
fn validate_code(code: Option<&str>) -> Result<String> {
    let code = code
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| BillboardError::invalid("请输入股票代码，例如 000001"))?;
    if code.len() > CODE_WIDTH || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(BillboardError::invalid(format!("股票代码无效: {}", code)));
    }
    Ok(zfill_code(code))
}
