//! 公共常量和辅助函数

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Asia::Shanghai;
use chrono_tz::Tz;

use super::error::{BillboardError, Result};

// ==================== 东方财富 API 常量 ====================

/// 东方财富每日龙虎榜 API（返回 `var data_tab_1={...}`）
pub const EM_LHB_URL: &str = "http://data.eastmoney.com/DataCenter_V3/stock2016/TradeDetail";
/// 东方财富每日龙虎榜单页条数
pub const EM_PAGE_SIZE: u32 = 200;
/// 东方财富响应中 JS 变量赋值的标记
pub const EM_VAR_MARKER: &str = "_1=";

// ==================== 新浪财经 API 常量 ====================

/// 新浪龙虎榜统计页面，后接 `/<kind>/index.phtml`
pub const SINA_LHB_URL: &str = "http://vip.stock.finance.sina.com.cn/q/go.php/vLHBData/kind";
/// 新浪龙虎榜统计页面文件名
pub const SINA_LHB_PAGE: &str = "index.phtml";
/// 新浪龙虎榜营业部买卖明细 API
pub const SINA_COMBS_URL: &str = "http://vip.stock.finance.sina.com.cn/q/api/jsonp.php/var%20details=/InvestConsultService.getLHBComBSData";
/// 新浪明细响应中 JS 变量赋值的标记
pub const SINA_COMBS_MARKER: &str = "details=";
/// 新浪统计页面数据表格 id
pub const SINA_TABLE_ID: &str = "dataTable";

pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// 金额单位换算：元 -> 万元
pub const TEN_THOUSAND: f64 = 10_000.0;

/// 证券代码宽度
pub const CODE_WIDTH: usize = 6;

/// 获取北京时间
pub fn beijing_now() -> DateTime<Tz> {
    Utc::now().with_timezone(&Shanghai)
}

/// 获取北京时间字符串（ISO 8601 格式，带+08:00时区）
pub fn get_beijing_time() -> String {
    beijing_now().to_rfc3339()
}

/// 证券代码左侧补零至 6 位
pub fn zfill_code(code: &str) -> String {
    let code = code.trim();
    // 数值型单元格可能带有 ".0" 尾巴
    let code = code.strip_suffix(".0").unwrap_or(code);
    format!("{:0>width$}", code, width = CODE_WIDTH)
}

/// 保留两位小数
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// 解析 YYYY-MM-DD 格式日期
pub fn parse_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| BillboardError::invalid(format!("日期格式应为 YYYY-MM-DD: {}", date)))
}

/// 单元格转浮点数，容忍千分位逗号、百分号和空白
pub fn parse_float(s: &str) -> Option<f64> {
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, ',' | '%') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() || cleaned == "--" {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
