//! 龙虎榜数据服务
//!
//! ## 数据来源
//! - 东方财富：每日龙虎榜列表（JS 变量形式响应）
//! - 新浪财经：个股/营业部/机构席位上榜统计、机构席位明细（GBK HTML 分页表格）、
//!   营业部买卖明细（JSONP 形式响应）
//!
//! ## 处理流程
//! 请求 URL 构造 -> 带重试的获取 -> 解码 -> 列规整 -> 分页拼接

mod calendar;
mod common;
mod decode;
mod eastmoney;
mod error;
mod literal;
mod normalize;
mod report;
mod request;
mod retry;
mod service;
mod sina;
mod table;
mod transport;
mod walker;

pub use calendar::HolidayCalendar;
pub use common::{get_beijing_time, USER_AGENT};
pub use error::{BillboardError, Result};
pub use report::{build_report, print_report, render_report};
pub use service::BillboardService;
pub use transport::Transport;
pub use walker::PagedResult;
